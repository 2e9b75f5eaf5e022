use crossterm::{
    cursor,
    style::Stylize,
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use sysdiag_core::{Action, DiagnosisResult, Snapshot, Status};
use std::io::{self, Write};

/// Status lines printed below an escalation before clearing resumes
const DIAGNOSIS_HOLD: u32 = 5;

/// Operator-facing output: one unit of text per event
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    clear_screen: bool,
    styled: bool,
    /// Remaining status lines that must not clear the last diagnosis
    hold: u32,
}

impl Console {
    pub fn new(clear_screen: bool, styled: bool) -> Self {
        Self {
            clear_screen,
            styled,
            hold: 0,
        }
    }

    /// Plain output with no escape sequences
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn started<W: Write>(&self, writer: &mut W, cpu: f32, memory: f32) -> io::Result<()> {
        writeln!(
            writer,
            "--- System Monitor Started (CPU > {}%, Mem > {}%) ---",
            cpu, memory
        )?;
        writer.flush()
    }

    /// Per-cycle status line
    ///
    /// Clears the screen first when configured, except for the few cycles
    /// after an escalation so the diagnosis stays readable.
    pub fn status<W: Write>(&mut self, writer: &mut W, snapshot: &Snapshot) -> io::Result<()> {
        if self.hold > 0 {
            self.hold -= 1;
        } else if self.clear_screen {
            writer.queue(Clear(ClearType::All))?;
            writer.queue(cursor::MoveTo(0, 0))?;
        }
        writeln!(
            writer,
            "Monitoring - CPU: {:.1}% | Memory: {:.1}%",
            snapshot.cpu_percent, snapshot.memory.percent
        )?;
        writer.flush()
    }

    pub fn escalating<W: Write>(
        &mut self,
        writer: &mut W,
        snapshot: &Snapshot,
        reasons: &[String],
        payload_chars: usize,
    ) -> io::Result<()> {
        let banner = format!(
            "High load detected (CPU: {:.1}%, Mem: {:.1}%): {}.",
            snapshot.cpu_percent,
            snapshot.memory.percent,
            reasons.join(", ")
        );
        writeln!(writer)?;
        if self.styled {
            writeln!(writer, "{}", banner.as_str().yellow().bold())?;
        } else {
            writeln!(writer, "{}", banner)?;
        }
        writeln!(writer, "Sending {} chars of history for diagnosis...", payload_chars)?;
        self.hold = DIAGNOSIS_HOLD;
        writer.flush()
    }

    pub fn diagnosis<W: Write>(
        &self,
        writer: &mut W,
        result: &DiagnosisResult,
        action: &Action,
    ) -> io::Result<()> {
        let status = match result.status {
            Status::Stable => "Stable",
            Status::Critical => "Critical",
        };
        if self.styled {
            let styled = match result.status {
                Status::Stable => status.green().bold(),
                Status::Critical => status.red().bold(),
            };
            writeln!(writer, "Status:     {}", styled)?;
        } else {
            writeln!(writer, "Status:     {}", status)?;
        }
        writeln!(writer, "Root cause: {}", result.root_cause)?;
        match action.description() {
            Some(description) => writeln!(writer, "Proposed:   {} (not executed)", description)?,
            None => writeln!(writer, "Proposed:   none")?,
        }
        writer.flush()
    }

    /// Visible but non-fatal notice, e.g. when no diagnosis could be made
    pub fn notice<W: Write>(&self, writer: &mut W, message: &str) -> io::Result<()> {
        if self.styled {
            writeln!(writer, "{}", message.dark_yellow())?;
        } else {
            writeln!(writer, "{}", message)?;
        }
        writer.flush()
    }

    pub fn stopped<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "Stopping monitor.")?;
        writer.flush()
    }
}
