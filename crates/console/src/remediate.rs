use crate::input::Confirm;
use sysdiag_core::{metrics::process::terminate_verified, CancelToken, FixAction, Snapshot};
use std::io::{self, Write};

type Terminator = fn(u32, &str) -> sysdiag_core::Result<()>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemediationOutcome {
    Skipped(String),
    Declined,
    Executed,
    Failed(String),
}

/// Executes a proposed kill only after the operator confirms it.
///
/// The target must appear in the latest snapshot's process list, and the
/// live process is checked again by name right before it is signalled.
/// An answer given after the monitor was asked to stop is not acted on.
pub struct Remediator {
    confirm: Box<dyn Confirm>,
    terminate: Terminator,
    cancel: CancelToken,
}

impl Remediator {
    pub fn new(confirm: Box<dyn Confirm>, cancel: CancelToken) -> Self {
        Self {
            confirm,
            terminate: terminate_verified,
            cancel,
        }
    }

    pub fn offer<W: Write>(
        &mut self,
        writer: &mut W,
        fix: &FixAction,
        snapshot: &Snapshot,
    ) -> io::Result<RemediationOutcome> {
        let outcome = self.decide(writer, fix, snapshot)?;

        let message = match &outcome {
            RemediationOutcome::Skipped(why) => {
                format!("Not executing '{}': {}", fix.description(), why)
            }
            RemediationOutcome::Declined => format!("Operator declined '{}'", fix.description()),
            RemediationOutcome::Executed => format!("Executed '{}'", fix.description()),
            RemediationOutcome::Failed(why) => {
                format!("Failed to execute '{}': {}", fix.description(), why)
            }
        };
        match &outcome {
            RemediationOutcome::Failed(_) => log::warn!("{}", message),
            _ => log::info!("{}", message),
        }
        writeln!(writer, "{}", message)?;
        writer.flush()?;

        Ok(outcome)
    }

    fn decide<W: Write>(
        &mut self,
        writer: &mut W,
        fix: &FixAction,
        snapshot: &Snapshot,
    ) -> io::Result<RemediationOutcome> {
        if !fix.is_kill() {
            return Ok(RemediationOutcome::Skipped(format!(
                "unsupported command '{}'",
                fix.command
            )));
        }
        let Some(pid) = fix.pid else {
            return Ok(RemediationOutcome::Skipped("no pid given".to_string()));
        };
        let Some(process) = snapshot.process(pid) else {
            return Ok(RemediationOutcome::Skipped(format!(
                "pid {} is not among the top processes of the latest sample",
                pid
            )));
        };

        // Ctrl-C only lands once the blocking read returns
        write!(
            writer,
            "Send SIGTERM to pid {} ({})? [y/N, Ctrl-C then Enter to quit] ",
            pid,
            process.name
        )?;
        writer.flush()?;
        let confirmed = self.confirm.confirm();
        if self.cancel.is_cancelled() {
            return Ok(RemediationOutcome::Skipped("monitor is stopping".to_string()));
        }
        if !confirmed {
            return Ok(RemediationOutcome::Declined);
        }

        Ok(match (self.terminate)(pid, &process.name) {
            Ok(()) => RemediationOutcome::Executed,
            Err(e) => RemediationOutcome::Failed(e.to_string()),
        })
    }
}
