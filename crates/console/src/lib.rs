pub mod app;
pub mod draw;
pub mod input;
pub mod remediate;

pub use app::{App, CycleReport, Escalation, LoopState, RunSummary};
pub use draw::Console;
pub use input::{Confirm, StdinConfirm};
pub use remediate::{RemediationOutcome, Remediator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_console_writes_no_escapes() {
        let mut out = Vec::new();
        Console::plain().started(&mut out, 5.0, 80.0).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_clearing_console_emits_escapes() {
        let snapshot = sysdiag_core::Snapshot {
            timestamp: chrono::Utc::now(),
            platform: "Linux".to_string(),
            cpu_percent: 1.0,
            memory: sysdiag_core::MemoryStats {
                total: 100,
                used: 10,
                available: 90,
                percent: 10.0,
            },
            disks: vec![],
            temperatures: sysdiag_core::Temperatures::Unsupported,
            battery: sysdiag_core::BatteryState::Unsupported,
            processes: vec![],
        };
        let mut out = Vec::new();
        Console::new(true, false).status(&mut out, &snapshot).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('\u{1b}'));
        assert!(text.ends_with("Monitoring - CPU: 1.0% | Memory: 10.0%\n"));
    }
}
