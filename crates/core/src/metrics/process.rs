use crate::{
    error::{CoreError, Result},
    model::{clamp_percent, ProcessSample},
};
use std::cmp::Ordering;
use sysinfo::{Pid, System};

pub struct ProcessCollector {
    sys: System,
    limit: usize,
}

impl ProcessCollector {
    pub fn new(limit: usize) -> Self {
        Self {
            sys: System::new(),
            limit,
        }
    }

    /// Seed per-process CPU counters so the first sample has a baseline.
    pub fn init(&mut self) {
        self.sys.refresh_processes();
    }

    /// Top CPU consumers since the previous refresh.
    ///
    /// Per-process usage is divided by `core_count` so it stays a share of
    /// the whole machine. Processes that exit between refreshes are simply
    /// absent from the table.
    pub fn collect(&mut self, core_count: usize) -> Vec<ProcessSample> {
        self.sys.refresh_processes();

        let cores = core_count.max(1) as f32;
        let samples = self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| ProcessSample {
                pid: pid.as_u32(),
                name: process.name().to_string(),
                cpu_percent: clamp_percent(process.cpu_usage() / cores),
            })
            .collect();

        top_n(samples, self.limit)
    }
}

/// Busiest `limit` processes, highest usage first. Idle processes are dropped;
/// ties break on pid so the order is stable.
pub fn top_n(mut samples: Vec<ProcessSample>, limit: usize) -> Vec<ProcessSample> {
    samples.retain(|p| p.cpu_percent > 0.0);
    samples.sort_by(|a, b| {
        b.cpu_percent
            .partial_cmp(&a.cpu_percent)
            .unwrap_or(Ordering::Equal)
            .then(a.pid.cmp(&b.pid))
    });
    samples.truncate(limit);
    samples
}

/// Send SIGTERM to `pid`, but only if it still names `expected_name`.
///
/// PIDs are recycled, so the live process is looked up again right before
/// signalling it.
#[cfg(unix)]
pub fn terminate_verified(pid: u32, expected_name: &str) -> Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid as NixPid;

    guard_pid(pid)?;

    let mut sys = System::new();
    let target = Pid::from_u32(pid);
    if !sys.refresh_process(target) {
        return Err(CoreError::platform(format!("Process {} no longer exists", pid)));
    }
    let live_name = sys
        .process(target)
        .map(|p| p.name().to_string())
        .unwrap_or_default();
    if live_name != expected_name {
        return Err(CoreError::platform(format!(
            "Process {} is now '{}', expected '{}'",
            pid, live_name, expected_name
        )));
    }

    let raw = i32::try_from(pid)
        .map_err(|_| CoreError::platform(format!("Process id {} out of range", pid)))?;
    match kill(NixPid::from_raw(raw), Signal::SIGTERM) {
        Ok(()) => Ok(()),
        Err(Errno::EPERM) => Err(CoreError::permission_denied(format!(
            "Not allowed to signal process {}",
            pid
        ))),
        Err(e) => Err(e.into()),
    }
}

#[cfg(not(unix))]
pub fn terminate_verified(_pid: u32, _expected_name: &str) -> Result<()> {
    Err(CoreError::unsupported_platform(
        "Process termination not supported on this platform",
    ))
}

/// Refuse targets that can never be a sensible remediation.
#[cfg_attr(not(unix), allow(dead_code))]
fn guard_pid(pid: u32) -> Result<()> {
    if pid <= 1 {
        return Err(CoreError::permission_denied(format!(
            "Refusing to signal system process {}",
            pid
        )));
    }
    if pid == std::process::id() {
        return Err(CoreError::permission_denied("Refusing to signal the monitor itself"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(pid: u32, cpu: f32) -> ProcessSample {
        ProcessSample {
            pid,
            name: format!("proc{}", pid),
            cpu_percent: cpu,
        }
    }

    #[test]
    fn keeps_busiest_first() {
        let top = top_n(
            vec![sample(1, 2.0), sample(2, 40.0), sample(3, 0.0), sample(4, 9.5)],
            2,
        );
        let pids: Vec<u32> = top.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![2, 4]);
    }

    #[test]
    fn ties_break_on_pid() {
        let top = top_n(vec![sample(9, 5.0), sample(3, 5.0)], 5);
        assert_eq!(top[0].pid, 3);
        assert_eq!(top[1].pid, 9);
    }

    #[test]
    fn idle_processes_are_dropped() {
        assert!(top_n(vec![sample(1, 0.0)], 5).is_empty());
    }

    #[test]
    fn refuses_init_and_self() {
        assert!(guard_pid(0).is_err());
        assert!(guard_pid(1).is_err());
        assert!(guard_pid(std::process::id()).is_err());
        assert!(guard_pid(4821).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn name_mismatch_is_not_signalled() {
        let own = std::process::id();
        // our own pid is guarded before the name is even checked
        assert!(terminate_verified(own, "definitely-not-this").is_err());
    }
}
