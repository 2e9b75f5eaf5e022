use crate::{error::Result, model::clamp_percent};
use std::{thread, time::Duration};
use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};

pub struct CpuCollector {
    sys: System,
    window: Duration,
}

impl CpuCollector {
    pub fn new(window: Duration) -> Result<Self> {
        let mut sys = System::new();
        sys.refresh_cpu();

        Ok(Self {
            sys,
            window: window.max(MINIMUM_CPU_UPDATE_INTERVAL),
        })
    }

    /// Seed the usage counters. The reading taken here is discarded.
    pub fn init(&mut self) -> Result<()> {
        self.sys.refresh_cpu();
        Ok(())
    }

    /// Measure whole-machine CPU usage over the configured window.
    ///
    /// Blocks the calling thread for the length of the window.
    pub fn collect(&mut self) -> f32 {
        self.sys.refresh_cpu();
        thread::sleep(self.window);
        self.sys.refresh_cpu();

        clamp_percent(self.sys.global_cpu_info().cpu_usage())
    }

    /// Number of logical cores, never zero
    pub fn core_count(&self) -> usize {
        self.sys.cpus().len().max(1)
    }
}
