pub mod cpu;
pub mod disk;
pub mod memory;
pub mod process;
pub mod temperature;

pub use cpu::CpuCollector;
pub use disk::DiskCollector;
pub use memory::MemoryCollector;
pub use process::ProcessCollector;
pub use temperature::TemperatureCollector;

use crate::{
    config::Config,
    error::Result,
    model::Snapshot,
    platform::{get_platform_provider, PlatformProvider},
};
use chrono::{SubsecRound, Utc};

/// Anything that can produce host snapshots for the monitor loop
pub trait MetricSource {
    /// Seed rate counters before the first real sample.
    fn prime(&mut self) -> Result<()>;

    /// Take one snapshot. Unreadable subsystems become explicit markers.
    fn sample(&mut self) -> Snapshot;
}

/// Main metrics collector that coordinates all sub-collectors
pub struct MetricsCollector {
    platform: Box<dyn PlatformProvider>,
    cpu: CpuCollector,
    memory: MemoryCollector,
    disk: DiskCollector,
    temperature: TemperatureCollector,
    process: ProcessCollector,
}

impl MetricsCollector {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            platform: get_platform_provider(),
            cpu: CpuCollector::new(config.cpu_sample_interval())?,
            memory: MemoryCollector::new(),
            disk: DiskCollector::new(config.disk_paths.clone()),
            temperature: TemperatureCollector::new(),
            process: ProcessCollector::new(config.top_processes),
        })
    }
}

impl MetricSource for MetricsCollector {
    fn prime(&mut self) -> Result<()> {
        self.cpu.init()?;
        self.temperature.init();
        self.process.init();
        Ok(())
    }

    fn sample(&mut self) -> Snapshot {
        let timestamp = Utc::now().trunc_subsecs(3);

        // The CPU window doubles as the interval for per-process usage.
        let cpu_percent = self.cpu.collect();
        let processes = self.process.collect(self.cpu.core_count());

        Snapshot {
            timestamp,
            platform: self.platform.platform_name().to_string(),
            cpu_percent,
            memory: self.memory.collect(),
            disks: self.disk.collect(),
            temperatures: self.temperature.collect(),
            battery: self.platform.battery(),
            processes,
        }
    }
}
