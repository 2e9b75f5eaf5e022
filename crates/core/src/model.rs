use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Clamp a measured percentage into `[0, 100]`.
///
/// Non-finite readings collapse to zero rather than leaking NaN into the
/// history.
pub fn clamp_percent(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Memory information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub percent: f32,
}

/// Usage figures for a mounted filesystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskStats {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f32,
}

/// Disk reading for one queried path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub path: String,
    pub status: DiskStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiskStatus {
    Mounted(DiskStats),
    /// The path could not be resolved to a disk; carries the reason.
    Unavailable(String),
}

impl DiskUsage {
    pub fn stats(&self) -> Option<&DiskStats> {
        match &self.status {
            DiskStatus::Mounted(stats) => Some(stats),
            DiskStatus::Unavailable(_) => None,
        }
    }
}

/// One temperature sensor reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub label: String,
    pub celsius: f32,
}

/// Temperature state of the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Temperatures {
    /// The platform exposes no sensor interface at all.
    Unsupported,
    /// The interface exists but reported no usable sensors.
    NoSensors,
    Readings(Vec<SensorReading>),
}

impl Temperatures {
    pub fn readings(&self) -> &[SensorReading] {
        match self {
            Self::Readings(readings) => readings,
            _ => &[],
        }
    }
}

/// Battery state of the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BatteryState {
    Unsupported,
    Absent,
    Present { percent: f32, plugged: bool },
}

/// One entry of the top-process list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    /// Share of the whole machine, not of a single core.
    pub cpu_percent: f32,
}

/// Complete reading of the host at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub platform: String,
    pub cpu_percent: f32,
    pub memory: MemoryStats,
    pub disks: Vec<DiskUsage>,
    pub temperatures: Temperatures,
    pub battery: BatteryState,
    pub processes: Vec<ProcessSample>,
}

impl Snapshot {
    /// Look up a process from the top-process list by pid.
    pub fn process(&self, pid: u32) -> Option<&ProcessSample> {
        self.processes.iter().find(|p| p.pid == pid)
    }
}
