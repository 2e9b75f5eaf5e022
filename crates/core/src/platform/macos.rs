use super::PlatformProvider;
use crate::model::{clamp_percent, BatteryState};
use std::process::Command;

pub struct MacosProvider;

impl MacosProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacosProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformProvider for MacosProvider {
    fn battery(&self) -> BatteryState {
        match Command::new("pmset").args(["-g", "batt"]).output() {
            Ok(output) if output.status.success() => {
                parse_pmset(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(_) | Err(_) => BatteryState::Unsupported,
        }
    }

    fn platform_name(&self) -> &'static str {
        "Darwin"
    }
}

/// Parse `pmset -g batt` output, e.g.
/// `Now drawing from 'AC Power'` /
/// ` -InternalBattery-0 (id=1234)\t72%; charging; 1:23 remaining`
pub fn parse_pmset(output: &str) -> BatteryState {
    let Some(line) = output.lines().find(|l| l.contains("InternalBattery")) else {
        return BatteryState::Absent;
    };

    let percent = line
        .split('\t')
        .nth(1)
        .and_then(|s| s.split('%').next())
        .and_then(|s| s.trim().parse::<f32>().ok());

    match percent {
        Some(percent) => BatteryState::Present {
            percent: clamp_percent(percent),
            plugged: output.contains("'AC Power'"),
        },
        None => BatteryState::Absent,
    }
}
