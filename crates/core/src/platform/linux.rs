use super::PlatformProvider;
use crate::model::{clamp_percent, BatteryState};
use std::{
    fs,
    path::{Path, PathBuf},
};

const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

pub struct LinuxProvider {
    power_supply: PathBuf,
}

impl LinuxProvider {
    pub fn new() -> Self {
        Self::with_root(POWER_SUPPLY_ROOT)
    }

    /// Read power-supply entries from a different sysfs root
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            power_supply: root.into(),
        }
    }
}

impl Default for LinuxProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformProvider for LinuxProvider {
    fn battery(&self) -> BatteryState {
        let Ok(entries) = fs::read_dir(&self.power_supply) else {
            return BatteryState::Absent;
        };

        let mut percent = None;
        let mut line_power_online = None;
        let mut discharging = false;

        for entry in entries.flatten() {
            let dir = entry.path();
            match read_attr(&dir, "type").as_deref() {
                Some("Battery") => {
                    if percent.is_some() {
                        continue;
                    }
                    // present=0 marks an empty battery bay
                    if read_attr(&dir, "present").as_deref() == Some("0") {
                        continue;
                    }
                    let Some(capacity) = read_attr(&dir, "capacity")
                        .and_then(|c| c.parse::<f32>().ok())
                    else {
                        continue;
                    };
                    percent = Some(clamp_percent(capacity));
                    discharging = read_attr(&dir, "status").as_deref() == Some("Discharging");
                }
                Some("Mains") | Some("USB") | Some("USB_C") => {
                    let online = read_attr(&dir, "online").as_deref() == Some("1");
                    line_power_online = Some(line_power_online.unwrap_or(false) || online);
                }
                _ => {}
            }
        }

        match percent {
            Some(percent) => BatteryState::Present {
                percent,
                plugged: line_power_online.unwrap_or(!discharging),
            },
            None => BatteryState::Absent,
        }
    }

    fn platform_name(&self) -> &'static str {
        "Linux"
    }
}

fn read_attr(dir: &Path, name: &str) -> Option<String> {
    fs::read_to_string(dir.join(name))
        .ok()
        .map(|value| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supply(root: &Path, name: &str, attrs: &[(&str, &str)]) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for (attr, value) in attrs {
            fs::write(dir.join(attr), format!("{}\n", value)).unwrap();
        }
    }

    #[test]
    fn missing_root_means_absent() {
        let provider = LinuxProvider::with_root("/definitely/not/sysfs");
        assert_eq!(provider.battery(), BatteryState::Absent);
    }

    #[test]
    fn reads_capacity_and_mains() {
        let root = tempfile::tempdir().unwrap();
        supply(
            root.path(),
            "BAT0",
            &[("type", "Battery"), ("capacity", "67"), ("status", "Charging")],
        );
        supply(root.path(), "AC", &[("type", "Mains"), ("online", "1")]);

        let provider = LinuxProvider::with_root(root.path());
        assert_eq!(
            provider.battery(),
            BatteryState::Present {
                percent: 67.0,
                plugged: true
            }
        );
    }

    #[test]
    fn falls_back_to_status_without_mains() {
        let root = tempfile::tempdir().unwrap();
        supply(
            root.path(),
            "BAT1",
            &[("type", "Battery"), ("capacity", "12"), ("status", "Discharging")],
        );

        let provider = LinuxProvider::with_root(root.path());
        assert_eq!(
            provider.battery(),
            BatteryState::Present {
                percent: 12.0,
                plugged: false
            }
        );
    }

    #[test]
    fn desktop_without_battery_is_absent() {
        let root = tempfile::tempdir().unwrap();
        supply(root.path(), "AC", &[("type", "Mains"), ("online", "1")]);

        let provider = LinuxProvider::with_root(root.path());
        assert_eq!(provider.battery(), BatteryState::Absent);
    }
}
