use super::PlatformProvider;
use crate::model::BatteryState;

pub struct WindowsProvider;

impl WindowsProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformProvider for WindowsProvider {
    fn battery(&self) -> BatteryState {
        // Needs GetSystemPowerStatus; not wired up yet.
        BatteryState::Unsupported
    }

    fn platform_name(&self) -> &'static str {
        "Windows"
    }
}
