pub mod linux;
pub mod macos;
pub mod windows;

use crate::model::BatteryState;

/// Platform-specific functionality trait
pub trait PlatformProvider {
    /// Current battery state; never fails, missing hardware is a state
    fn battery(&self) -> BatteryState;

    /// OS family name as reported in snapshots
    fn platform_name(&self) -> &'static str;
}

/// Get the appropriate platform provider for the current system
pub fn get_platform_provider() -> Box<dyn PlatformProvider> {
    #[cfg(target_os = "linux")]
    {
        Box::new(linux::LinuxProvider::new())
    }

    #[cfg(target_os = "macos")]
    {
        Box::new(macos::MacosProvider::new())
    }

    #[cfg(target_os = "windows")]
    {
        Box::new(windows::WindowsProvider::new())
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        Box::new(GenericProvider::new())
    }
}

/// Generic provider for unsupported platforms
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub struct GenericProvider;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
impl GenericProvider {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
impl PlatformProvider for GenericProvider {
    fn battery(&self) -> BatteryState {
        BatteryState::Unsupported
    }

    fn platform_name(&self) -> &'static str {
        std::env::consts::OS
    }
}
