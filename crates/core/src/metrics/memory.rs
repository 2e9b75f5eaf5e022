use crate::model::{clamp_percent, MemoryStats};
use sysinfo::System;

pub struct MemoryCollector {
    sys: System,
}

impl MemoryCollector {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }

    pub fn collect(&mut self) -> MemoryStats {
        self.sys.refresh_memory();

        let total = self.sys.total_memory();
        let used = self.sys.used_memory();
        let available = self.sys.available_memory();

        MemoryStats {
            total,
            used,
            available,
            percent: memory_percent(total, available),
        }
    }
}

/// Percent of memory not available to new allocations
pub fn memory_percent(total: u64, available: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    let in_use = total.saturating_sub(available);
    clamp_percent((in_use as f64 / total as f64 * 100.0) as f32)
}
