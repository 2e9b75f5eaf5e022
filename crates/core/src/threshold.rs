use crate::{config::ThresholdPolicy, model::Snapshot};

/// Outcome of checking one snapshot against the policy
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluation {
    pub is_critical: bool,
    /// One entry per exceeded threshold, in check order
    pub reasons: Vec<String>,
}

/// Check the snapshot against every configured limit.
///
/// Order is fixed: CPU, memory, disks (in path order), temperatures (in
/// sensor order). Limits are exclusive: a value equal to the threshold is
/// not a breach.
pub fn evaluate(snapshot: &Snapshot, policy: &ThresholdPolicy) -> Evaluation {
    let mut reasons = Vec::new();

    if snapshot.cpu_percent > policy.cpu_percent {
        reasons.push(format!("CPU is over {}%", policy.cpu_percent));
    }

    if snapshot.memory.percent > policy.memory_percent {
        reasons.push(format!("Memory is over {}%", policy.memory_percent));
    }

    if let Some(limit) = policy.disk_percent {
        for disk in &snapshot.disks {
            if let Some(stats) = disk.stats() {
                if stats.percent > limit {
                    reasons.push(format!("Disk {} is over {}%", disk.path, limit));
                }
            }
        }
    }

    if let Some(limit) = policy.temperature_celsius {
        for reading in snapshot.temperatures.readings() {
            if reading.celsius > limit {
                reasons.push(format!("Temperature {} is over {}°C", reading.label, limit));
            }
        }
    }

    Evaluation {
        is_critical: !reasons.is_empty(),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BatteryState, DiskStats, DiskStatus, DiskUsage, MemoryStats, SensorReading, Temperatures,
    };
    use chrono::Utc;

    fn snapshot(cpu: f32, memory: f32) -> Snapshot {
        Snapshot {
            timestamp: Utc::now(),
            platform: "Linux".to_string(),
            cpu_percent: cpu,
            memory: MemoryStats {
                total: 16_000_000_000,
                used: 8_000_000_000,
                available: 8_000_000_000,
                percent: memory,
            },
            disks: vec![],
            temperatures: Temperatures::NoSensors,
            battery: BatteryState::Absent,
            processes: vec![],
        }
    }

    fn policy() -> ThresholdPolicy {
        ThresholdPolicy {
            cpu_percent: 5.0,
            memory_percent: 80.0,
            disk_percent: None,
            temperature_celsius: None,
        }
    }

    #[test]
    fn quiet_host_is_not_critical() {
        let result = evaluate(&snapshot(3.0, 40.0), &policy());
        assert!(!result.is_critical);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn cpu_reason_precedes_memory_reason() {
        let result = evaluate(&snapshot(92.0, 85.0), &policy());
        assert!(result.is_critical);
        assert_eq!(result.reasons, vec!["CPU is over 5%", "Memory is over 80%"]);
    }

    #[test]
    fn memory_alone_is_critical() {
        let result = evaluate(&snapshot(1.0, 95.5), &policy());
        assert!(result.is_critical);
        assert_eq!(result.reasons, vec!["Memory is over 80%"]);
    }

    #[test]
    fn threshold_is_exclusive() {
        let result = evaluate(&snapshot(5.0, 80.0), &policy());
        assert!(!result.is_critical);
    }

    #[test]
    fn fractional_threshold_keeps_its_digits() {
        let mut policy = policy();
        policy.cpu_percent = 12.5;
        let result = evaluate(&snapshot(50.0, 10.0), &policy);
        assert_eq!(result.reasons, vec!["CPU is over 12.5%"]);
    }

    #[test]
    fn critical_iff_cpu_or_memory_exceeds() {
        let policy = policy();
        for cpu in [0.0_f32, 4.9, 5.0, 5.1, 50.0, 100.0] {
            for mem in [0.0_f32, 79.9, 80.0, 80.1, 100.0] {
                let result = evaluate(&snapshot(cpu, mem), &policy);
                let expected = cpu > policy.cpu_percent || mem > policy.memory_percent;
                assert_eq!(result.is_critical, expected, "cpu={} mem={}", cpu, mem);
                assert_eq!(result.reasons.is_empty(), !expected);
            }
        }
    }

    #[test]
    fn optional_disk_and_temperature_limits() {
        let mut snap = snapshot(1.0, 10.0);
        snap.disks = vec![
            DiskUsage {
                path: "/".to_string(),
                status: DiskStatus::Mounted(DiskStats {
                    total: 100,
                    used: 95,
                    free: 5,
                    percent: 95.0,
                }),
            },
            DiskUsage {
                path: "/data".to_string(),
                status: DiskStatus::Unavailable("path not found".to_string()),
            },
        ];
        snap.temperatures = Temperatures::Readings(vec![SensorReading {
            label: "core_0".to_string(),
            celsius: 91.0,
        }]);

        // disabled by default
        assert!(!evaluate(&snap, &policy()).is_critical);

        let mut policy = policy();
        policy.disk_percent = Some(90.0);
        policy.temperature_celsius = Some(85.0);
        let result = evaluate(&snap, &policy);
        assert_eq!(
            result.reasons,
            vec!["Disk / is over 90%", "Temperature core_0 is over 85°C"]
        );
    }
}
