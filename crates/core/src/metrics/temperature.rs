use crate::model::{SensorReading, Temperatures};
use sysinfo::Components;

pub struct TemperatureCollector {
    components: Components,
}

impl TemperatureCollector {
    pub fn new() -> Self {
        Self {
            components: Components::new_with_refreshed_list(),
        }
    }

    pub fn init(&mut self) {
        self.components.refresh_list();
    }

    pub fn collect(&mut self) -> Temperatures {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Temperatures::Unsupported;
        }

        self.components.refresh();

        let readings = self
            .components
            .list()
            .iter()
            .map(|component| (component.label().to_string(), component.temperature()));

        from_readings(readings)
    }
}

/// Keep only plausible readings; an empty result means no usable sensors.
pub fn from_readings<I>(readings: I) -> Temperatures
where
    I: IntoIterator<Item = (String, f32)>,
{
    let readings: Vec<SensorReading> = readings
        .into_iter()
        .filter(|(_, celsius)| celsius.is_finite() && *celsius > 0.0)
        .map(|(label, celsius)| SensorReading { label, celsius })
        .collect();

    if readings.is_empty() {
        Temperatures::NoSensors
    } else {
        Temperatures::Readings(readings)
    }
}
