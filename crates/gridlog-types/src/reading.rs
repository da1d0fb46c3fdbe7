use serde::{Deserialize, Serialize};

/// Description of the device a reading came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeterDevice {
    /// Device name reported by the driver (model or site label).
    pub name: String,
    /// `true` if the meter reports running totals, `false` if it reports
    /// per-interval deltas that must be accumulated by the ingestor.
    pub is_accumulated: bool,
}

impl MeterDevice {
    /// A meter that reports running totals.
    pub fn accumulated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_accumulated: true,
        }
    }

    /// A meter that reports per-interval deltas.
    pub fn delta(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_accumulated: false,
        }
    }
}

/// Raw energy snapshot from a meter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnergyReading {
    /// Energy value as reported by the device, in the device's unit.
    pub energy: f64,
    /// The reporting device.
    pub device: MeterDevice,
}

/// Raw snapshot from a carbon-emission sensor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarbonReading {
    /// Accumulated CO2 emission factor reported by the sensor.
    pub accumulated_co2: f64,
}

/// Carry-forward accounting state from the previous chain entry.
///
/// The caller owns this state and supplies it on every build; the core
/// never reads it back from the chain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccumulatedState {
    /// Running meter total as of the last recorded entry.
    pub last_meter_read: f64,
}

impl AccumulatedState {
    pub fn new(last_meter_read: f64) -> Self {
        Self { last_meter_read }
    }
}
