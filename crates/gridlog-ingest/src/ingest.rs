use tracing::warn;

use gridlog_types::{
    AccumulatedState, ChainAddress, ConsumedData, ConsumptionRecord, ProducedData,
    ProductionRecord,
};

use crate::config::InputConfig;
use crate::source::ExternalDataSource;

/// Fixed-point scale for CO2 accounting: three decimal digits.
const CO2_PRECISION: f64 = 1_000.0;

/// Fetch boundary: any source error becomes an absent reading.
///
/// The reason is logged here and then dropped; downstream only the
/// absence flags survive into the chain.
fn fetch<R>(source: &dyn ExternalDataSource<Reading = R>, sensor: &str) -> Option<R> {
    match source.read_state() {
        Ok(reading) => Some(reading),
        Err(reason) => {
            warn!(sensor, error = %reason, "sensor read failed, recording absence");
            None
        }
    }
}

/// Build a production payload from the configured sources.
///
/// Energy and carbon readings are fetched independently; either may be
/// absent without aborting the build. `last_hash` must come from the
/// chain store immediately before this call; it is attached unverified.
pub fn build_production(
    config: &InputConfig,
    last_hash: ChainAddress,
    last_state: &AccumulatedState,
) -> ProductionRecord {
    let raw_energy = fetch(config.energy.as_ref(), "energy-meter");
    let raw_carbon_emitted = config
        .carbon_emission
        .as_deref()
        .and_then(|source| fetch(source, "carbon-emission"));

    let (energy, is_meter_down) = accumulate(raw_energy.as_ref(), last_state);

    let (co2_saved, is_co2_down) = match &raw_carbon_emitted {
        Some(carbon) => (scale_co2(energy, carbon.accumulated_co2), false),
        None => (0, true),
    };

    ProductionRecord {
        raw_energy,
        raw_carbon_emitted,
        produced: ProducedData {
            energy,
            is_meter_down,
            previous_hash: last_hash,
            co2_saved,
            is_co2_down,
        },
    }
}

/// Build a consumption payload from the configured energy source.
///
/// Same carry-forward accounting as production, without carbon fields.
pub fn build_consumption(
    config: &InputConfig,
    last_hash: ChainAddress,
    last_state: &AccumulatedState,
) -> ConsumptionRecord {
    let raw_energy = fetch(config.energy.as_ref(), "energy-meter");
    let (energy, is_meter_down) = accumulate(raw_energy.as_ref(), last_state);

    ConsumptionRecord {
        raw_energy,
        consumed: ConsumedData {
            energy,
            previous_hash: last_hash,
            is_meter_down,
        },
    }
}

/// Carry-forward accounting: delta meters add the previous running total;
/// an absent reading is zero energy with the meter marked down.
fn accumulate(
    reading: Option<&gridlog_types::EnergyReading>,
    last_state: &AccumulatedState,
) -> (f64, bool) {
    match reading {
        Some(reading) => {
            let mut energy = reading.energy;
            if !reading.device.is_accumulated {
                energy += last_state.last_meter_read;
            }
            (energy, false)
        }
        None => (0.0, true),
    }
}

fn scale_co2(energy: f64, accumulated_co2: f64) -> i64 {
    (energy * accumulated_co2 * CO2_PRECISION).round() as i64
}
