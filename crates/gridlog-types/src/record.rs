use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::ChainAddress;
use crate::reading::{CarbonReading, EnergyReading};

/// Derived accounting data for a production entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProducedData {
    /// Running energy total after carry-forward accumulation.
    pub energy: f64,
    /// `true` if no energy reading could be obtained.
    pub is_meter_down: bool,
    /// Address of the file referenced by the chain head when this payload
    /// was built.
    pub previous_hash: ChainAddress,
    /// CO2 savings in fixed-point, three decimal digits of precision.
    pub co2_saved: i64,
    /// `true` if no carbon-emission reading could be obtained.
    pub is_co2_down: bool,
}

/// Derived accounting data for a consumption entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsumedData {
    /// Running energy total after carry-forward accumulation.
    pub energy: f64,
    /// Address of the file referenced by the chain head when this payload
    /// was built.
    pub previous_hash: ChainAddress,
    /// `true` if no energy reading could be obtained.
    pub is_meter_down: bool,
}

/// Chain-ready production payload: raw snapshots plus derived data.
///
/// Raw readings are `None` when the corresponding sensor fetch failed;
/// absence is recorded as data, never propagated as an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub raw_energy: Option<EnergyReading>,
    pub raw_carbon_emitted: Option<CarbonReading>,
    pub produced: ProducedData,
}

/// Chain-ready consumption payload: raw snapshot plus derived data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub raw_energy: Option<EnergyReading>,
    pub consumed: ConsumedData,
}

/// The two payload variants the chain store persists.
///
/// Serialization is untagged: the payload file contains the record's own
/// fields, and the variant is recovered from which derived sub-record
/// (`produced` vs `consumed`) is present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Production(ProductionRecord),
    Consumption(ConsumptionRecord),
}

impl Payload {
    /// The variant kind, used to select the storage subdirectory.
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Production(_) => PayloadKind::Production,
            Self::Consumption(_) => PayloadKind::Consumption,
        }
    }

    /// The `previous_hash` recorded in the derived sub-record.
    pub fn previous_hash(&self) -> &ChainAddress {
        match self {
            Self::Production(record) => &record.produced.previous_hash,
            Self::Consumption(record) => &record.consumed.previous_hash,
        }
    }

    /// The derived energy total.
    pub fn energy(&self) -> f64 {
        match self {
            Self::Production(record) => record.produced.energy,
            Self::Consumption(record) => record.consumed.energy,
        }
    }

    /// `true` if the payload records a failed energy fetch.
    pub fn is_meter_down(&self) -> bool {
        match self {
            Self::Production(record) => record.produced.is_meter_down,
            Self::Consumption(record) => record.consumed.is_meter_down,
        }
    }
}

/// Payload variant tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayloadKind {
    Production,
    Consumption,
}

impl PayloadKind {
    /// Storage subdirectory for payload files of this kind.
    pub fn subdirectory(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Consumption => "consumption",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Consumption => write!(f, "consumption"),
        }
    }
}
