//! Foundation types for gridlog.
//!
//! This crate provides the address, reading, and payload record types used
//! throughout the gridlog system. Every other gridlog crate depends on
//! `gridlog-types`.
//!
//! # Key Types
//!
//! - [`ChainAddress`] — content-derived address of a payload file (`Qm…`),
//!   or the empty-chain sentinel `0x0`
//! - [`EnergyReading`] / [`CarbonReading`] — raw snapshots from external
//!   sensors
//! - [`ProductionRecord`] / [`ConsumptionRecord`] — chain-ready payloads
//!   combining raw snapshots with derived accounting data
//! - [`Payload`] — the variant the chain store persists
//! - [`AccumulatedState`] — carry-forward state supplied by the caller

pub mod address;
pub mod error;
pub mod reading;
pub mod record;

pub use address::ChainAddress;
pub use error::TypeError;
pub use reading::{AccumulatedState, CarbonReading, EnergyReading, MeterDevice};
pub use record::{
    ConsumedData, ConsumptionRecord, Payload, PayloadKind, ProducedData, ProductionRecord,
};
