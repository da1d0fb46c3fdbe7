//! High-level gridlog API.
//!
//! [`EnergyRecorder`] wires ingestion to storage: one call fetches the
//! configured sensors, derives the payload against the current chain
//! head's address, and appends the result. The embedding driver decides
//! *when* to record and owns retry policy and the carry-forward
//! [`gridlog_types::AccumulatedState`]; this crate owns the ordering of
//! the steps in between.

pub mod error;
pub mod recorder;

pub use error::{RecorderError, RecorderResult};
pub use recorder::{EnergyRecorder, RecordOutcome};
