//! Sensor ingestion for gridlog.
//!
//! Transforms raw, possibly-absent sensor readings into chain-ready
//! payloads. External meters and carbon sensors sit behind the
//! [`ExternalDataSource`] seam; a fetch that fails for any reason
//! (network error, malformed response, device offline) degrades to an
//! absent reading recorded in the payload, never an aborted ingestion.
//! The failure reason is kept for the logs.
//!
//! Derivation rules:
//!
//! - Energy carry-forward: delta-reporting meters have the previous
//!   running total added to their reading; self-accumulating meters are
//!   taken as-is.
//! - CO2 savings: `round(energy * accumulated_co2 * 1000)`, fixed-point
//!   with three decimal digits of precision.
//! - `previous_hash` is attached exactly as passed by the caller, who is
//!   responsible for obtaining it from the chain store immediately before
//!   building. It is not re-verified here.

pub mod config;
pub mod ingest;
pub mod source;

pub use config::InputConfig;
pub use ingest::{build_consumption, build_production};
pub use source::{ExternalDataSource, SourceError};
