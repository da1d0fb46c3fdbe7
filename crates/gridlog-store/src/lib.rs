//! Append-only, hash-linked chain storage for gridlog.
//!
//! [`ChainStore`] keeps a durable, ordered, hash-addressable record of
//! payload files. Each appended payload becomes a timestamped JSON file
//! under `production/` or `consumption/`, wrapped in a [`ChainLink`] that
//! points at the previous head. The link sequence is persisted to an
//! append-only framed binary log (`chain.log`), one entry per append, and
//! re-linked into memory on open.
//!
//! # Design Rules
//!
//! 1. The chain is append-only: persisted links are immutable and reachable
//!    only through `previous` references.
//! 2. The in-memory head never advances unless the corresponding log write
//!    succeeded; storage I/O failures are hard errors.
//! 3. Soft corruption of the log (torn tail, CRC mismatch) recovers the
//!    valid prefix and emits a `tracing` diagnostic; a missing log is an
//!    empty chain.
//! 4. Single process, single writer. Concurrent writers from multiple
//!    processes race with last-writer-wins outcome and are unsupported.

pub mod chain;
pub mod config;
pub mod error;
pub mod log;
pub mod store;
pub mod verify;

pub use chain::{ChainFile, ChainIter, ChainLink};
pub use config::{StoreConfig, SyncMode};
pub use error::{StoreError, StoreResult};
pub use log::ChainLog;
pub use store::ChainStore;
pub use verify::{ChainVerifier, VerifyReport, Violation, ViolationKind};
