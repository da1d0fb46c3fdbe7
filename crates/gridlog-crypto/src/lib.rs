//! Content addressing for gridlog.
//!
//! Every payload file in the chain is addressed by the digest of its bytes:
//! a 160-bit SHA-1 digest, base-58 encoded, behind the fixed `Qm` scheme
//! prefix. The same bytes always yield the same address; there is no
//! hidden state.
//!
//! The textual address format itself lives in
//! [`gridlog_types::ChainAddress`]; this crate computes the digests.

pub mod hasher;

pub use hasher::{AddressError, AddressHasher};
