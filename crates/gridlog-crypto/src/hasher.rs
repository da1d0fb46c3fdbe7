use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha1::{Digest, Sha1};

use gridlog_types::ChainAddress;

/// Content-address hasher for payload file bytes.
///
/// Applies a fixed 160-bit SHA-1 digest and hands the result to
/// [`ChainAddress::from_digest`] for base-58 encoding and the `Qm` scheme
/// prefix. Pure function of the input bytes.
pub struct AddressHasher;

impl AddressHasher {
    /// Compute the content address of a byte sequence.
    pub fn compute(data: &[u8]) -> ChainAddress {
        let digest = Sha1::digest(data);
        ChainAddress::from_digest(digest.as_slice())
    }

    /// Compute the content address of a file's bytes, reading in chunks.
    pub fn hash_file(path: &Path) -> Result<ChainAddress, AddressError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut hasher = Sha1::new();

        let mut buffer = [0u8; 8192];
        loop {
            let bytes_read = reader.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(ChainAddress::from_digest(hasher.finalize().as_slice()))
    }

    /// Verify that data produces the expected address.
    pub fn verify(data: &[u8], expected: &ChainAddress) -> bool {
        Self::compute(data) == *expected
    }
}

/// Errors from address computation.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    /// I/O error while reading the file being addressed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
