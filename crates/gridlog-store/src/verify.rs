use gridlog_crypto::AddressHasher;
use gridlog_types::ChainAddress;

use crate::error::StoreError;
use crate::store::ChainStore;

/// Result of chain verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyReport {
    /// Number of links examined.
    pub entry_count: u64,
    /// `true` if every recorded `previous_hash` matched the recomputed
    /// address of the preceding entry's file.
    pub hash_chain_valid: bool,
    /// `true` if every reachable payload file was readable and decodable.
    pub files_readable: bool,
    pub violations: Vec<Violation>,
}

impl VerifyReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific integrity violation detected during verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Payload file the violation was detected on, relative to the root.
    pub file_path: String,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// Recorded `previous_hash` does not match the recomputed address.
    HashChainBreak,
    /// The payload file could not be read.
    UnreadableFile,
    /// The payload file was read but could not be decoded.
    MalformedPayload,
}

/// Offline chain integrity verifier.
///
/// Walks the chain newest to oldest and checks each payload's recorded
/// `previous_hash` against the address recomputed from the preceding
/// entry's file bytes; the oldest entry must record the empty-chain
/// sentinel. Diagnostic only; appends never run this.
pub struct ChainVerifier;

impl ChainVerifier {
    /// Verify every link reachable from the store's head.
    pub fn verify(store: &ChainStore) -> VerifyReport {
        let links: Vec<_> = store.iter().collect();
        let mut violations = Vec::new();
        let mut hash_chain_valid = true;
        let mut files_readable = true;

        for (index, link) in links.iter().enumerate() {
            let recorded = match store.read_payload(&link.data) {
                Ok(payload) => payload.previous_hash().clone(),
                Err(e) => {
                    files_readable = false;
                    violations.push(Violation {
                        file_path: link.data.file_path.clone(),
                        kind: match e {
                            StoreError::Serialization(_) => ViolationKind::MalformedPayload,
                            _ => ViolationKind::UnreadableFile,
                        },
                        description: e.to_string(),
                    });
                    continue;
                }
            };

            let expected = match links.get(index + 1) {
                None => ChainAddress::empty(),
                Some(previous) => match AddressHasher::hash_file(&store.resolve(&previous.data)) {
                    Ok(address) => address,
                    Err(e) => {
                        files_readable = false;
                        violations.push(Violation {
                            file_path: previous.data.file_path.clone(),
                            kind: ViolationKind::UnreadableFile,
                            description: e.to_string(),
                        });
                        continue;
                    }
                },
            };

            if recorded != expected {
                hash_chain_valid = false;
                violations.push(Violation {
                    file_path: link.data.file_path.clone(),
                    kind: ViolationKind::HashChainBreak,
                    description: format!(
                        "recorded previous hash {recorded} does not match computed {expected}"
                    ),
                });
            }
        }

        VerifyReport {
            entry_count: links.len() as u64,
            hash_chain_valid,
            files_readable,
            violations,
        }
    }
}
