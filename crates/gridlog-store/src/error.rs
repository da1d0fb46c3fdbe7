use gridlog_crypto::AddressError;

/// Errors from chain store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Address computation failed while reading a payload file.
    #[error("address computation failed: {0}")]
    Address(#[from] AddressError),

    /// The head may only be advanced through `add_to_chain`; explicit
    /// assignment of a non-empty head is rejected.
    #[error("chain head cannot be reassigned; append through add_to_chain")]
    HeadReassignment,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
