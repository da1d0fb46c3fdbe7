/// Errors from type construction and parsing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
    /// The string is neither the empty-chain sentinel nor a `Qm…` address.
    #[error("invalid chain address {value:?}: {reason}")]
    InvalidAddress { value: String, reason: String },
}
