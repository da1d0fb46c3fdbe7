/// External sensor seam.
///
/// Implemented once per sensor type by the embedding application's device
/// drivers. The core only requires that a successful call produce a
/// recognizable reading; every error outcome is treated as absence by the
/// ingestion boundary.
///
/// Implementations should apply their own timeouts; a timeout surfaced as
/// an `Err` is handled identically to any other fetch failure.
pub trait ExternalDataSource: Send + Sync {
    /// The reading type this source produces.
    type Reading;

    /// Read the sensor's current state.
    fn read_state(&self) -> Result<Self::Reading, SourceError>;
}

/// Why a sensor fetch failed.
///
/// Carried to the log at the ingestion boundary; never stored in the
/// chain beyond the absence flags.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The device could not be reached.
    #[error("sensor unavailable: {0}")]
    Unavailable(String),

    /// The device responded with something that is not a reading.
    #[error("malformed reading: {0}")]
    Malformed(String),

    /// Transport-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
