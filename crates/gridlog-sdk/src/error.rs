use gridlog_store::StoreError;

/// Errors from recorder operations.
///
/// Sensor failures never surface here; they degrade to absence flags in
/// the recorded payload. Only storage failures are hard errors.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for recorder operations.
pub type RecorderResult<T> = Result<T, RecorderError>;
