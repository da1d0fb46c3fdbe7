use std::path::PathBuf;

/// Flush/sync strategy for the chain log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMode {
    /// `fsync` after every append (safest, highest latency).
    EveryWrite,
    /// Rely on OS page-cache buffering (fastest, least durable).
    OsDefault,
}

impl Default for SyncMode {
    fn default() -> Self {
        Self::EveryWrite
    }
}

/// Configuration for a [`crate::ChainStore`].
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Storage root. Payload subdirectories and the chain log live here.
    pub root: PathBuf,
    /// File name of the chain log within the root.
    pub log_file_name: String,
    /// Flush/sync strategy for log appends.
    pub sync_mode: SyncMode,
}

impl StoreConfig {
    /// Configuration with the default log file name (`chain.log`) and
    /// sync-on-every-write durability.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            log_file_name: "chain.log".to_string(),
            sync_mode: SyncMode::default(),
        }
    }

    /// Override the chain log file name.
    pub fn with_log_file_name(mut self, name: impl Into<String>) -> Self {
        self.log_file_name = name.into();
        self
    }

    /// Override the sync strategy.
    pub fn with_sync_mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = mode;
        self
    }

    /// Full path of the chain log file.
    pub fn log_path(&self) -> PathBuf {
        self.root.join(&self.log_file_name)
    }
}
