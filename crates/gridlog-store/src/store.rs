use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use tracing::debug;

use gridlog_crypto::AddressHasher;
use gridlog_types::{ChainAddress, Payload};

use crate::chain::{ChainFile, ChainIter, ChainLink};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::log::ChainLog;

/// Durable, ordered, hash-addressable record of payload files.
///
/// The store owns the in-memory head link and the chain log. The head only
/// advances through [`ChainStore::add_to_chain`], and only after the log
/// write for the new link has succeeded.
///
/// On-disk layout under the storage root:
///
/// ```text
/// <root>/
///   chain.log
///   production/<YYYY-MM-DD-HH:MM:SS>.json
///   consumption/<YYYY-MM-DD-HH:MM:SS>.json
/// ```
pub struct ChainStore {
    root: PathBuf,
    log: ChainLog,
    head: Option<ChainLink>,
}

impl ChainStore {
    /// Open a store, creating the storage directory if absent and
    /// recovering the chain from the log.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        fs::create_dir_all(&config.root)?;

        let log_path = config.log_path();
        let mut head: Option<ChainLink> = None;
        for data in ChainLog::recover(&log_path) {
            head = Some(ChainLink::new(data, head.map(Box::new)));
        }
        let log = ChainLog::open(&log_path, config.sync_mode)?;

        debug!(
            root = %config.root.display(),
            links = head.as_ref().map_or(0, ChainLink::depth),
            "chain store opened"
        );
        Ok(Self {
            root: config.root,
            log,
            head,
        })
    }

    /// Append a payload to the chain.
    ///
    /// Serializes the payload to a timestamped JSON file under the variant's
    /// subdirectory, appends the new link to the chain log, and advances the
    /// head. Returns the payload file name.
    ///
    /// Any I/O failure is fatal to the call and leaves the head unchanged.
    pub fn add_to_chain(&mut self, payload: &Payload) -> StoreResult<String> {
        self.add_to_chain_at(payload, Local::now())
    }

    pub(crate) fn add_to_chain_at(
        &mut self,
        payload: &Payload,
        recorded_at: DateTime<Local>,
    ) -> StoreResult<String> {
        let subdirectory = payload.kind().subdirectory();
        fs::create_dir_all(self.root.join(subdirectory))?;

        let file_name = payload_file_name(&recorded_at);
        let relative_path = format!("{subdirectory}/{file_name}");
        let bytes = serde_json::to_vec(payload)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        // Same-second appends share a file name; the last write wins.
        fs::write(self.root.join(&relative_path), bytes)?;

        let data = ChainFile::new(relative_path, recorded_at.with_timezone(&Utc));
        self.log.append(&data)?;

        let previous = self.head.take().map(Box::new);
        self.head = Some(ChainLink::new(data, previous));
        Ok(file_name)
    }

    /// Content address of the file referenced by the chain head, or the
    /// sentinel `0x0` for an empty chain.
    ///
    /// A pure read with I/O; never mutates the store.
    pub fn last_hash(&self) -> StoreResult<ChainAddress> {
        match &self.head {
            None => Ok(ChainAddress::empty()),
            Some(link) => Ok(AddressHasher::hash_file(&self.resolve(&link.data))?),
        }
    }

    /// Explicit head assignment. The only accepted value is `None`, which
    /// clears the chain and truncates the log; anything else is an
    /// invariant violation. The head advances through `add_to_chain` alone.
    pub fn set_head(&mut self, head: Option<ChainLink>) -> StoreResult<()> {
        if head.is_some() {
            return Err(StoreError::HeadReassignment);
        }
        self.log.truncate()?;
        self.head = None;
        Ok(())
    }

    /// Read and decode the payload file referenced by a chain entry.
    pub fn read_payload(&self, file: &ChainFile) -> StoreResult<Payload> {
        let bytes = fs::read(self.resolve(file))?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Absolute path of a chain entry's payload file.
    pub fn resolve(&self, file: &ChainFile) -> PathBuf {
        self.root.join(&file.file_path)
    }

    /// The current head link, if any.
    pub fn head(&self) -> Option<&ChainLink> {
        self.head.as_ref()
    }

    /// Number of links in the chain.
    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, ChainLink::depth)
    }

    /// Returns `true` if the chain has no entries.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterate over the chain, newest first.
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter::new(self.head.as_ref())
    }

    /// The storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Payload file name for a wall-clock timestamp, second precision.
fn payload_file_name(recorded_at: &DateTime<Local>) -> String {
    format!("{}.json", recorded_at.format("%Y-%m-%d-%H:%M:%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gridlog_types::{
        ConsumedData, ConsumptionRecord, EnergyReading, MeterDevice, Payload, ProducedData,
        ProductionRecord,
    };

    fn production(energy: f64, previous_hash: ChainAddress) -> Payload {
        Payload::Production(ProductionRecord {
            raw_energy: Some(EnergyReading {
                energy,
                device: MeterDevice::accumulated("dl-v2"),
            }),
            raw_carbon_emitted: None,
            produced: ProducedData {
                energy,
                is_meter_down: false,
                previous_hash,
                co2_saved: 0,
                is_co2_down: true,
            },
        })
    }

    fn consumption(energy: f64, previous_hash: ChainAddress) -> Payload {
        Payload::Consumption(ConsumptionRecord {
            raw_energy: Some(EnergyReading {
                energy,
                device: MeterDevice::accumulated("dl-v2"),
            }),
            consumed: ConsumedData {
                energy,
                previous_hash,
                is_meter_down: false,
            },
        })
    }

    fn open(dir: &Path) -> ChainStore {
        ChainStore::open(StoreConfig::new(dir)).unwrap()
    }

    #[test]
    fn empty_store_last_hash_is_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());
        assert!(store.is_empty());
        assert_eq!(store.last_hash().unwrap().as_str(), "0x0");
    }

    #[test]
    fn append_advances_head_and_links_backward() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());

        let first = store
            .add_to_chain_at(
                &production(1.0, ChainAddress::empty()),
                Local.with_ymd_and_hms(2026, 8, 7, 10, 0, 0).unwrap(),
            )
            .unwrap();
        store
            .add_to_chain_at(
                &production(2.0, ChainAddress::empty()),
                Local.with_ymd_and_hms(2026, 8, 7, 10, 0, 30).unwrap(),
            )
            .unwrap();

        assert_eq!(store.len(), 2);
        let head = store.head().unwrap();
        let previous = head.previous.as_deref().unwrap();
        assert!(previous.data.file_path.ends_with(&first));
        assert!(previous.previous.is_none());
    }

    #[test]
    fn last_hash_matches_head_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());

        let first = production(5.0, ChainAddress::empty());
        store.add_to_chain(&first).unwrap();

        let expected =
            AddressHasher::hash_file(&store.resolve(&store.head().unwrap().data)).unwrap();
        assert_eq!(store.last_hash().unwrap(), expected);
    }

    #[test]
    fn last_hash_before_append_names_prior_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());

        store
            .add_to_chain_at(
                &production(5.0, ChainAddress::empty()),
                Local.with_ymd_and_hms(2026, 8, 7, 10, 0, 0).unwrap(),
            )
            .unwrap();
        let first_file = store.resolve(&store.head().unwrap().data);
        let hash_of_first = store.last_hash().unwrap();

        store
            .add_to_chain_at(
                &production(6.0, hash_of_first.clone()),
                Local.with_ymd_and_hms(2026, 8, 7, 10, 0, 30).unwrap(),
            )
            .unwrap();

        assert_eq!(
            hash_of_first,
            AddressHasher::hash_file(&first_file).unwrap()
        );
        let head_payload = store.read_payload(&store.head().unwrap().data).unwrap();
        assert_eq!(*head_payload.previous_hash(), hash_of_first);
    }

    #[test]
    fn reopen_reproduces_head() {
        let dir = tempfile::tempdir().unwrap();

        let head_before = {
            let mut store = open(dir.path());
            store
                .add_to_chain_at(
                    &production(1.0, ChainAddress::empty()),
                    Local.with_ymd_and_hms(2026, 8, 7, 10, 0, 0).unwrap(),
                )
                .unwrap();
            store
                .add_to_chain_at(
                    &consumption(2.0, ChainAddress::empty()),
                    Local.with_ymd_and_hms(2026, 8, 7, 10, 0, 30).unwrap(),
                )
                .unwrap();
            store.head().unwrap().clone()
        };

        let store = open(dir.path());
        assert_eq!(store.head(), Some(&head_before));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn garbage_log_recovers_as_empty_chain() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chain.log"), [0xFFu8; 16]).unwrap();

        let store = open(dir.path());
        assert!(store.is_empty());
        assert!(store.last_hash().unwrap().is_empty_chain());
    }

    #[test]
    fn payload_files_land_in_variant_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());

        let produced = store
            .add_to_chain(&production(1.0, ChainAddress::empty()))
            .unwrap();
        let consumed = store
            .add_to_chain(&consumption(2.0, ChainAddress::empty()))
            .unwrap();

        assert!(dir.path().join("production").join(&produced).exists());
        assert!(dir.path().join("consumption").join(&consumed).exists());
    }

    #[test]
    fn file_names_are_second_precision_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());

        let name = store
            .add_to_chain_at(
                &production(1.0, ChainAddress::empty()),
                Local.with_ymd_and_hms(2026, 8, 7, 9, 5, 3).unwrap(),
            )
            .unwrap();
        assert_eq!(name, "2026-08-07-09:05:03.json");
    }

    #[test]
    fn same_second_appends_overwrite_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        let at = Local.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();

        let first = production(1.0, ChainAddress::empty());
        let second = production(2.0, ChainAddress::empty());
        let name_a = store.add_to_chain_at(&first, at).unwrap();
        let name_b = store.add_to_chain_at(&second, at).unwrap();

        // Two links, one file: the second write wins for that second.
        assert_eq!(name_a, name_b);
        assert_eq!(store.len(), 2);
        let files: Vec<_> = std::fs::read_dir(dir.path().join("production"))
            .unwrap()
            .collect();
        assert_eq!(files.len(), 1);
        let on_disk = store.read_payload(&store.head().unwrap().data).unwrap();
        assert_eq!(on_disk, second);
    }

    #[test]
    fn failed_payload_write_leaves_head_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        // Block the subdirectory with a plain file so create_dir_all fails.
        std::fs::write(dir.path().join("production"), b"in the way").unwrap();

        let result = store.add_to_chain(&production(1.0, ChainAddress::empty()));
        assert!(result.is_err());
        assert!(store.is_empty());
        assert!(store.last_hash().unwrap().is_empty_chain());
    }

    #[test]
    fn set_head_rejects_non_empty_assignment() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        store
            .add_to_chain(&production(1.0, ChainAddress::empty()))
            .unwrap();

        let stray = store.head().unwrap().clone();
        let err = store.set_head(Some(stray)).unwrap_err();
        assert!(matches!(err, StoreError::HeadReassignment));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_head_none_clears_durably() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        store
            .add_to_chain(&production(1.0, ChainAddress::empty()))
            .unwrap();

        store.set_head(None).unwrap();
        assert!(store.is_empty());
        assert!(store.last_hash().unwrap().is_empty_chain());

        drop(store);
        let store = open(dir.path());
        assert!(store.is_empty());
    }

    #[test]
    fn iter_walks_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());

        store
            .add_to_chain_at(
                &production(1.0, ChainAddress::empty()),
                Local.with_ymd_and_hms(2026, 8, 7, 10, 0, 0).unwrap(),
            )
            .unwrap();
        store
            .add_to_chain_at(
                &production(2.0, ChainAddress::empty()),
                Local.with_ymd_and_hms(2026, 8, 7, 10, 0, 30).unwrap(),
            )
            .unwrap();

        let paths: Vec<&str> = store.iter().map(|l| l.data.file_path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "production/2026-08-07-10:00:30.json",
                "production/2026-08-07-10:00:00.json",
            ]
        );
    }
}
