use tracing::info;

use gridlog_ingest::{build_consumption, build_production, InputConfig};
use gridlog_store::{ChainStore, ChainVerifier, StoreConfig, VerifyReport};
use gridlog_types::{AccumulatedState, Payload};

use crate::error::RecorderResult;

/// Records meter readings into the chain, one entry per call.
///
/// Each `record_*` call performs the canonical sequence: read the current
/// head's address, build the payload from the configured sensors, append.
/// The address is taken immediately before the build; nothing else may
/// append to the same store in between (single-writer discipline is the
/// embedder's responsibility).
pub struct EnergyRecorder {
    store: ChainStore,
    config: InputConfig,
}

/// What a `record_*` call appended.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordOutcome {
    /// Name of the payload file written under the variant subdirectory.
    pub file_name: String,
    /// The payload as persisted, including derived accounting fields.
    pub payload: Payload,
}

impl EnergyRecorder {
    /// Open the chain store and wire it to the given sensor configuration.
    pub fn open(store_config: StoreConfig, config: InputConfig) -> RecorderResult<Self> {
        let store = ChainStore::open(store_config)?;
        Ok(Self { store, config })
    }

    /// Record a production entry.
    ///
    /// Sensor failures degrade to absence flags in the payload; only
    /// storage failures error out, leaving the chain unchanged.
    pub fn record_production(
        &mut self,
        state: &AccumulatedState,
    ) -> RecorderResult<RecordOutcome> {
        let last_hash = self.store.last_hash()?;
        let record = build_production(&self.config, last_hash, state);
        self.append(Payload::Production(record))
    }

    /// Record a consumption entry.
    pub fn record_consumption(
        &mut self,
        state: &AccumulatedState,
    ) -> RecorderResult<RecordOutcome> {
        let last_hash = self.store.last_hash()?;
        let record = build_consumption(&self.config, last_hash, state);
        self.append(Payload::Consumption(record))
    }

    fn append(&mut self, payload: Payload) -> RecorderResult<RecordOutcome> {
        let file_name = self.store.add_to_chain(&payload)?;
        info!(
            file = %file_name,
            kind = %payload.kind(),
            meter_down = payload.is_meter_down(),
            "recorded chain entry"
        );
        Ok(RecordOutcome { file_name, payload })
    }

    /// Offline integrity check of the whole chain.
    pub fn verify(&self) -> VerifyReport {
        ChainVerifier::verify(&self.store)
    }

    /// The underlying chain store.
    pub fn store(&self) -> &ChainStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use gridlog_crypto::AddressHasher;
    use gridlog_ingest::{ExternalDataSource, SourceError};
    use gridlog_types::{CarbonReading, EnergyReading, MeterDevice};

    struct StaticMeter {
        energy: f64,
    }

    impl ExternalDataSource for StaticMeter {
        type Reading = EnergyReading;

        fn read_state(&self) -> Result<EnergyReading, SourceError> {
            Ok(EnergyReading {
                energy: self.energy,
                device: MeterDevice::accumulated("dl-v2"),
            })
        }
    }

    struct StaticCarbon;

    impl ExternalDataSource for StaticCarbon {
        type Reading = CarbonReading;

        fn read_state(&self) -> Result<CarbonReading, SourceError> {
            Ok(CarbonReading {
                accumulated_co2: 0.002,
            })
        }
    }

    struct OfflineMeter;

    impl ExternalDataSource for OfflineMeter {
        type Reading = EnergyReading;

        fn read_state(&self) -> Result<EnergyReading, SourceError> {
            Err(SourceError::Unavailable("meter offline".to_string()))
        }
    }

    fn recorder(dir: &std::path::Path, energy: f64) -> EnergyRecorder {
        let config = InputConfig::new(Box::new(StaticMeter { energy }))
            .with_carbon_emission(Box::new(StaticCarbon));
        EnergyRecorder::open(StoreConfig::new(dir), config).unwrap()
    }

    #[test]
    fn first_record_references_the_empty_chain() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = recorder(dir.path(), 10.0);

        let outcome = recorder
            .record_production(&AccumulatedState::default())
            .unwrap();
        assert!(outcome.payload.previous_hash().is_empty_chain());
        assert_eq!(outcome.payload.energy(), 10.0);
        assert_eq!(recorder.store().len(), 1);
    }

    #[test]
    fn successive_records_chain_by_content_hash() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = recorder(dir.path(), 10.0);

        recorder
            .record_production(&AccumulatedState::default())
            .unwrap();
        let first_file = recorder.store().resolve(&recorder.store().head().unwrap().data);
        let hash_of_first = recorder.store().last_hash().unwrap();

        // Same-second appends share a payload file name; wait out the tick.
        std::thread::sleep(Duration::from_millis(1100));
        let outcome = recorder
            .record_production(&AccumulatedState::default())
            .unwrap();

        assert_eq!(*outcome.payload.previous_hash(), hash_of_first);
        assert_eq!(
            hash_of_first,
            AddressHasher::hash_file(&first_file).unwrap()
        );
        assert_eq!(recorder.store().len(), 2);

        let report = recorder.verify();
        assert!(report.is_valid(), "violations: {:?}", report.violations);
    }

    #[test]
    fn meter_down_still_persists_with_prior_hash() {
        let dir = tempfile::tempdir().unwrap();
        let hash_of_first = {
            let mut recorder = recorder(dir.path(), 10.0);
            recorder
                .record_production(&AccumulatedState::default())
                .unwrap();
            recorder.store().last_hash().unwrap()
        };

        let config = InputConfig::new(Box::new(OfflineMeter));
        let mut recorder = EnergyRecorder::open(StoreConfig::new(dir.path()), config).unwrap();
        std::thread::sleep(Duration::from_millis(1100));
        let outcome = recorder
            .record_production(&AccumulatedState::default())
            .unwrap();

        assert!(outcome.payload.is_meter_down());
        assert_eq!(outcome.payload.energy(), 0.0);
        assert_eq!(*outcome.payload.previous_hash(), hash_of_first);
        assert_eq!(recorder.store().len(), 2);
    }

    #[test]
    fn consumption_records_under_its_own_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = recorder(dir.path(), 3.0);

        let outcome = recorder
            .record_consumption(&AccumulatedState::default())
            .unwrap();
        assert!(dir
            .path()
            .join("consumption")
            .join(&outcome.file_name)
            .exists());
        assert!(matches!(outcome.payload, Payload::Consumption(_)));
    }

    #[test]
    fn reopening_preserves_the_chain() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut recorder = recorder(dir.path(), 5.0);
            recorder
                .record_production(&AccumulatedState::default())
                .unwrap();
        }

        let recorder = recorder(dir.path(), 5.0);
        assert_eq!(recorder.store().len(), 1);
        assert!(!recorder.store().last_hash().unwrap().is_empty_chain());
    }
}
