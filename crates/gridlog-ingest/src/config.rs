use gridlog_types::{CarbonReading, EnergyReading};

use crate::source::ExternalDataSource;

/// The external sources one recorded asset reads from.
///
/// Consumption-only assets carry no carbon-emission source; production
/// assets without one simply record CO2 tracking as down.
pub struct InputConfig {
    pub energy: Box<dyn ExternalDataSource<Reading = EnergyReading>>,
    pub carbon_emission: Option<Box<dyn ExternalDataSource<Reading = CarbonReading>>>,
}

impl InputConfig {
    /// Configuration with an energy meter only.
    pub fn new(energy: Box<dyn ExternalDataSource<Reading = EnergyReading>>) -> Self {
        Self {
            energy,
            carbon_emission: None,
        }
    }

    /// Attach a carbon-emission source.
    pub fn with_carbon_emission(
        mut self,
        source: Box<dyn ExternalDataSource<Reading = CarbonReading>>,
    ) -> Self {
        self.carbon_emission = Some(source);
        self
    }
}
