//! Estate membership resolution.
//!
//! Estate association is not stored on the region record; it is resolved
//! through an external collaborator keyed by estate id (settings) and region
//! id (reverse lookup). Storage cannot join against it, so estate scoping is
//! always applied in-process, after the flag filter has been pushed down.
//!
//! The policy throughout is fail-closed: when the collaborator cannot
//! resolve, estate-scoped queries return nothing rather than leaking regions
//! across estate boundaries.

use std::collections::HashMap;

use parking_lot::RwLock;

use griddir_error::GridDirError;
use griddir_types::{OwnerId, RegionId, RegionRecord};

/// Settings of one estate as the collaborator reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstateSettings {
    pub estate_id: u32,
    pub owner: OwnerId,
}

/// The estate-settings collaborator.
pub trait EstateProvider: Send + Sync {
    /// Settings for an estate id.
    ///
    /// # Errors
    ///
    /// `EstateUnresolvable` when the estate is unknown or the collaborator
    /// is unreachable.
    fn estate_settings(&self, estate_id: u32) -> Result<EstateSettings, GridDirError>;

    /// Reverse lookup: the estate a region belongs to.
    ///
    /// # Errors
    ///
    /// `EstateUnresolvable` when no mapping exists or the collaborator is
    /// unreachable.
    fn estate_for_region(&self, region: RegionId) -> Result<u32, GridDirError>;
}

/// Whether one candidate belongs to the target estate: its stored owner must
/// equal the estate's owner AND its reverse-resolved estate id must equal
/// the estate's id. An unresolvable candidate is treated as a non-member.
#[must_use]
pub fn belongs_to_estate(
    record: &RegionRecord,
    settings: EstateSettings,
    estates: &dyn EstateProvider,
) -> bool {
    record.owner == settings.owner
        && estates
            .estate_for_region(record.region)
            .is_ok_and(|estate_id| estate_id == settings.estate_id)
}

/// In-memory estate provider; backs the test suite and small deployments.
#[derive(Default)]
pub struct MemoryEstates {
    inner: RwLock<EstateTables>,
}

#[derive(Default)]
struct EstateTables {
    settings: HashMap<u32, EstateSettings>,
    regions: HashMap<RegionId, u32>,
}

impl MemoryEstates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_estate(&self, estate_id: u32, owner: OwnerId) {
        self.inner
            .write()
            .settings
            .insert(estate_id, EstateSettings { estate_id, owner });
    }

    pub fn link_region(&self, region: RegionId, estate_id: u32) {
        self.inner.write().regions.insert(region, estate_id);
    }
}

impl EstateProvider for MemoryEstates {
    fn estate_settings(&self, estate_id: u32) -> Result<EstateSettings, GridDirError> {
        self.inner
            .read()
            .settings
            .get(&estate_id)
            .copied()
            .ok_or(GridDirError::EstateUnresolvable { estate_id })
    }

    fn estate_for_region(&self, region: RegionId) -> Result<u32, GridDirError> {
        self.inner
            .read()
            .regions
            .get(&region)
            .copied()
            .ok_or(GridDirError::EstateUnresolvable { estate_id: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_requires_owner_and_estate_match() {
        let estates = MemoryEstates::new();
        let owner = OwnerId::random();
        estates.define_estate(7, owner);

        let mut record = RegionRecord::new(RegionId::random(), "estate region", 0, 0);
        record.owner = owner;
        estates.link_region(record.region, 7);

        let settings = estates.estate_settings(7).expect("settings");
        assert!(belongs_to_estate(&record, settings, &estates));

        // Same estate link, different owner.
        let mut foreign = record.clone();
        foreign.owner = OwnerId::random();
        assert!(!belongs_to_estate(&foreign, settings, &estates));

        // Same owner, linked to another estate.
        let mut other = RegionRecord::new(RegionId::random(), "other", 0, 0);
        other.owner = owner;
        estates.link_region(other.region, 8);
        assert!(!belongs_to_estate(&other, settings, &estates));
    }

    #[test]
    fn test_unlinked_region_fails_closed() {
        let estates = MemoryEstates::new();
        let owner = OwnerId::random();
        estates.define_estate(7, owner);
        let settings = estates.estate_settings(7).expect("settings");

        let mut record = RegionRecord::new(RegionId::random(), "unlinked", 0, 0);
        record.owner = owner;
        assert!(!belongs_to_estate(&record, settings, &estates));
    }

    #[test]
    fn test_unknown_estate_is_unresolvable() {
        let estates = MemoryEstates::new();
        assert!(matches!(
            estates.estate_settings(99),
            Err(GridDirError::EstateUnresolvable { estate_id: 99 })
        ));
    }
}
