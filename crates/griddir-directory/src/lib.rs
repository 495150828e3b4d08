//! Region directory service.
//!
//! A stateless service over an injected [`RegionStore`]: region hosts upsert
//! their record on startup and every heartbeat, and other grid components
//! query the directory by name, coordinate, bounding box, flag set, or
//! estate. The hard path is the estate-scoped page: storage understands the
//! flag bitmask but not estate membership, so the directory pushes the flag
//! filter down and streams batches through the in-process estate filter
//! until the page is full or storage is exhausted.
//!
//! All operations are synchronous and independently atomic at the storage
//! layer. Nothing here holds a lock across storage round-trips; a paged
//! query racing concurrent upserts may miss or double-count records, which
//! is the accepted eventually-consistent contract.

pub mod codec;
pub mod estate;
pub mod liveness;
pub mod rank;

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use griddir_error::Result;
use griddir_store::{QueryFilter, RegionStore, SortSpec};
use griddir_types::{Clock, FieldValue, RegionFlags, RegionId, RegionRecord, ScopeId, SystemClock};

pub use estate::{EstateProvider, EstateSettings, MemoryEstates};
pub use liveness::STALE_AFTER_SECS;

/// Directory configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Logical storage table holding region rows.
    pub realm: String,
    /// Liveness threshold, seconds; see [`liveness::mark_liveness`].
    pub stale_after_secs: i64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            realm: "gridregions".to_owned(),
            stale_after_secs: STALE_AFTER_SECS,
        }
    }
}

/// The region directory.
pub struct RegionDirectory {
    store: Arc<dyn RegionStore>,
    estates: Arc<dyn EstateProvider>,
    clock: Arc<dyn Clock>,
    config: DirectoryConfig,
}

impl RegionDirectory {
    /// Build a directory over its collaborators with the default wall clock.
    pub fn new(
        store: Arc<dyn RegionStore>,
        estates: Arc<dyn EstateProvider>,
        config: DirectoryConfig,
    ) -> Self {
        Self::with_clock(store, estates, Arc::new(SystemClock), config)
    }

    /// As [`RegionDirectory::new`] with an explicit clock; tests pin time
    /// through this.
    pub fn with_clock(
        store: Arc<dyn RegionStore>,
        estates: Arc<dyn EstateProvider>,
        clock: Arc<dyn Clock>,
        config: DirectoryConfig,
    ) -> Self {
        Self {
            store,
            estates,
            clock,
            config,
        }
    }

    /// Insert-or-replace a record keyed by its region id. `false` on
    /// storage failure; a duplicate key is absorbed by replace semantics,
    /// never an error.
    pub fn store(&self, record: &RegionRecord) -> bool {
        debug!(region = %record.region, name = %record.name, "store region");
        let row = match codec::encode(record) {
            Ok(row) => row,
            Err(err) => {
                warn!(region = %record.region, %err, "region record failed to encode");
                return false;
            }
        };
        match self.store.replace(&self.config.realm, &codec::COLUMNS, &row) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(region = %record.region, %err, "store failed");
                false
            }
        }
    }

    /// Delete one record by region id. `false` on storage failure.
    pub fn remove(&self, region: RegionId) -> bool {
        let outcome = self.store.delete(
            &self.config.realm,
            &[codec::KEY_COLUMN],
            &[FieldValue::from(region.as_uuid())],
        );
        match outcome {
            Ok(removed) => removed,
            Err(err) => {
                warn!(%region, %err, "remove failed");
                false
            }
        }
    }

    /// Bulk delete by equality criteria. `false` on storage failure.
    pub fn remove_where(&self, criteria: &[(&str, FieldValue)]) -> bool {
        let columns: Vec<&str> = criteria.iter().map(|(column, _)| *column).collect();
        let values: Vec<FieldValue> = criteria.iter().map(|(_, value)| value.clone()).collect();
        match self.store.delete(&self.config.realm, &columns, &values) {
            Ok(removed) => removed,
            Err(err) => {
                warn!(%err, "bulk remove failed");
                false
            }
        }
    }

    /// Pattern search on region name, scope-exact when `scope` is non-zero.
    /// The caller escapes pattern metacharacters before calling.
    pub fn get_by_name(&self, name: &str, scope: ScopeId) -> Result<Vec<RegionRecord>> {
        let mut filter = QueryFilter::new();
        filter.and_like("RegionName", name);
        scope_filter(&mut filter, scope);
        self.fetch(&filter, &[], None, None)
    }

    /// All records whose flags intersect `flags` (ANY-of-bits).
    pub fn get_by_flags(&self, flags: RegionFlags) -> Result<Vec<RegionRecord>> {
        let mut filter = QueryFilter::new();
        filter.and_bits("Flags", u64::from(flags.bits()));
        self.fetch(&filter, &[], None, None)
    }

    /// Exact-coordinate lookup. First match wins if duplicates exist, which
    /// the uniqueness invariant says should not happen.
    pub fn get_by_position(&self, x: i32, y: i32, scope: ScopeId) -> Result<Option<RegionRecord>> {
        let mut filter = QueryFilter::new();
        filter.and_eq("LocX", x).and_eq("LocY", y);
        scope_filter(&mut filter, scope);
        Ok(self.fetch(&filter, &[], None, None)?.into_iter().next())
    }

    /// Lookup by region id.
    pub fn get_by_id(&self, region: RegionId, scope: ScopeId) -> Result<Option<RegionRecord>> {
        let mut filter = QueryFilter::new();
        filter.and_eq("RegionUUID", region.as_uuid());
        scope_filter(&mut filter, scope);
        Ok(self.fetch(&filter, &[], None, None)?.into_iter().next())
    }

    /// All records inside the inclusive bounding box.
    pub fn get_in_area(
        &self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        scope: ScopeId,
    ) -> Result<Vec<RegionRecord>> {
        let mut filter = QueryFilter::new();
        filter
            .and_ge("LocX", i64::from(x0))
            .and_le("LocX", i64::from(x1))
            .and_ge("LocY", i64::from(y0))
            .and_le("LocY", i64::from(y1));
        scope_filter(&mut filter, scope);
        self.fetch(&filter, &[], None, None)
    }

    /// One page of an estate's regions: flag filter pushed into storage,
    /// estate membership applied in-process.
    ///
    /// Each round queries `count` rows at the advancing offset, keeps the
    /// estate's members, and stops once the page is full or a batch comes
    /// back empty. The offset advances by the remainder that was still
    /// needed before the round, not by the rows actually returned; once the
    /// page is partially full the next round re-reads the tail of the
    /// previous batch, and a member sitting in that overlap is accepted
    /// again (decode dedups within one batch only). Replicated as-is from
    /// the system this directory replaces.
    ///
    /// Fail-closed: an unavailable estate collaborator yields an empty page.
    pub fn get_estate_page(
        &self,
        start: u32,
        count: u32,
        estate_id: u32,
        flags: RegionFlags,
        sort: &[SortSpec],
    ) -> Result<Vec<RegionRecord>> {
        let mut page = Vec::new();
        if count == 0 {
            return Ok(page);
        }
        let settings = match self.estates.estate_settings(estate_id) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(estate_id, %err, "estate unresolvable; returning empty page");
                return Ok(page);
            }
        };

        let mut filter = QueryFilter::new();
        filter.and_bits("Flags", u64::from(flags.bits()));

        let mut offset = start;
        while (page.len() as u32) < count {
            let remaining = count - page.len() as u32;
            let batch = self.fetch(&filter, sort, Some(offset), Some(count))?;
            if batch.is_empty() {
                break;
            }
            for record in batch {
                if estate::belongs_to_estate(&record, settings, self.estates.as_ref()) {
                    page.push(record);
                }
            }
            offset = offset.saturating_add(remaining);
        }

        page.truncate(count as usize);
        debug!(estate_id, start, count, hits = page.len(), "estate page");
        Ok(page)
    }

    /// How many of an estate's regions match `flags`. Single unpaginated
    /// query; fail-closed zero when the estate collaborator is unavailable.
    pub fn count_by_estate(&self, estate_id: u32, flags: RegionFlags) -> Result<u32> {
        let settings = match self.estates.estate_settings(estate_id) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(estate_id, %err, "estate unresolvable; counting zero");
                return Ok(0);
            }
        };

        let mut filter = QueryFilter::new();
        filter.and_bits("Flags", u64::from(flags.bits()));
        let candidates = self.fetch(&filter, &[], None, None)?;
        let survivors = candidates
            .iter()
            .filter(|record| estate::belongs_to_estate(record, settings, self.estates.as_ref()))
            .count();
        Ok(survivors as u32)
    }

    /// Regions flagged as preferred login targets.
    pub fn get_default_regions(&self, scope: ScopeId) -> Result<Vec<RegionRecord>> {
        self.get_by_flags_scoped(RegionFlags::DEFAULT_REGION, scope)
    }

    /// Fallback landing regions, nearest to `(x, y)` first.
    pub fn get_fallback_regions(&self, scope: ScopeId, x: i32, y: i32) -> Result<Vec<RegionRecord>> {
        let mut regions = self.get_by_flags_scoped(RegionFlags::FALLBACK_REGION, scope)?;
        rank::sort_by_distance(&mut regions, x, y);
        Ok(regions)
    }

    /// Safe landing regions, nearest first: the union of `SAFE`-flagged and
    /// `REGION_ONLINE`-flagged records. The union is not deduplicated; a
    /// region carrying both flags appears twice (kept as the consumed
    /// behavior, see DESIGN.md).
    pub fn get_safe_regions(&self, scope: ScopeId, x: i32, y: i32) -> Result<Vec<RegionRecord>> {
        let mut regions = self.get_by_flags_scoped(RegionFlags::SAFE, scope)?;
        regions.extend(self.get_by_flags_scoped(RegionFlags::REGION_ONLINE, scope)?);
        rank::sort_by_distance(&mut regions, x, y);
        Ok(regions)
    }

    fn get_by_flags_scoped(
        &self,
        flags: RegionFlags,
        scope: ScopeId,
    ) -> Result<Vec<RegionRecord>> {
        let mut filter = QueryFilter::new();
        filter.and_bits("Flags", u64::from(flags.bits()));
        scope_filter(&mut filter, scope);
        self.fetch(&filter, &[], None, None)
    }

    /// Query, decode, and apply liveness derivation. All read paths funnel
    /// through here.
    fn fetch(
        &self,
        filter: &QueryFilter,
        sort: &[SortSpec],
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<RegionRecord>> {
        let raw = self
            .store
            .query(&["*"], &self.config.realm, filter, sort, offset, limit)?;
        let mut records = codec::decode_rows(&raw).inspect_err(|err| {
            warn!(%err, realm = %self.config.realm, "rejecting malformed batch");
        })?;
        let now = self.clock.now_unix();
        for record in &mut records {
            liveness::mark_liveness(record, now, self.config.stale_after_secs);
        }
        Ok(records)
    }
}

fn scope_filter(filter: &mut QueryFilter, scope: ScopeId) {
    if !scope.is_zero() {
        filter.and_eq("ScopeID", scope.as_uuid());
    }
}
