//! Estate-scoped pagination: the two-level filter (flags pushed to storage,
//! estate membership applied in-process) and its fail-closed edges.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use griddir_directory::codec::{COLUMNS, KEY_COLUMN};
use griddir_directory::{DirectoryConfig, EstateProvider, MemoryEstates, RegionDirectory};
use griddir_error::Result;
use griddir_store::{MemoryStore, QueryFilter, RegionStore, SortSpec};
use griddir_types::{FieldValue, FixedClock, OwnerId, RegionFlags, RegionId, RegionRecord};

const NOW: i64 = 1_700_000_000;
const ESTATE: u32 = 7;

/// Store decorator counting query round-trips.
struct CountingStore {
    inner: MemoryStore,
    queries: AtomicU32,
}

impl CountingStore {
    fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            queries: AtomicU32::new(0),
        }
    }

    fn query_count(&self) -> u32 {
        self.queries.load(Ordering::SeqCst)
    }
}

impl RegionStore for CountingStore {
    fn query(
        &self,
        columns: &[&str],
        realm: &str,
        filter: &QueryFilter,
        sort: &[SortSpec],
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<FieldValue>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query(columns, realm, filter, sort, offset, limit)
    }

    fn replace(&self, realm: &str, columns: &[&str], values: &[FieldValue]) -> Result<bool> {
        self.inner.replace(realm, columns, values)
    }

    fn delete(&self, realm: &str, columns: &[&str], values: &[FieldValue]) -> Result<bool> {
        self.inner.delete(realm, columns, values)
    }
}

struct Fixture {
    directory: RegionDirectory,
    store: Arc<CountingStore>,
    estates: Arc<MemoryEstates>,
    owner: OwnerId,
}

/// Five default-flagged regions; the last three belong to estate 7, so the
/// first storage page is all non-members.
fn fixture() -> Fixture {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let config = DirectoryConfig::default();
    let inner = MemoryStore::new();
    inner.create_realm(&config.realm, &COLUMNS, KEY_COLUMN);
    let store = Arc::new(CountingStore::new(inner));

    let estates = Arc::new(MemoryEstates::new());
    let owner = OwnerId::random();
    estates.define_estate(ESTATE, owner);

    let directory = RegionDirectory::with_clock(
        store.clone(),
        estates.clone(),
        Arc::new(FixedClock(NOW)),
        config,
    );

    for n in 0..5 {
        let mut record = RegionRecord::new(RegionId::random(), format!("default-{n}"), n, 0);
        record.flags = RegionFlags::DEFAULT_REGION;
        record.last_seen = NOW;
        record.owner = owner;
        if n >= 2 {
            estates.link_region(record.region, ESTATE);
        } else {
            // Same owner, different estate: must never leak into the page.
            estates.link_region(record.region, ESTATE + 1);
        }
        assert!(directory.store(&record));
    }

    Fixture {
        directory,
        store,
        estates,
        owner,
    }
}

#[test]
fn test_page_is_capped_and_needs_extra_round_trip() {
    let f = fixture();

    let page = f
        .directory
        .get_estate_page(0, 2, ESTATE, RegionFlags::DEFAULT_REGION, &[])
        .expect("page");

    assert_eq!(page.len(), 2);
    assert!(page.iter().all(|record| record.owner == f.owner));
    // First batch of 2 rows cannot be guaranteed to hold 2 estate members,
    // so at least one extra round-trip happens before the page fills.
    assert!(f.store.query_count() >= 2, "count={}", f.store.query_count());
}

#[test]
fn test_unbounded_page_returns_exactly_the_estate_members() {
    let f = fixture();

    let page = f
        .directory
        .get_estate_page(0, 100, ESTATE, RegionFlags::DEFAULT_REGION, &[])
        .expect("page");

    assert_eq!(page.len(), 3);
    for record in &page {
        assert_eq!(
            f.estates.estate_for_region(record.region).expect("linked"),
            ESTATE
        );
    }
}

#[test]
fn test_count_matches_unbounded_page() {
    let f = fixture();

    let count = f
        .directory
        .count_by_estate(ESTATE, RegionFlags::DEFAULT_REGION)
        .expect("count");
    let page = f
        .directory
        .get_estate_page(0, u32::MAX, ESTATE, RegionFlags::DEFAULT_REGION, &[])
        .expect("page");

    assert_eq!(count as usize, page.len());
}

#[test]
fn test_zero_count_short_circuits() {
    let f = fixture();
    let page = f
        .directory
        .get_estate_page(0, 0, ESTATE, RegionFlags::DEFAULT_REGION, &[])
        .expect("page");
    assert!(page.is_empty());
    assert_eq!(f.store.query_count(), 0);
}

#[test]
fn test_unknown_estate_fails_closed() {
    let f = fixture();

    let page = f
        .directory
        .get_estate_page(0, 10, 999, RegionFlags::DEFAULT_REGION, &[])
        .expect("page");
    assert!(page.is_empty());

    let count = f
        .directory
        .count_by_estate(999, RegionFlags::DEFAULT_REGION)
        .expect("count");
    assert_eq!(count, 0);
}

#[test]
fn test_under_advanced_offset_can_repeat_a_record_across_rounds() {
    // The offset advances by the remainder needed before a round, not by
    // the rows returned. Once the page is partially full, the next round
    // re-reads the previous batch's tail, and a member sitting in that
    // overlap is accepted a second time. Preserved behavior of the system
    // this directory replaces; this test pins it.
    let config = DirectoryConfig::default();
    let inner = MemoryStore::new();
    inner.create_realm(&config.realm, &COLUMNS, KEY_COLUMN);
    let store = Arc::new(CountingStore::new(inner));

    let estates = Arc::new(MemoryEstates::new());
    let owner = OwnerId::random();
    estates.define_estate(ESTATE, owner);

    let directory = RegionDirectory::with_clock(
        store,
        estates.clone(),
        Arc::new(FixedClock(NOW)),
        config,
    );

    // Members at row indices 3 and 8; everything else same-owner regions in
    // another estate. With count = 3: round 1 reads rows 0-2 (none accepted,
    // offset -> 3), round 2 reads 3-5 (accepts m1, offset -> 6), round 3
    // needs 2 more and reads 6-8 (accepts m2, offset -> 8), round 4 needs 1
    // and re-reads row 8, accepting m2 again.
    let member_rows = [3_usize, 8];
    for n in 0..11_usize {
        let mut record =
            RegionRecord::new(RegionId::random(), format!("row-{n}"), n as i32, 0);
        record.flags = RegionFlags::DEFAULT_REGION;
        record.last_seen = NOW;
        record.owner = owner;
        let estate = if member_rows.contains(&n) { ESTATE } else { ESTATE + 1 };
        estates.link_region(record.region, estate);
        assert!(directory.store(&record));
    }

    let page = directory
        .get_estate_page(0, 3, ESTATE, RegionFlags::DEFAULT_REGION, &[])
        .expect("page");

    let names: Vec<&str> = page.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, vec!["row-3", "row-8", "row-8"]);
    assert_eq!(page[1].region, page[2].region);
}

#[test]
fn test_flag_mismatch_yields_empty_page() {
    let f = fixture();
    let page = f
        .directory
        .get_estate_page(0, 10, ESTATE, RegionFlags::FALLBACK_REGION, &[])
        .expect("page");
    assert!(page.is_empty());
}
