//! griddir — region directory and spatial query engine for simulation grids.
//!
//! Umbrella crate re-exporting the workspace surface. A minimal setup:
//!
//! ```
//! use std::sync::Arc;
//! use griddir::{
//!     codec, DirectoryConfig, MemoryEstates, MemoryStore, RegionDirectory,
//!     RegionFlags, RegionId, RegionRecord, ScopeId,
//! };
//!
//! let config = DirectoryConfig::default();
//! let store = Arc::new(MemoryStore::new());
//! store.create_realm(&config.realm, &codec::COLUMNS, codec::KEY_COLUMN);
//! let directory = RegionDirectory::new(store, Arc::new(MemoryEstates::new()), config);
//!
//! let mut record = RegionRecord::new(RegionId::random(), "Harbor", 1000, 1000);
//! record.flags = RegionFlags::REGION_ONLINE;
//! assert!(directory.store(&record));
//! assert!(directory.get_by_position(1000, 1000, ScopeId::ZERO).unwrap().is_some());
//! ```

pub use griddir_directory::{
    DirectoryConfig, EstateProvider, EstateSettings, MemoryEstates, RegionDirectory,
    STALE_AFTER_SECS, codec, estate, liveness, rank,
};
pub use griddir_error::{GridDirError, Result};
pub use griddir_store::{MemoryStore, QueryFilter, RegionStore, SortSpec};
pub use griddir_types::{
    AccessFlags, BlobMap, Clock, FieldValue, FixedClock, OwnerId, RegionFlags, RegionId,
    RegionRecord, ScopeId, SessionId, SystemClock, Vector3,
};
