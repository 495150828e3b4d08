//! The directory's region record.

use crate::blob::BlobMap;
use crate::flags::{AccessFlags, RegionFlags};
use crate::id::{OwnerId, RegionId, ScopeId, SessionId};

/// One simulation region's directory entry.
///
/// Positions and sizes are in grid units, not world meters. `last_seen` is
/// advanced by the owning host's heartbeat; the directory only consumes it.
/// Full-record equality is derived, but the region id alone is the de-facto
/// key: re-storing under the same id replaces the previous entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRecord {
    pub scope: ScopeId,
    pub region: RegionId,
    pub name: String,
    pub loc_x: i32,
    pub loc_y: i32,
    pub loc_z: i32,
    pub owner: OwnerId,
    pub access: AccessFlags,
    pub size_x: i32,
    pub size_y: i32,
    pub size_z: i32,
    pub flags: RegionFlags,
    /// Heartbeat timestamp, unix seconds.
    pub last_seen: i64,
    pub session: SessionId,
    /// Attributes not promoted to columns; round-trips losslessly.
    pub extra: BlobMap,
}

impl RegionRecord {
    /// A record at `(loc_x, loc_y)` with single-cell size and empty
    /// extension payload; the common starting point in tests and examples.
    #[must_use]
    pub fn new(region: RegionId, name: impl Into<String>, loc_x: i32, loc_y: i32) -> Self {
        Self {
            scope: ScopeId::ZERO,
            region,
            name: name.into(),
            loc_x,
            loc_y,
            loc_z: 0,
            owner: OwnerId::ZERO,
            access: AccessFlags::empty(),
            size_x: 1,
            size_y: 1,
            size_z: 1,
            flags: RegionFlags::empty(),
            last_seen: 0,
            session: SessionId::ZERO,
            extra: BlobMap::new(),
        }
    }
}
