//! Region status bitmasks.

use bitflags::bitflags;

bitflags! {
    /// Independent boolean attributes of a region, combined via bitwise OR.
    ///
    /// Flag queries use ANY-of-bits semantics: a record matches a mask when
    /// the intersection is non-zero, not when every bit is present.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct RegionFlags: u32 {
        /// Preferred landing region for logins with no better target.
        const DEFAULT_REGION = 1 << 0;
        /// Landing target when the requested region is unavailable.
        const FALLBACK_REGION = 1 << 1;
        /// The region host is currently registered as online.
        const REGION_ONLINE = 1 << 2;
        /// Direct logins to this region are refused.
        const NO_DIRECT_LOGIN = 1 << 3;
        /// Record survives host restarts.
        const PERSISTENT = 1 << 4;
        /// Administratively locked out of the grid.
        const LOCKED_OUT = 1 << 5;
        /// The region may not be relocated.
        const NO_MOVE = 1 << 6;
        /// Placeholder entry reserving a grid location.
        const RESERVATION = 1 << 7;
        /// Host must authenticate before updating this record.
        const AUTHENTICATE = 1 << 8;
        /// Link to a region on a foreign grid.
        const HYPERLINK = 1 << 9;
        /// Hidden from map and search results.
        const HIDDEN = 1 << 10;
        /// Known-safe landing spot for displaced users.
        const SAFE = 1 << 11;
    }
}

bitflags! {
    /// Region accessibility and status bits.
    ///
    /// `DOWN` is derived at read time from the heartbeat timestamp and is
    /// never persisted.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u32 {
        /// General-audience access level.
        const PG = 1 << 0;
        /// Mature access level.
        const MATURE = 1 << 1;
        /// Adult access level.
        const ADULT = 1 << 2;
        /// Trial-account access permitted.
        const TRIAL = 1 << 3;
        /// The region is considered unreachable.
        const DOWN = 1 << 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_disjoint_powers_of_two() {
        let all = RegionFlags::all().bits();
        let sum: u32 = RegionFlags::all().iter().map(|flag| flag.bits()).sum();
        assert_eq!(all, sum);
    }

    #[test]
    fn test_any_of_bits_intersection() {
        let stored = RegionFlags::SAFE | RegionFlags::REGION_ONLINE;
        assert!(stored.intersects(RegionFlags::SAFE | RegionFlags::HIDDEN));
        assert!(!stored.intersects(RegionFlags::HIDDEN));
    }

    #[test]
    fn test_down_bit_round_trips_through_raw_bits() {
        let access = AccessFlags::MATURE | AccessFlags::DOWN;
        let raw = access.bits();
        assert_eq!(AccessFlags::from_bits_truncate(raw), access);
    }
}
