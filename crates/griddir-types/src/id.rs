//! Opaque 128-bit identifiers.
//!
//! Each identifier is a distinct newtype over [`Uuid`] so a region id can
//! never be passed where an owner id is expected. The all-zero value is
//! meaningful for scopes (`ScopeId::ZERO` = "any scope") and is exposed on
//! every id type for symmetry.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// The all-zero (nil) identifier.
            pub const ZERO: Self = Self(Uuid::nil());

            #[must_use]
            pub const fn new(raw: Uuid) -> Self {
                Self(raw)
            }

            /// A fresh random (v4) identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            #[must_use]
            pub fn is_zero(self) -> bool {
                self.0.is_nil()
            }

            #[must_use]
            pub const fn as_uuid(self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(raw: Uuid) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id! {
    /// Globally unique identifier of a simulation region; the directory's
    /// de-facto primary key.
    RegionId
}

define_id! {
    /// Namespace partition letting independent grids share one directory.
    /// `ScopeId::ZERO` means "unscoped / match any scope" in queries.
    ScopeId
}

define_id! {
    /// The account that owns a region.
    OwnerId
}

define_id! {
    /// Opaque token correlating a region's current online session.
    SessionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_id_is_nil() {
        assert!(ScopeId::ZERO.is_zero());
        assert_eq!(ScopeId::default(), ScopeId::ZERO);
        assert!(!RegionId::random().is_zero());
    }

    #[test]
    fn test_display_matches_inner_uuid() {
        let raw = Uuid::new_v4();
        assert_eq!(RegionId::new(raw).to_string(), raw.to_string());
    }
}
