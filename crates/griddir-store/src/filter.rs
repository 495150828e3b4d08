//! Composable query filter.
//!
//! A [`QueryFilter`] is a pure value holding four independent predicate
//! classes, combined with AND semantics across every populated entry. An
//! empty filter matches all rows. The builder never executes anything; the
//! storage collaborator translates it into its own predicate form, and
//! [`QueryFilter::matches`] is the reference evaluation used by the
//! in-memory backend.

use std::collections::BTreeMap;

use griddir_types::FieldValue;

/// Field-keyed predicates, AND-combined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    /// Exact equality: `field == value`.
    eq: BTreeMap<String, FieldValue>,
    /// Substring pattern: `field LIKE %value%`. Case folding is the storage
    /// collation's business; callers escape reserved characters themselves.
    like: BTreeMap<String, String>,
    /// Bitfield intersection: `(field & mask) != 0` (ANY of the bits, not
    /// all of them).
    bits: BTreeMap<String, u64>,
    /// Inclusive lower bound: `field >= value`.
    ge: BTreeMap<String, i64>,
    /// Inclusive upper bound: `field <= value`.
    le: BTreeMap<String, i64>,
}

impl QueryFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and_eq(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        self.eq.insert(field.into(), value.into());
        self
    }

    pub fn and_like(&mut self, field: impl Into<String>, pattern: impl Into<String>) -> &mut Self {
        self.like.insert(field.into(), pattern.into());
        self
    }

    pub fn and_bits(&mut self, field: impl Into<String>, mask: u64) -> &mut Self {
        self.bits.insert(field.into(), mask);
        self
    }

    pub fn and_ge(&mut self, field: impl Into<String>, bound: i64) -> &mut Self {
        self.ge.insert(field.into(), bound);
        self
    }

    pub fn and_le(&mut self, field: impl Into<String>, bound: i64) -> &mut Self {
        self.le.insert(field.into(), bound);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.eq.is_empty()
            && self.like.is_empty()
            && self.bits.is_empty()
            && self.ge.is_empty()
            && self.le.is_empty()
    }

    /// Reference evaluation against one row, given a field resolver.
    ///
    /// A predicate on a field the resolver cannot produce, or whose value
    /// has the wrong shape for the predicate class, fails the row.
    #[must_use]
    pub fn matches(&self, field: impl Fn(&str) -> Option<FieldValue>) -> bool {
        for (name, want) in &self.eq {
            if field(name).as_ref() != Some(want) {
                return false;
            }
        }
        for (name, pattern) in &self.like {
            let hit = field(name).is_some_and(|value| {
                value
                    .as_text()
                    .is_some_and(|text| fold(text).contains(&fold(pattern)))
            });
            if !hit {
                return false;
            }
        }
        for (name, mask) in &self.bits {
            let hit = field(name)
                .and_then(|value| value.as_int())
                .is_some_and(|stored| (stored as u64) & mask != 0);
            if !hit {
                return false;
            }
        }
        for (name, bound) in &self.ge {
            let hit = field(name)
                .and_then(|value| value.as_int())
                .is_some_and(|stored| stored >= *bound);
            if !hit {
                return false;
            }
        }
        for (name, bound) in &self.le {
            let hit = field(name)
                .and_then(|value| value.as_int())
                .is_some_and(|stored| stored <= *bound);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// ASCII case fold, standing in for a SQL backend's collation.
fn fold(text: &str) -> String {
    text.to_ascii_lowercase()
}
