//! The storage collaborator trait.

use griddir_error::Result;
use griddir_types::FieldValue;

use crate::filter::QueryFilter;

/// One sort key; multiple keys apply in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// Abstract storage for the region directory.
///
/// A realm is one logical table. Rows travel flattened: `query` returns the
/// selected cell values of every matching row concatenated in row order, and
/// the caller re-chunks them by its column arity. Each call is independently
/// atomic; there is no cross-call transaction, and connection lifecycle,
/// timeouts, and retries all belong to the implementation.
pub trait RegionStore: Send + Sync {
    /// Select `columns` (`["*"]` for all) from rows matching `filter`,
    /// sorted by `sort`, windowed by `offset`/`limit`.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` on transport/connection failure.
    fn query(
        &self,
        columns: &[&str],
        realm: &str,
        filter: &QueryFilter,
        sort: &[SortSpec],
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<FieldValue>>;

    /// Insert-or-replace one full row keyed by the realm's primary key
    /// column. `columns` and `values` are parallel slices covering the whole
    /// row.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` on transport/connection failure;
    /// `MalformedRecord` when the slices do not line up with the schema.
    fn replace(&self, realm: &str, columns: &[&str], values: &[FieldValue]) -> Result<bool>;

    /// Delete every row matching all `columns[i] == values[i]` pairs.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` on transport/connection failure.
    fn delete(&self, realm: &str, columns: &[&str], values: &[FieldValue]) -> Result<bool>;
}
