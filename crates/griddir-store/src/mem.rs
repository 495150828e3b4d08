//! In-memory reference backend.
//!
//! `MemoryStore` executes [`QueryFilter`] semantics directly and is what the
//! workspace tests run against. Realms are declared up front with their
//! column list and primary-key column; `replace` then behaves like a SQL
//! `REPLACE` statement keyed on that column.

use std::cmp::Ordering;
use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use griddir_error::{GridDirError, Result};
use griddir_types::FieldValue;

use crate::filter::QueryFilter;
use crate::store::{RegionStore, SortSpec};

struct Realm {
    columns: Vec<String>,
    key_index: usize,
    rows: Vec<Vec<FieldValue>>,
}

impl Realm {
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    fn cell<'a>(&self, row: &'a [FieldValue], name: &str) -> Option<&'a FieldValue> {
        self.column_index(name).map(|idx| &row[idx])
    }
}

/// Thread-safe in-memory store with declared realm schemas.
#[derive(Default)]
pub struct MemoryStore {
    realms: RwLock<HashMap<String, Realm>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a realm. `key_column` must appear in `columns`; `replace`
    /// upserts on it.
    ///
    /// # Panics
    ///
    /// Panics when `key_column` is not one of `columns`; that is a schema
    /// bug at construction time, not a runtime condition.
    pub fn create_realm(&self, realm: &str, columns: &[&str], key_column: &str) {
        let key_index = columns
            .iter()
            .position(|column| *column == key_column)
            .expect("key column must be part of the realm schema");
        self.realms.write().insert(
            realm.to_owned(),
            Realm {
                columns: columns.iter().map(|&c| c.to_owned()).collect(),
                key_index,
                rows: Vec::new(),
            },
        );
    }

    /// Number of rows currently stored in `realm` (0 if undeclared).
    #[must_use]
    pub fn row_count(&self, realm: &str) -> usize {
        self.realms.read().get(realm).map_or(0, |r| r.rows.len())
    }
}

fn unknown_realm(realm: &str) -> GridDirError {
    GridDirError::storage(format!("unknown realm {realm}"))
}

/// Total order over cell values for sorting: numbers by value, text and
/// uuids lexicographically, mismatched variants compare equal.
fn compare_cells(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Int(x), FieldValue::Int(y)) => x.cmp(y),
        (FieldValue::Text(x), FieldValue::Text(y)) => x.cmp(y),
        (FieldValue::Uuid(x), FieldValue::Uuid(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

impl RegionStore for MemoryStore {
    fn query(
        &self,
        columns: &[&str],
        realm: &str,
        filter: &QueryFilter,
        sort: &[SortSpec],
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<FieldValue>> {
        let realms = self.realms.read();
        let table = realms.get(realm).ok_or_else(|| unknown_realm(realm))?;

        let mut hits: Vec<&Vec<FieldValue>> = table
            .rows
            .iter()
            .filter(|row| filter.matches(|name| table.cell(row, name).cloned()))
            .collect();

        for spec in sort.iter().rev() {
            if let Some(idx) = table.column_index(&spec.field) {
                hits.sort_by(|a, b| {
                    let ord = compare_cells(&a[idx], &b[idx]);
                    if spec.descending { ord.reverse() } else { ord }
                });
            }
        }

        let skip = offset.unwrap_or(0) as usize;
        let take = limit.map_or(usize::MAX, |n| n as usize);

        let mut out = Vec::new();
        for row in hits.into_iter().skip(skip).take(take) {
            if columns.len() == 1 && columns[0] == "*" {
                out.extend(row.iter().cloned());
            } else {
                for name in columns {
                    let cell = table
                        .cell(row, name)
                        .ok_or_else(|| GridDirError::storage(format!("unknown column {name}")))?;
                    out.push(cell.clone());
                }
            }
        }
        debug!(realm, values = out.len(), "memory store query");
        Ok(out)
    }

    fn replace(&self, realm: &str, columns: &[&str], values: &[FieldValue]) -> Result<bool> {
        let mut realms = self.realms.write();
        let table = realms.get_mut(realm).ok_or_else(|| unknown_realm(realm))?;

        if columns.len() != table.columns.len() || values.len() != columns.len() {
            return Err(GridDirError::malformed(format!(
                "replace arity {} does not cover realm {realm} schema of {}",
                values.len(),
                table.columns.len()
            )));
        }

        // Reorder the incoming row into schema order.
        let mut row: Vec<Option<FieldValue>> = vec![None; table.columns.len()];
        for (name, value) in columns.iter().zip(values) {
            let idx = table
                .column_index(name)
                .ok_or_else(|| GridDirError::malformed(format!("unknown column {name}")))?;
            row[idx] = Some(value.clone());
        }
        let row: Vec<FieldValue> = row
            .into_iter()
            .map(|cell| cell.ok_or_else(|| GridDirError::malformed("column listed twice")))
            .collect::<Result<_>>()?;

        let key = row[table.key_index].clone();
        table.rows.retain(|existing| existing[table.key_index] != key);
        table.rows.push(row);
        Ok(true)
    }

    fn delete(&self, realm: &str, columns: &[&str], values: &[FieldValue]) -> Result<bool> {
        let mut realms = self.realms.write();
        let table = realms.get_mut(realm).ok_or_else(|| unknown_realm(realm))?;

        let mut indices = Vec::with_capacity(columns.len());
        for name in columns {
            let idx = table
                .column_index(name)
                .ok_or_else(|| GridDirError::storage(format!("unknown column {name}")))?;
            indices.push(idx);
        }

        table.rows.retain(|row| {
            !indices
                .iter()
                .zip(values)
                .all(|(&idx, value)| &row[idx] == value)
        });
        Ok(true)
    }
}
