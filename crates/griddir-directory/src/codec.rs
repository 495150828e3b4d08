//! Record codec: region records to and from flat storage rows.
//!
//! A row is 14 ordered cells. Thirteen scalar columns are authoritative for
//! the promoted fields; the trailing `Info` column carries a self-describing
//! JSON blob with the fields storage has no column for (`last_seen`, the
//! arbitrary `extra` payload). `decode_rows` re-chunks the flattened value
//! list storage hands back; an arity that does not divide by 14 means the
//! batch is corrupt and the whole batch is rejected.
//!
//! Liveness derivation lives in [`crate::liveness`], applied by callers
//! after decode, never hidden in here.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use griddir_error::{GridDirError, Result};
use griddir_types::{
    AccessFlags, FieldValue, OwnerId, RegionFlags, RegionId, RegionRecord, ScopeId, SessionId,
};

/// Column order of the region directory realm.
pub const COLUMNS: [&str; 14] = [
    "ScopeID",
    "RegionUUID",
    "RegionName",
    "LocX",
    "LocY",
    "LocZ",
    "OwnerUUID",
    "Access",
    "SizeX",
    "SizeY",
    "SizeZ",
    "Flags",
    "SessionID",
    "Info",
];

/// Upsert/delete key column.
pub const KEY_COLUMN: &str = "RegionUUID";

const ARITY: usize = COLUMNS.len();

/// Encode one record into its 14-cell row, schema order.
pub fn encode(record: &RegionRecord) -> Result<Vec<FieldValue>> {
    let mut blob = Map::new();
    blob.insert("last_seen".to_owned(), Value::from(record.last_seen));
    blob.insert("extra".to_owned(), Value::Object(record.extra.clone()));
    let info = serde_json::to_string(&Value::Object(blob))
        .map_err(|err| GridDirError::malformed(format!("info blob encode: {err}")))?;

    Ok(vec![
        FieldValue::from(record.scope.as_uuid()),
        FieldValue::from(record.region.as_uuid()),
        FieldValue::from(record.name.clone()),
        FieldValue::from(record.loc_x),
        FieldValue::from(record.loc_y),
        FieldValue::from(record.loc_z),
        FieldValue::from(record.owner.as_uuid()),
        FieldValue::from(record.access.bits()),
        FieldValue::from(record.size_x),
        FieldValue::from(record.size_y),
        FieldValue::from(record.size_z),
        FieldValue::from(record.flags.bits()),
        FieldValue::from(record.session.as_uuid()),
        FieldValue::from(info),
    ])
}

/// Decode a flattened batch of rows.
///
/// Duplicate region ids within the batch are dropped, first occurrence
/// wins.
///
/// # Errors
///
/// `MalformedRecord` when the batch length is not a multiple of 14, a cell
/// has the wrong type, or an `Info` blob does not parse. The batch fails as
/// a whole: corrupt storage must not be mistaken for an empty directory.
pub fn decode_rows(values: &[FieldValue]) -> Result<Vec<RegionRecord>> {
    if values.len() % ARITY != 0 {
        return Err(GridDirError::malformed(format!(
            "batch of {} values is not a whole number of {ARITY}-column rows",
            values.len()
        )));
    }

    let mut records = Vec::with_capacity(values.len() / ARITY);
    let mut seen = BTreeSet::new();
    for row in values.chunks_exact(ARITY) {
        let record = decode_row(row)?;
        if seen.insert(record.region) {
            records.push(record);
        }
    }
    Ok(records)
}

fn decode_row(row: &[FieldValue]) -> Result<RegionRecord> {
    let (last_seen, extra) = parse_info(text_cell(row, 13)?)?;
    Ok(RegionRecord {
        scope: ScopeId::new(uuid_cell(row, 0)?),
        region: RegionId::new(uuid_cell(row, 1)?),
        name: text_cell(row, 2)?.to_owned(),
        loc_x: int_cell(row, 3)?,
        loc_y: int_cell(row, 4)?,
        loc_z: int_cell(row, 5)?,
        owner: OwnerId::new(uuid_cell(row, 6)?),
        access: AccessFlags::from_bits_truncate(bits_cell(row, 7)?),
        size_x: int_cell(row, 8)?,
        size_y: int_cell(row, 9)?,
        size_z: int_cell(row, 10)?,
        flags: RegionFlags::from_bits_truncate(bits_cell(row, 11)?),
        last_seen,
        session: SessionId::new(uuid_cell(row, 12)?),
        extra,
    })
}

fn parse_info(info: &str) -> Result<(i64, Map<String, Value>)> {
    let value: Value = serde_json::from_str(info)
        .map_err(|err| GridDirError::malformed(format!("info blob: {err}")))?;
    let map = value
        .as_object()
        .ok_or_else(|| GridDirError::malformed("info blob is not a map"))?;
    let last_seen = map
        .get("last_seen")
        .and_then(Value::as_i64)
        .ok_or_else(|| GridDirError::malformed("info blob missing last_seen"))?;
    let extra = match map.get("extra") {
        Some(Value::Object(extra)) => extra.clone(),
        Some(_) => return Err(GridDirError::malformed("info blob extra is not a map")),
        None => Map::new(),
    };
    Ok((last_seen, extra))
}

fn cell(row: &[FieldValue], idx: usize) -> &FieldValue {
    &row[idx]
}

fn uuid_cell(row: &[FieldValue], idx: usize) -> Result<uuid::Uuid> {
    cell(row, idx)
        .as_uuid()
        .ok_or_else(|| wrong_type(idx, "uuid"))
}

fn int_cell(row: &[FieldValue], idx: usize) -> Result<i32> {
    let wide = cell(row, idx)
        .as_int()
        .ok_or_else(|| wrong_type(idx, "integer"))?;
    i32::try_from(wide).map_err(|_| {
        GridDirError::malformed(format!("column {} out of i32 range: {wide}", COLUMNS[idx]))
    })
}

fn bits_cell(row: &[FieldValue], idx: usize) -> Result<u32> {
    let wide = cell(row, idx)
        .as_int()
        .ok_or_else(|| wrong_type(idx, "integer"))?;
    u32::try_from(wide).map_err(|_| {
        GridDirError::malformed(format!("column {} out of u32 range: {wide}", COLUMNS[idx]))
    })
}

fn text_cell(row: &[FieldValue], idx: usize) -> Result<&str> {
    cell(row, idx)
        .as_text()
        .ok_or_else(|| wrong_type(idx, "text"))
}

fn wrong_type(idx: usize, expected: &str) -> GridDirError {
    GridDirError::malformed(format!("column {} is not {expected}", COLUMNS[idx]))
}
