//! Column values crossing the storage boundary.

use std::fmt;

use uuid::Uuid;

/// A single storage-column value. Rows travel as flat `Vec<FieldValue>`
/// slices; the record codec gives them structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Uuid(Uuid),
    Int(i64),
    Text(String),
}

impl FieldValue {
    #[must_use]
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(raw) => Some(*raw),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(raw) => raw.fmt(f),
            Self::Int(n) => n.fmt(f),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<Uuid> for FieldValue {
    fn from(raw: Uuid) -> Self {
        Self::Uuid(raw)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}
