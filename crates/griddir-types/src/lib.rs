//! Core types shared across the griddir workspace.
//!
//! Everything here is a plain value: identifiers, bitmasks, the directory's
//! region record, the extension-blob value model, and the column-value type
//! that crosses the storage boundary. No I/O lives in this crate.

pub mod blob;
pub mod clock;
pub mod flags;
pub mod id;
pub mod record;
pub mod value;

pub use blob::{BlobMap, Vector3};
pub use clock::{Clock, FixedClock, SystemClock};
pub use flags::{AccessFlags, RegionFlags};
pub use id::{OwnerId, RegionId, ScopeId, SessionId};
pub use record::RegionRecord;
pub use value::FieldValue;
