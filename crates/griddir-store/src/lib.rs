//! Storage boundary: composable filters, the collaborator trait, and an
//! in-memory reference backend.
//!
//! The directory pushes what it can into storage (equality, pattern,
//! bitfield, and range predicates via [`QueryFilter`]) and filters the rest
//! in-process. [`RegionStore`] is the abstract collaborator; [`MemoryStore`]
//! is the executable definition of the filter semantics and the backend the
//! test suite runs against.

pub mod filter;
pub mod mem;
pub mod store;

pub use filter::QueryFilter;
pub use mem::MemoryStore;
pub use store::{RegionStore, SortSpec};
