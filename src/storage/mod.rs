//! Storage-side collaborators of the warnings processor
//!
//! Pluggable backends behind traits so the processor never reaches for a
//! global factory:
//! - `ContentTestStore`: tests hosted on an item (all, or active only)
//! - `TestDefinitionReader`: resolves a test reference to its definition
//! - `TestingSearch`: index lookup for tests using an item as a data source
//!
//! Each trait ships with an `RwLock`-backed in-memory implementation used
//! by tests and by the fixture-driven CLI (see `crate::fixture`).

pub mod test_store;
pub mod definitions;
pub mod search;

pub use test_store::{ContentTestStore, InMemoryContentTestStore};
pub use definitions::{InMemoryDefinitionReader, TestDefinitionReader};
pub use search::{InMemoryTestingSearch, TestingSearch};

/// Errors raised by external collaborators (stores, search index, pipelines)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// Backend could not be reached or its lock is poisoned
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    /// Backend was reached but the query failed
    #[error("query failed: {0}")]
    Query(String),
}
