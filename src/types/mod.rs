//! Shared data structures for content testing editor warnings
//!
//! - `ItemUri` / `DataUri` / `Item`: identity of the item under edit
//! - `TestInitiator`: which surface presents test notifications for an item
//! - `Experiment` / `TestDefinition`: content tests read from the store
//! - `Candidate`: component newly eligible for testing
//! - `Warning` / `ContentEditorWarningsArgs`: processor output, owned by the host

mod item;
mod experiment;
mod warning;

pub use item::*;
pub use experiment::*;
pub use warning::*;
