//! Content Testing Warnings
//!
//! Decides which content editor warning, if any, to show for an item that
//! is hosting, feeding, or newly eligible for an A/B content test.
//!
//! ## Architecture
//!
//! - **Warnings Processor**: preconditions, ordered risk rules, candidate fallback
//! - **Storage**: experiment store, definition reader, data-source search (traits)
//! - **Candidates**: candidate discovery pipeline and initiator lookup (traits)
//! - **Config**: feature switch and localised texts, loaded from TOML

pub mod config;
pub mod types;
pub mod storage;
pub mod candidates;
pub mod warnings;
pub mod fixture;

// Re-export configuration
pub use config::TestingConfig;

// Re-export commonly used types
pub use types::{
    Candidate, ContentEditorWarningsArgs, DataUri, Experiment, Item, ItemUri, TestDefinition,
    TestInitiator, Warning, WarningOption,
};

// Re-export collaborators
pub use candidates::{TestCandidatesPipeline, TestInitiatorResolver};
pub use storage::{CollaboratorError, ContentTestStore, TestDefinitionReader, TestingSearch};

// Re-export the processor
pub use warnings::{Collaborators, WarningsError, WarningsProcessor};
