//! Test candidate discovery and initiator lookup
//!
//! - `TestCandidatesPipeline`: black-box pipeline listing components of an
//!   item that became eligible for testing
//! - `TestInitiatorResolver`: which surface presents candidate notifications

use std::collections::HashMap;
use std::sync::RwLock;

use crate::storage::CollaboratorError;
use crate::types::{Candidate, Item, ItemUri, TestInitiator};

/// Candidate discovery pipeline.
pub trait TestCandidatesPipeline: Send + Sync {
    fn run(&self, item: &Item) -> Result<Vec<Candidate>, CollaboratorError>;
}

/// Candidate pipeline answering from a fixed table keyed by item URI.
#[derive(Default)]
pub struct StaticCandidatesPipeline {
    candidates: RwLock<HashMap<ItemUri, Vec<Candidate>>>,
}

impl StaticCandidatesPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, item: ItemUri, candidate: Candidate) -> Result<(), CollaboratorError> {
        self.candidates
            .write()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?
            .entry(item)
            .or_default()
            .push(candidate);
        Ok(())
    }
}

impl TestCandidatesPipeline for StaticCandidatesPipeline {
    fn run(&self, item: &Item) -> Result<Vec<Candidate>, CollaboratorError> {
        let candidates = self
            .candidates
            .read()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;

        Ok(candidates.get(&item.uri).cloned().unwrap_or_default())
    }
}

/// Resolves the test initiator for an item.
pub trait TestInitiatorResolver: Send + Sync {
    fn initiator(&self, item: &Item) -> Result<TestInitiator, CollaboratorError>;
}

/// Site-wide initiator with optional per-item overrides.
pub struct ConfiguredInitiator {
    default: TestInitiator,
    overrides: HashMap<ItemUri, TestInitiator>,
}

impl ConfiguredInitiator {
    pub fn new(default: TestInitiator) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_override(mut self, item: ItemUri, initiator: TestInitiator) -> Self {
        self.overrides.insert(item, initiator);
        self
    }
}

impl TestInitiatorResolver for ConfiguredInitiator {
    fn initiator(&self, item: &Item) -> Result<TestInitiator, CollaboratorError> {
        Ok(self.overrides.get(&item.uri).copied().unwrap_or(self.default))
    }
}
