//! ContentTestStore trait - tests hosted on an item

use std::sync::RwLock;

use super::CollaboratorError;
use crate::types::{DataUri, Experiment};

/// Experiment store keyed by the host item's `DataUri`.
///
/// Both queries return an empty vector, never an error, when nothing matches.
pub trait ContentTestStore: Send + Sync {
    /// Currently active tests hosted on the item
    fn active_tests(&self, item: &DataUri) -> Result<Vec<Experiment>, CollaboratorError>;

    /// Every test hosted on the item, including inactive and suspended ones
    fn all_tests_for_item(&self, item: &DataUri) -> Result<Vec<Experiment>, CollaboratorError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// In-memory experiment store. Not durable.
#[derive(Default)]
pub struct InMemoryContentTestStore {
    experiments: RwLock<Vec<Experiment>>,
}

impl InMemoryContentTestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_experiments(experiments: Vec<Experiment>) -> Self {
        Self {
            experiments: RwLock::new(experiments),
        }
    }

    pub fn insert(&self, experiment: Experiment) -> Result<(), CollaboratorError> {
        self.experiments
            .write()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?
            .push(experiment);
        Ok(())
    }

    fn select(
        &self,
        predicate: impl Fn(&Experiment) -> bool,
    ) -> Result<Vec<Experiment>, CollaboratorError> {
        let store = self
            .experiments
            .read()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;

        Ok(store.iter().filter(|x| predicate(x)).cloned().collect())
    }
}

impl ContentTestStore for InMemoryContentTestStore {
    fn active_tests(&self, item: &DataUri) -> Result<Vec<Experiment>, CollaboratorError> {
        self.select(|x| x.is_active && x.host_item == *item)
    }

    fn all_tests_for_item(&self, item: &DataUri) -> Result<Vec<Experiment>, CollaboratorError> {
        self.select(|x| x.host_item == *item)
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}
