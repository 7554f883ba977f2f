//! TestingSearch trait - tests that use an item as a component data source

use std::sync::RwLock;

use super::CollaboratorError;
use crate::types::{Experiment, Item};

/// Index-backed lookup of tests whose variations reference an item as a
/// rendering data source, as opposed to tests hosted on the item itself.
pub trait TestingSearch: Send + Sync {
    /// Running tests that use `item` as a data source
    fn running_tests_with_data_source(
        &self,
        item: &Item,
    ) -> Result<Vec<Experiment>, CollaboratorError>;
}

/// A data source reference recorded against a test.
#[derive(Debug, Clone)]
struct DataSourceEntry {
    item_id: String,
    experiment: Experiment,
}

/// In-memory search index.
///
/// Data sources are matched by item id across languages and versions,
/// the way the search index stores them.
#[derive(Default)]
pub struct InMemoryTestingSearch {
    entries: RwLock<Vec<DataSourceEntry>>,
}

impl InMemoryTestingSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `experiment` renders `item_id` as a data source.
    pub fn index(
        &self,
        item_id: impl Into<String>,
        experiment: Experiment,
    ) -> Result<(), CollaboratorError> {
        self.entries
            .write()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?
            .push(DataSourceEntry {
                item_id: item_id.into(),
                experiment,
            });
        Ok(())
    }
}

impl TestingSearch for InMemoryTestingSearch {
    fn running_tests_with_data_source(
        &self,
        item: &Item,
    ) -> Result<Vec<Experiment>, CollaboratorError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;

        Ok(entries
            .iter()
            .filter(|e| e.item_id == item.uri.id && e.experiment.is_active)
            .map(|e| e.experiment.clone())
            .collect())
    }
}
