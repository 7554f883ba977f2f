//! TestDefinitionReader trait - resolves test references

use std::collections::HashMap;
use std::sync::RwLock;

use super::CollaboratorError;
use crate::types::{ItemUri, TestDefinition};

/// Resolves a test definition item.
///
/// `Ok(None)` means the reference dangles (item deleted, not a definition);
/// callers skip such references rather than failing.
pub trait TestDefinitionReader: Send + Sync {
    fn resolve(&self, uri: &ItemUri) -> Result<Option<TestDefinition>, CollaboratorError>;
}

/// In-memory definition reader keyed by definition URI.
#[derive(Default)]
pub struct InMemoryDefinitionReader {
    definitions: RwLock<HashMap<ItemUri, TestDefinition>>,
}

impl InMemoryDefinitionReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definitions(definitions: impl IntoIterator<Item = TestDefinition>) -> Self {
        Self {
            definitions: RwLock::new(
                definitions
                    .into_iter()
                    .map(|d| (d.uri.clone(), d))
                    .collect(),
            ),
        }
    }

    pub fn insert(&self, definition: TestDefinition) -> Result<(), CollaboratorError> {
        self.definitions
            .write()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?
            .insert(definition.uri.clone(), definition);
        Ok(())
    }
}

impl TestDefinitionReader for InMemoryDefinitionReader {
    fn resolve(&self, uri: &ItemUri) -> Result<Option<TestDefinition>, CollaboratorError> {
        let definitions = self
            .definitions
            .read()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;

        Ok(definitions.get(uri).cloned())
    }
}
