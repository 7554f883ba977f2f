//! TOML fixture describing items, tests and candidates
//!
//! Builds the in-memory collaborators so the warnings processor can be run
//! outside a host, e.g. from the command line:
//!
//! ```toml
//! [[items]]
//! uri = "sitecore://master/home?lang=en&ver=1"
//! name = "Home"
//!
//! [[experiments]]
//! id = "homepage-hero"
//! definition = "sitecore://master/hero-test?lang=en&ver=1"
//! host = "sitecore://master/home?lang=en&ver=1"
//! active = true
//!
//! [[definitions]]
//! uri = "sitecore://master/hero-test?lang=en&ver=1"
//! suspended = false
//!
//! [[data_sources]]
//! item_id = "promo-banner"
//! experiment = "homepage-hero"
//!
//! [[candidates]]
//! item = "sitecore://master/home?lang=en&ver=1"
//! id = "new-carousel"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::candidates::{ConfiguredInitiator, StaticCandidatesPipeline};
use crate::storage::{
    CollaboratorError, InMemoryContentTestStore, InMemoryDefinitionReader, InMemoryTestingSearch,
};
use crate::types::{
    Candidate, Experiment, Item, ItemUri, TestDefinition, TestInitiator, UriParseError,
};
use crate::warnings::Collaborators;

/// Fixture loading errors
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Fixture I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),
    #[error("Fixture parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Uri(#[from] UriParseError),
    #[error("data source references unknown experiment '{0}'")]
    UnknownExperiment(String),
    #[error(transparent)]
    Backend(#[from] CollaboratorError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub items: Vec<FixtureItem>,
    #[serde(default)]
    pub experiments: Vec<FixtureExperiment>,
    #[serde(default)]
    pub definitions: Vec<FixtureDefinition>,
    #[serde(default)]
    pub data_sources: Vec<FixtureDataSource>,
    #[serde(default)]
    pub candidates: Vec<FixtureCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureItem {
    pub uri: String,
    #[serde(default)]
    pub name: String,
    /// Per-item initiator override
    pub initiator: Option<TestInitiator>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureExperiment {
    pub id: String,
    pub definition: String,
    pub host: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureDefinition {
    pub uri: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub suspended: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureDataSource {
    pub item_id: String,
    pub experiment: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureCandidate {
    pub item: String,
    pub id: String,
    #[serde(default)]
    pub discovered_by: String,
}

impl Fixture {
    pub fn load_from_file(path: &Path) -> Result<Self, FixtureError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FixtureError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, FixtureError> {
        Ok(toml::from_str(contents)?)
    }

    /// Look up a declared item by URI.
    pub fn item(&self, uri: &ItemUri) -> Result<Option<Item>, FixtureError> {
        for item in &self.items {
            if item.uri.parse::<ItemUri>()? == *uri {
                return Ok(Some(Item::new(uri.clone(), item.name.clone())));
            }
        }
        Ok(None)
    }

    /// Build in-memory collaborators holding the fixture's data.
    pub fn build(&self, default_initiator: TestInitiator) -> Result<Collaborators, FixtureError> {
        let store = InMemoryContentTestStore::new();
        let mut experiments: HashMap<&str, Experiment> = HashMap::new();
        for x in &self.experiments {
            let experiment = Experiment {
                id: x.id.clone(),
                definition_uri: x.definition.parse()?,
                host_item: x.host.parse::<ItemUri>()?.to_data_uri(),
                is_active: x.active,
            };
            store.insert(experiment.clone())?;
            experiments.insert(x.id.as_str(), experiment);
        }

        let definitions = InMemoryDefinitionReader::new();
        for d in &self.definitions {
            definitions.insert(TestDefinition {
                uri: d.uri.parse()?,
                name: d.name.clone(),
                is_suspended: d.suspended,
            })?;
        }

        let search = InMemoryTestingSearch::new();
        for ds in &self.data_sources {
            let experiment = experiments
                .get(ds.experiment.as_str())
                .ok_or_else(|| FixtureError::UnknownExperiment(ds.experiment.clone()))?;
            search.index(ds.item_id.clone(), experiment.clone())?;
        }

        let candidates = StaticCandidatesPipeline::new();
        for c in &self.candidates {
            candidates.add(
                c.item.parse()?,
                Candidate {
                    id: c.id.clone(),
                    discovered_by: c.discovered_by.clone(),
                },
            )?;
        }

        let mut initiator = ConfiguredInitiator::new(default_initiator);
        for item in &self.items {
            if let Some(value) = item.initiator {
                initiator = initiator.with_override(item.uri.parse()?, value);
            }
        }

        Ok(Collaborators {
            test_store: Arc::new(store),
            definitions: Arc::new(definitions),
            search: Arc::new(search),
            candidates: Arc::new(candidates),
            initiator: Arc::new(initiator),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "sitecore://master/home?lang=en&ver=1";

    #[test]
    fn test_build_wires_every_collaborator() {
        let fixture = Fixture::from_toml_str(&format!(
            r#"
[[items]]
uri = "{HOME}"
name = "Home"
initiator = "publish"

[[experiments]]
id = "hero"
definition = "sitecore://master/hero-def?lang=en&ver=1"
host = "{HOME}"
active = true

[[definitions]]
uri = "sitecore://master/hero-def?lang=en&ver=1"
suspended = true

[[data_sources]]
item_id = "banner"
experiment = "hero"

[[candidates]]
item = "{HOME}"
id = "carousel"
"#
        ))
        .unwrap();

        let collaborators = fixture.build(TestInitiator::Notification).unwrap();
        let uri: ItemUri = HOME.parse().unwrap();
        let home = fixture.item(&uri).unwrap().unwrap();
        assert_eq!(home.name, "Home");

        assert_eq!(
            collaborators.test_store.active_tests(&uri.to_data_uri()).unwrap().len(),
            1
        );
        let definition_uri: ItemUri = "sitecore://master/hero-def?lang=en&ver=1".parse().unwrap();
        assert!(collaborators
            .definitions
            .resolve(&definition_uri)
            .unwrap()
            .unwrap()
            .is_suspended);
        let banner = Item::new(ItemUri::new("master", "banner", "en", 1), "Banner");
        assert_eq!(
            collaborators.search.running_tests_with_data_source(&banner).unwrap().len(),
            1
        );
        assert_eq!(collaborators.candidates.run(&home).unwrap().len(), 1);
        assert_eq!(
            collaborators.initiator.initiator(&home).unwrap(),
            TestInitiator::Publish
        );
    }

    #[test]
    fn test_unknown_data_source_experiment_is_rejected() {
        let fixture = Fixture::from_toml_str(
            r#"
[[data_sources]]
item_id = "banner"
experiment = "missing"
"#,
        )
        .unwrap();
        let err = fixture.build(TestInitiator::Notification).err().unwrap();
        assert!(matches!(err, FixtureError::UnknownExperiment(id) if id == "missing"));
    }

    #[test]
    fn test_bad_uri_is_rejected() {
        let fixture = Fixture::from_toml_str(
            r#"
[[candidates]]
item = "master/home"
id = "carousel"
"#,
        )
        .unwrap();
        assert!(matches!(
            fixture.build(TestInitiator::Notification).err().unwrap(),
            FixtureError::Uri(_)
        ));
    }

    #[test]
    fn test_unknown_fixture_field_is_parse_error() {
        assert!(matches!(
            Fixture::from_toml_str("[[items]]\nuri = \"x\"\ncolour = \"red\"\n"),
            Err(FixtureError::Parse(_))
        ));
    }
}
