//! Content Testing Configuration - feature switch, initiator and display texts
//!
//! Each struct implements `Default` with the stock values, so a missing
//! config file behaves exactly like a fresh install.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::types::TestInitiator;

use super::defaults::{CONFIG_ENV_VAR, LOCAL_CONFIG_FILE};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for content testing warnings.
///
/// Load with `TestingConfig::load()` which searches:
/// 1. `$CONTENT_TESTING_CONFIG` env var
/// 2. `./content_testing.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestingConfig {
    /// Feature switches
    #[serde(default)]
    pub testing: TestingSection,

    /// Localised display texts
    #[serde(default)]
    pub texts: TextsConfig,
}

impl TestingConfig {
    /// Load configuration using the standard search order:
    /// 1. `$CONTENT_TESTING_CONFIG` environment variable
    /// 2. `./content_testing.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        Self::load_from_search_path(
            std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            Path::new(LOCAL_CONFIG_FILE),
        )
    }

    /// Search order behind `load()` with the candidate paths passed in.
    ///
    /// A missing or broken `explicit` file logs a warning and falls through
    /// to `local`; a missing or broken `local` falls through to defaults.
    pub fn load_from_search_path(explicit: Option<PathBuf>, local: &Path) -> Self {
        if let Some(p) = explicit {
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded content testing config from {CONFIG_ENV_VAR}");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {CONFIG_ENV_VAR}, falling back");
                    }
                }
            } else {
                warn!(path = %p.display(), "{CONFIG_ENV_VAR} points to non-existent file, falling back");
            }
        }

        if local.exists() {
            match Self::load_from_file(local) {
                Ok(config) => {
                    info!(path = %local.display(), "Loaded content testing config");
                    return config;
                }
                Err(e) => {
                    warn!(path = %local.display(), error = %e, "Failed to load local config, using defaults");
                }
            }
        }

        info!("No {LOCAL_CONFIG_FILE} found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are logged as warnings and otherwise ignored.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Every display text must be non-blank; an empty title renders as a
    /// warning bar with no explanation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let errors: Vec<String> = TextKey::ALL
            .iter()
            .filter(|key| self.texts.get(**key).trim().is_empty())
            .map(|key| format!("texts.{} must not be empty", key.as_str()))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Localised display text for a message key.
    pub fn text(&self, key: TextKey) -> &str {
        self.texts.get(key)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),
    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),
    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// [testing]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestingSection {
    /// Master switch. When off the warnings processor never adds anything.
    #[serde(default = "default_true")]
    pub automatic_content_testing_enabled: bool,

    /// Site-wide candidate inspection initiator
    #[serde(default)]
    pub candidate_initiator: TestInitiator,
}

impl Default for TestingSection {
    fn default() -> Self {
        Self {
            automatic_content_testing_enabled: true,
            candidate_initiator: TestInitiator::Notification,
        }
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// [texts]
// ============================================================================

/// Message keys used by the warnings processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    ThisPageHasSuspendedTest,
    FixTestAndDeployAgain,
    ThisPageHasActiveTest,
    EditCouldHaveNegativeImpact,
    ComponentPartOfActiveTest,
    EditCouldAffectStatisticalSignificance,
    NewComponentsAdded,
    DoYouWantToCreateATest,
    CreateATest,
}

impl TextKey {
    pub const ALL: [TextKey; 9] = [
        TextKey::ThisPageHasSuspendedTest,
        TextKey::FixTestAndDeployAgain,
        TextKey::ThisPageHasActiveTest,
        TextKey::EditCouldHaveNegativeImpact,
        TextKey::ComponentPartOfActiveTest,
        TextKey::EditCouldAffectStatisticalSignificance,
        TextKey::NewComponentsAdded,
        TextKey::DoYouWantToCreateATest,
        TextKey::CreateATest,
    ];

    /// Field name under `[texts]`.
    pub fn as_str(self) -> &'static str {
        match self {
            TextKey::ThisPageHasSuspendedTest => "this_page_has_suspended_test",
            TextKey::FixTestAndDeployAgain => "fix_test_and_deploy_again",
            TextKey::ThisPageHasActiveTest => "this_page_has_active_test",
            TextKey::EditCouldHaveNegativeImpact => "edit_could_have_negative_impact",
            TextKey::ComponentPartOfActiveTest => "component_part_of_active_test",
            TextKey::EditCouldAffectStatisticalSignificance => {
                "edit_could_affect_statistical_significance"
            }
            TextKey::NewComponentsAdded => "new_components_added",
            TextKey::DoYouWantToCreateATest => "do_you_want_to_create_a_test",
            TextKey::CreateATest => "create_a_test",
        }
    }
}

/// Display texts, one field per `TextKey`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextsConfig {
    pub this_page_has_suspended_test: String,
    pub fix_test_and_deploy_again: String,
    pub this_page_has_active_test: String,
    pub edit_could_have_negative_impact: String,
    pub component_part_of_active_test: String,
    pub edit_could_affect_statistical_significance: String,
    pub new_components_added: String,
    pub do_you_want_to_create_a_test: String,
    pub create_a_test: String,
}

impl TextsConfig {
    pub fn get(&self, key: TextKey) -> &str {
        match key {
            TextKey::ThisPageHasSuspendedTest => &self.this_page_has_suspended_test,
            TextKey::FixTestAndDeployAgain => &self.fix_test_and_deploy_again,
            TextKey::ThisPageHasActiveTest => &self.this_page_has_active_test,
            TextKey::EditCouldHaveNegativeImpact => &self.edit_could_have_negative_impact,
            TextKey::ComponentPartOfActiveTest => &self.component_part_of_active_test,
            TextKey::EditCouldAffectStatisticalSignificance => {
                &self.edit_could_affect_statistical_significance
            }
            TextKey::NewComponentsAdded => &self.new_components_added,
            TextKey::DoYouWantToCreateATest => &self.do_you_want_to_create_a_test,
            TextKey::CreateATest => &self.create_a_test,
        }
    }
}

impl Default for TextsConfig {
    fn default() -> Self {
        Self {
            this_page_has_suspended_test: "This page has a suspended test.".to_string(),
            fix_test_and_deploy_again: "Fix the problem with the test and deploy it again."
                .to_string(),
            this_page_has_active_test: "This page has an active test.".to_string(),
            edit_could_have_negative_impact:
                "If you edit the content, it could have a negative impact on the test."
                    .to_string(),
            component_part_of_active_test: "This component is part of an active test."
                .to_string(),
            edit_could_affect_statistical_significance:
                "If you edit the content, it could have a negative impact on the statistical significance of the test."
                    .to_string(),
            new_components_added: "New components have been added to this page.".to_string(),
            do_you_want_to_create_a_test: "Do you want to create a test?".to_string(),
            create_a_test: "Create a test".to_string(),
        }
    }
}
