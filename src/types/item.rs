//! Item identity: ItemUri, DataUri, Item, TestInitiator

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// URI scheme prefix used by `ItemUri`'s string form.
pub const ITEM_URI_SCHEME: &str = "sitecore://";

// ============================================================================
// Item URI
// ============================================================================

/// Full identity of a content item version.
///
/// String form: `sitecore://{database}/{id}?lang={language}&ver={version}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemUri {
    pub database: String,
    pub id: String,
    pub language: String,
    pub version: u32,
}

impl ItemUri {
    pub fn new(
        database: impl Into<String>,
        id: impl Into<String>,
        language: impl Into<String>,
        version: u32,
    ) -> Self {
        Self {
            database: database.into(),
            id: id.into(),
            language: language.into(),
            version,
        }
    }

    /// Drop the database component. The experiment store keys tests by this.
    pub fn to_data_uri(&self) -> DataUri {
        DataUri {
            id: self.id.clone(),
            language: self.language.clone(),
            version: self.version,
        }
    }
}

impl std::fmt::Display for ItemUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}/{}?lang={}&ver={}",
            ITEM_URI_SCHEME, self.database, self.id, self.language, self.version
        )
    }
}

/// Errors produced when parsing an `ItemUri` from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UriParseError {
    #[error("item uri must start with 'sitecore://': {0}")]
    MissingScheme(String),
    #[error("item uri has no database/id path: {0}")]
    MissingPath(String),
    #[error("item uri is missing the '{1}' query parameter: {0}")]
    MissingParameter(String, &'static str),
    #[error("item uri has an invalid version '{1}': {0}")]
    InvalidVersion(String, String),
}

impl FromStr for ItemUri {
    type Err = UriParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(ITEM_URI_SCHEME)
            .ok_or_else(|| UriParseError::MissingScheme(s.to_string()))?;

        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let (database, id) = path
            .split_once('/')
            .filter(|(db, id)| !db.is_empty() && !id.is_empty())
            .ok_or_else(|| UriParseError::MissingPath(s.to_string()))?;

        let mut language = None;
        let mut version = None;
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some(("lang", v)) if !v.is_empty() => language = Some(v),
                Some(("ver", v)) => version = Some(v),
                _ => {}
            }
        }

        let language =
            language.ok_or_else(|| UriParseError::MissingParameter(s.to_string(), "lang"))?;
        let version = version.ok_or_else(|| UriParseError::MissingParameter(s.to_string(), "ver"))?;
        let version = version
            .parse::<u32>()
            .map_err(|_| UriParseError::InvalidVersion(s.to_string(), version.to_string()))?;

        Ok(Self::new(database, id, language, version))
    }
}

// ============================================================================
// Data URI
// ============================================================================

/// Database-independent item identity (id + language + version).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataUri {
    pub id: String,
    pub language: String,
    pub version: u32,
}

impl std::fmt::Display for DataUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}?lang={}&ver={}", self.id, self.language, self.version)
    }
}

// ============================================================================
// Item
// ============================================================================

/// A resolved content item under edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub uri: ItemUri,
    #[serde(default)]
    pub name: String,
}

impl Item {
    pub fn new(uri: ItemUri, name: impl Into<String>) -> Self {
        Self {
            uri,
            name: name.into(),
        }
    }
}

// ============================================================================
// Test Initiator
// ============================================================================

/// Which subsystem presents test warnings and actions for an item.
///
/// Only `Notification` lets the content editor warnings processor run;
/// any other value means another surface already owns the presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestInitiator {
    /// Content editor notification bar
    #[default]
    Notification,
    /// Workflow command on approval
    Workflow,
    /// Publishing dialog
    Publish,
    /// Candidate inspection switched off
    Disabled,
}

impl std::fmt::Display for TestInitiator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestInitiator::Notification => write!(f, "notification"),
            TestInitiator::Workflow => write!(f, "workflow"),
            TestInitiator::Publish => write!(f, "publish"),
            TestInitiator::Disabled => write!(f, "disabled"),
        }
    }
}
