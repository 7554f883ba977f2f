//! Content test types: Experiment, TestDefinition, Candidate

use serde::{Deserialize, Serialize};

use super::{DataUri, ItemUri};

/// A content test as recorded by the experiment store.
///
/// `definition_uri` points at the test definition item; `host_item` is the
/// page the test runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: String,
    pub definition_uri: ItemUri,
    pub host_item: DataUri,
    #[serde(default)]
    pub is_active: bool,
}

/// Resolved test definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDefinition {
    pub uri: ItemUri,
    #[serde(default)]
    pub name: String,
    /// Halted after an error or by hand; still configured, not serving traffic
    #[serde(default)]
    pub is_suspended: bool,
}

/// A sub-component newly eligible to become a test subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    /// Name of the inspector that reported this candidate
    #[serde(default)]
    pub discovered_by: String,
}
