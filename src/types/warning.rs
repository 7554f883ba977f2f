//! Content editor warning output: Warning, WarningOption, ContentEditorWarningsArgs

use serde::{Deserialize, Serialize};

use super::Item;

/// An action button rendered under a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningOption {
    pub label: String,
    /// Command token dispatched by the editor shell when the option is clicked
    pub command: String,
}

/// A content editor warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub title: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<WarningOption>,
}

impl Warning {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn add_option(&mut self, label: impl Into<String>, command: impl Into<String>) {
        self.options.push(WarningOption {
            label: label.into(),
            command: command.into(),
        });
    }
}

/// Arguments of one "collect content editor warnings" request.
///
/// Owned by the host. Processors only append to `warnings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentEditorWarningsArgs {
    /// Item being edited; `None` when the host could not resolve it
    pub item: Option<Item>,
    #[serde(default)]
    pub warnings: Vec<Warning>,
}

impl ContentEditorWarningsArgs {
    pub fn new(item: Option<Item>) -> Self {
        Self {
            item,
            warnings: Vec::new(),
        }
    }

    /// Append a warning with no options.
    pub fn add(&mut self, title: impl Into<String>, text: impl Into<String>) {
        self.warnings.push(Warning::new(title, text));
    }

    pub fn push(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}
