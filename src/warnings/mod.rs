//! Content editor warnings for content testing
//!
//! - **Rules** (`rules`): suspended test, active test, part of active test,
//!   evaluated in that order, first match wins
//! - **Processor** (`processor`): preconditions, the rule table, error
//!   fallback, and the candidate notification

pub(crate) mod rules;
pub mod processor;

pub use processor::{WarningsError, WarningsProcessor};

use std::sync::Arc;

use crate::candidates::{TestCandidatesPipeline, TestInitiatorResolver};
use crate::storage::{ContentTestStore, TestDefinitionReader, TestingSearch};

/// External collaborators of the warnings processor, passed in explicitly.
#[derive(Clone)]
pub struct Collaborators {
    pub test_store: Arc<dyn ContentTestStore>,
    pub definitions: Arc<dyn TestDefinitionReader>,
    pub search: Arc<dyn TestingSearch>,
    pub candidates: Arc<dyn TestCandidatesPipeline>,
    pub initiator: Arc<dyn TestInitiatorResolver>,
}
