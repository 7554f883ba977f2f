//! WarningsProcessor - content editor warnings for content testing
//!
//! Invoked once per "collect content editor warnings" request. Appends at
//! most one warning to the host's collection:
//!
//! ```text
//! switch off / no item / initiator != Notification  -> nothing
//! suspended test on item                            -> suspended warning
//! active test on item                               -> active warning
//! item is data source of running test               -> part-of-test warning
//! otherwise, candidates found                       -> "create a test" notification
//! ```
//!
//! A collaborator failure inside the risk rules is logged and treated as
//! "no risk warning"; the candidate notification still runs. Failures of the
//! initiator lookup and of candidate discovery propagate to the host.

use std::sync::Arc;

use tracing::{debug, error, info};

use super::rules::{RuleContext, RuleOutcome, RISK_RULES};
use super::{rules, Collaborators};
use crate::config::defaults::CREATE_TEST_COMMAND;
use crate::config::{TestingConfig, TextKey};
use crate::storage::CollaboratorError;
use crate::types::{ContentEditorWarningsArgs, Item, ItemUri, TestInitiator, Warning};

/// Errors surfaced to the host's warnings pipeline
#[derive(Debug, thiserror::Error)]
pub enum WarningsError {
    #[error("test initiator lookup failed for {item}: {source}")]
    Initiator {
        item: ItemUri,
        source: CollaboratorError,
    },
    #[error("test candidate discovery failed for {item}: {source}")]
    Candidates {
        item: ItemUri,
        source: CollaboratorError,
    },
}

/// A risk rule that failed, with the rule's name for the log.
#[derive(Debug)]
struct RuleFailure {
    rule: &'static str,
    error: CollaboratorError,
}

/// Content editor warnings processor.
///
/// Holds no per-request state; one instance can serve any number of requests.
pub struct WarningsProcessor {
    config: Arc<TestingConfig>,
    collaborators: Collaborators,
}

impl WarningsProcessor {
    pub fn new(config: Arc<TestingConfig>, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    /// Build a processor reading the process-wide config (`config::init`).
    pub fn with_global_config(collaborators: Collaborators) -> Self {
        Self::new(Arc::new(crate::config::get().clone()), collaborators)
    }

    /// Run the processor for one warnings request.
    pub fn process(&self, args: &mut ContentEditorWarningsArgs) -> Result<(), WarningsError> {
        if !self.config.testing.automatic_content_testing_enabled {
            debug!("Automatic content testing disabled, skipping warnings");
            return Ok(());
        }

        let Some(item) = args.item.clone() else {
            debug!("No item in warnings request, skipping");
            return Ok(());
        };

        let initiator = self
            .collaborators
            .initiator
            .initiator(&item)
            .map_err(|source| WarningsError::Initiator {
                item: item.uri.clone(),
                source,
            })?;
        if initiator != TestInitiator::Notification {
            debug!(item = %item.uri, initiator = %initiator, "Test notifications owned by another initiator");
            return Ok(());
        }

        match self.evaluate_risk_rules(&item) {
            Ok(Some((rule, warning))) => {
                info!(item = %item.uri, rule, title = %warning.title, "Content testing warning added");
                args.push(warning);
                return Ok(());
            }
            Ok(None) => {}
            Err(RuleFailure { rule, error }) => {
                error!(
                    item = %item.uri,
                    rule,
                    store = self.collaborators.test_store.backend_name(),
                    error = %error,
                    "Failed to build content testing warnings, falling back to candidate notification"
                );
            }
        }

        self.add_candidate_notification_for(&item, args)
            .map_err(|source| WarningsError::Candidates {
                item: item.uri.clone(),
                source,
            })
    }

    /// Walk the rule table; stop at the first match or the first failure.
    fn evaluate_risk_rules(
        &self,
        item: &Item,
    ) -> Result<Option<(&'static str, Warning)>, RuleFailure> {
        let ctx = self.rule_context(item);
        for entry in &RISK_RULES {
            match (entry.evaluate)(&ctx) {
                Ok(RuleOutcome::Matched(warning)) => return Ok(Some((entry.name, warning))),
                Ok(RuleOutcome::NotMatched) => {}
                Err(error) => {
                    return Err(RuleFailure {
                        rule: entry.name,
                        error,
                    })
                }
            }
        }
        Ok(None)
    }

    fn rule_context<'a>(&'a self, item: &'a Item) -> RuleContext<'a> {
        RuleContext {
            collaborators: &self.collaborators,
            config: &self.config,
            item,
        }
    }

    /// Evaluate one rule against `args.item` and append its warning on match.
    fn apply_rule(
        &self,
        rule: rules::Rule,
        args: &mut ContentEditorWarningsArgs,
    ) -> Result<bool, CollaboratorError> {
        let Some(item) = args.item.as_ref() else {
            return Ok(false);
        };

        let outcome = rule(&self.rule_context(item))?;
        match outcome {
            RuleOutcome::Matched(warning) => {
                args.push(warning);
                Ok(true)
            }
            RuleOutcome::NotMatched => Ok(false),
        }
    }

    /// Add the suspended-test warning if the item hosts a suspended test.
    pub fn add_suspended_test_warning(
        &self,
        args: &mut ContentEditorWarningsArgs,
    ) -> Result<bool, CollaboratorError> {
        self.apply_rule(rules::suspended_test, args)
    }

    /// Add the active-test warning if the item hosts an active test.
    pub fn add_active_test_warning(
        &self,
        args: &mut ContentEditorWarningsArgs,
    ) -> Result<bool, CollaboratorError> {
        self.apply_rule(rules::active_test, args)
    }

    /// Add the part-of-active-test warning if a running test uses the item
    /// as a data source.
    pub fn add_part_of_active_test_warning(
        &self,
        args: &mut ContentEditorWarningsArgs,
    ) -> Result<bool, CollaboratorError> {
        self.apply_rule(rules::part_of_active_test, args)
    }

    /// Add the "create a test" notification if candidate discovery finds
    /// anything for the item.
    pub fn add_test_candidate_notification(
        &self,
        args: &mut ContentEditorWarningsArgs,
    ) -> Result<(), CollaboratorError> {
        let Some(item) = args.item.clone() else {
            return Ok(());
        };
        self.add_candidate_notification_for(&item, args)
    }

    fn add_candidate_notification_for(
        &self,
        item: &Item,
        args: &mut ContentEditorWarningsArgs,
    ) -> Result<(), CollaboratorError> {
        let candidates = self.collaborators.candidates.run(item)?;
        if candidates.is_empty() {
            debug!(item = %item.uri, "No test candidates");
            return Ok(());
        }

        let mut warning = Warning::new(
            self.config.text(TextKey::NewComponentsAdded),
            self.config.text(TextKey::DoYouWantToCreateATest),
        );
        warning.add_option(self.config.text(TextKey::CreateATest), CREATE_TEST_COMMAND);

        info!(item = %item.uri, candidates = candidates.len(), "Test candidate notification added");
        args.push(warning);
        Ok(())
    }
}
