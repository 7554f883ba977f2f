//! Risk rules for the content editor warnings processor
//!
//! Each rule is a pure query over the collaborators: it either produces the
//! warning it would show or reports no match. Appending is left to the
//! caller, so a rule that fails halfway never leaves a partial warning.
//!
//! ## Evaluation order
//!
//! 1. **Suspended test** on the item: broken state, needs a developer
//! 2. **Active test** on the item: edits skew the running test
//! 3. **Part of active test**: the item is a data source of a running test
//!
//! The first match wins. The candidate notification is not a rule here; it
//! is the processor's fallback once every rule declined or one failed.

use tracing::debug;

use super::Collaborators;
use crate::config::{TestingConfig, TextKey};
use crate::storage::CollaboratorError;
use crate::types::{Item, Warning};

/// Result of one rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The rule applies; this is the warning to show
    Matched(Warning),
    NotMatched,
}

/// Everything a rule may read.
pub struct RuleContext<'a> {
    pub collaborators: &'a Collaborators,
    pub config: &'a TestingConfig,
    pub item: &'a Item,
}

impl RuleContext<'_> {
    fn warning(&self, title: TextKey, text: TextKey) -> Warning {
        Warning::new(self.config.text(title), self.config.text(text))
    }
}

pub type Rule = fn(&RuleContext<'_>) -> Result<RuleOutcome, CollaboratorError>;

/// A named entry of the rule table.
pub struct RuleEntry {
    pub name: &'static str,
    pub evaluate: Rule,
}

/// Risk rules in priority order.
pub const RISK_RULES: [RuleEntry; 3] = [
    RuleEntry {
        name: "suspended_test",
        evaluate: suspended_test,
    },
    RuleEntry {
        name: "active_test",
        evaluate: active_test,
    },
    RuleEntry {
        name: "part_of_active_test",
        evaluate: part_of_active_test,
    },
];

/// Any test hosted on the item whose definition is suspended.
///
/// Tests whose definition no longer resolves are skipped. Stops resolving
/// at the first suspended definition.
pub fn suspended_test(ctx: &RuleContext<'_>) -> Result<RuleOutcome, CollaboratorError> {
    let tests = ctx
        .collaborators
        .test_store
        .all_tests_for_item(&ctx.item.uri.to_data_uri())?;

    for test in &tests {
        match ctx.collaborators.definitions.resolve(&test.definition_uri)? {
            Some(definition) if definition.is_suspended => {
                debug!(
                    item = %ctx.item.uri,
                    test = %test.id,
                    definition = %definition.uri,
                    "Suspended test found"
                );
                return Ok(RuleOutcome::Matched(ctx.warning(
                    TextKey::ThisPageHasSuspendedTest,
                    TextKey::FixTestAndDeployAgain,
                )));
            }
            Some(_) => {}
            None => {
                debug!(
                    item = %ctx.item.uri,
                    test = %test.id,
                    definition = %test.definition_uri,
                    "Test definition not found, skipping"
                );
            }
        }
    }

    Ok(RuleOutcome::NotMatched)
}

/// Any active test hosted on the item itself.
pub fn active_test(ctx: &RuleContext<'_>) -> Result<RuleOutcome, CollaboratorError> {
    let active = ctx
        .collaborators
        .test_store
        .active_tests(&ctx.item.uri.to_data_uri())?;

    if active.is_empty() {
        return Ok(RuleOutcome::NotMatched);
    }

    Ok(RuleOutcome::Matched(ctx.warning(
        TextKey::ThisPageHasActiveTest,
        TextKey::EditCouldHaveNegativeImpact,
    )))
}

/// Any running test that renders the item as a component data source.
pub fn part_of_active_test(ctx: &RuleContext<'_>) -> Result<RuleOutcome, CollaboratorError> {
    let running = ctx
        .collaborators
        .search
        .running_tests_with_data_source(ctx.item)?;

    if running.is_empty() {
        return Ok(RuleOutcome::NotMatched);
    }

    Ok(RuleOutcome::Matched(ctx.warning(
        TextKey::ComponentPartOfActiveTest,
        TextKey::EditCouldAffectStatisticalSignificance,
    )))
}
