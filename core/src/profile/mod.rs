//! Anonymization profiles
//!
//! A [`Profile`] is an ordered list of [`Rule`]s. Each rule pairs a
//! [`TagSelector`] with a [`RuleAction`]; when a dataset is processed,
//! the first rule whose selector matches an element governs that
//! element. `StripPrivate` rules are the one exception to ordering:
//! they always run as a final pass, after every other rule, so explicit
//! rules that reference private tags see their original values.

mod builder;
mod builtin;

pub use builder::ProfileBuilder;

use crate::error::{DeidentError, Result};
use crate::identity::{IdentitySlot, UidRoot};
use crate::types::{ElementKind, ResolvedSelector, RuleAction, TagSelector};
use std::collections::BTreeSet;
use std::fmt;

/// One anonymization rule: which elements, and what to do with them
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector: TagSelector,
    pub action: RuleAction,
}

impl Rule {
    /// Creates a rule from a selector and an action
    pub fn new(selector: impl Into<TagSelector>, action: RuleAction) -> Self {
        Rule {
            selector: selector.into(),
            action,
        }
    }

    /// Creates the standard private-tag strip rule
    pub fn strip_private() -> Self {
        Rule {
            selector: TagSelector::Private,
            action: RuleAction::StripPrivate,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.selector, self.action)
    }
}

/// An ordered anonymization rule set
///
/// Construct with [`Profile::builder`] or [`Profile::new`], or start
/// from the built-in [`Profile::basic`]. A profile is plain data;
/// validation happens when an [`Anonymizer`](crate::Anonymizer) is
/// built from it, or explicitly through [`Profile::validate`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Profile {
    rules: Vec<Rule>,
}

impl Profile {
    /// Creates a profile from a list of rules
    pub fn new(rules: Vec<Rule>) -> Self {
        Profile { rules }
    }

    /// Returns a builder for assembling a profile rule by rule
    pub fn builder() -> ProfileBuilder {
        ProfileBuilder::new()
    }

    /// Returns the rules in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns whether the profile has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the batch identity slots this profile reads
    ///
    /// The batch identity handed to the applier must populate at least
    /// these slots.
    pub fn required_slots(&self) -> BTreeSet<IdentitySlot> {
        self.rules
            .iter()
            .filter_map(|rule| rule.action.slot())
            .collect()
    }

    /// Checks the profile for configuration errors
    ///
    /// Resolves every keyword against the standard dictionary and
    /// rejects rules that would write a generated value of the wrong
    /// kind (a fresh UID into a non-UID element, or an opaque
    /// identifier into a UID element).
    ///
    /// # Errors
    ///
    /// Returns `DeidentError::Configuration` describing the first
    /// offending rule.
    pub fn validate(&self) -> Result<()> {
        self.compile(UidRoot::default()).map(|_| ())
    }

    /// Resolves selectors and splits out strip rules
    pub(crate) fn compile(&self, uid_root: UidRoot) -> Result<CompiledProfile> {
        let mut rules = Vec::new();
        let mut strip = Vec::new();

        for rule in &self.rules {
            let selector = rule.selector.resolve()?;
            check_value_kind(rule, &selector)?;
            if rule.action == RuleAction::StripPrivate {
                strip.push(selector);
            } else {
                rules.push(CompiledRule {
                    selector,
                    action: rule.action.clone(),
                });
            }
        }

        Ok(CompiledProfile {
            rules,
            strip,
            uid_root,
        })
    }
}

/// Rejects generated-value rules whose target element has the wrong kind
///
/// Only applies where the dictionary knows the target VR; elements the
/// dictionary cannot classify (e.g. private tags) are written with
/// whatever representation they already carry.
fn check_value_kind(rule: &Rule, selector: &ResolvedSelector) -> Result<()> {
    let kind = match selector.concrete() {
        Some((_, Some(vr))) => ElementKind::from_vr(vr),
        _ => return Ok(()),
    };

    let conflict = match &rule.action {
        RuleAction::FreshUid => !kind.is_uid(),
        RuleAction::FreshIdentifier => kind.is_uid(),
        RuleAction::UseBatchSlot(slot) => slot.is_uid() != kind.is_uid(),
        _ => false,
    };

    if conflict {
        return Err(DeidentError::Configuration(format!(
            "rule `{}`: {} value written to {} element",
            rule,
            if rule.action.writes_uid() { "uid" } else { "non-uid" },
            kind
        )));
    }
    Ok(())
}

/// A rule with its selector resolved, ready for application
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) selector: ResolvedSelector,
    pub(crate) action: RuleAction,
}

/// A validated profile with keywords resolved and strip rules split out
#[derive(Debug, Clone)]
pub(crate) struct CompiledProfile {
    /// Explicit rules, in evaluation order
    pub(crate) rules: Vec<CompiledRule>,
    /// Deferred strip selectors, applied after all explicit rules
    pub(crate) strip: Vec<ResolvedSelector>,
    /// Root for per-file fresh UIDs
    pub(crate) uid_root: UidRoot,
}
