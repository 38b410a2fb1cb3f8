//! Core type definitions for the anonymization engine
//!
//! This module provides the fundamental types rules are built from:
//! - [`TagSelector`]: which elements a rule applies to (keyword, numeric
//!   tag, group range, or all private tags)
//! - [`RuleAction`]: what the rule does to the selected elements
//! - [`ElementKind`]: semantic class of an element, derived from its VR

mod action;
mod kind;
mod selector;

pub use action::RuleAction;
pub use kind::ElementKind;
pub use selector::{is_private_tag, TagSelector};

pub(crate) use selector::ResolvedSelector;

#[cfg(feature = "json")]
pub(crate) use selector::serialize_tag;
