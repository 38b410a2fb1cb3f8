use crate::identity::IdentitySlot;
use std::borrow::Cow;
use std::fmt;

/// What an anonymization rule does to the elements it selects
///
/// Actions come in two families. `Set`, `UseBatchSlot`, `FreshUid` and
/// `FreshIdentifier` write a value and will create the element when the
/// selector names a concrete tag that is absent from the dataset.
/// `SetIfPresent` and `Remove` only ever touch elements that already
/// exist; on an absent element they are recorded as skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Replace the value with a fixed constant
    Set(Cow<'static, str>),

    /// Replace the value with a fixed constant, but only if the element
    /// is already present
    SetIfPresent(Cow<'static, str>),

    /// Copy the value from the shared batch identity
    UseBatchSlot(IdentitySlot),

    /// Generate a new UID for this dataset alone, never shared with
    /// sibling files
    FreshUid,

    /// Generate a new opaque identifier for this dataset alone
    FreshIdentifier,

    /// Delete the element if present
    Remove,

    /// Remove every still-present element the selector matches, as a
    /// final pass after all other rules have run. Elements that an
    /// earlier rule wrote a value to are left alone.
    StripPrivate,
}

impl RuleAction {
    /// Returns whether this action writes a value
    pub fn writes(&self) -> bool {
        matches!(
            self,
            RuleAction::Set(_)
                | RuleAction::SetIfPresent(_)
                | RuleAction::UseBatchSlot(_)
                | RuleAction::FreshUid
                | RuleAction::FreshIdentifier
        )
    }

    /// Returns whether this action creates absent elements
    ///
    /// Only writing actions create, and `SetIfPresent` is excluded by
    /// definition.
    pub fn creates(&self) -> bool {
        matches!(
            self,
            RuleAction::Set(_)
                | RuleAction::UseBatchSlot(_)
                | RuleAction::FreshUid
                | RuleAction::FreshIdentifier
        )
    }

    /// Returns whether this action generates a UID-shaped value
    pub fn writes_uid(&self) -> bool {
        match self {
            RuleAction::FreshUid => true,
            RuleAction::UseBatchSlot(slot) => slot.is_uid(),
            _ => false,
        }
    }

    /// Returns the batch slot this action reads, if any
    pub fn slot(&self) -> Option<IdentitySlot> {
        match self {
            RuleAction::UseBatchSlot(slot) => Some(*slot),
            _ => None,
        }
    }

    /// Returns short string representation
    pub fn short_str(&self) -> &'static str {
        match self {
            RuleAction::Set(_) => "replace-constant",
            RuleAction::SetIfPresent(_) => "conditional-constant",
            RuleAction::UseBatchSlot(_) => "batch-identity",
            RuleAction::FreshUid => "fresh-uid",
            RuleAction::FreshIdentifier => "fresh-identifier",
            RuleAction::Remove => "remove",
            RuleAction::StripPrivate => "strip-private",
        }
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_and_creates() {
        assert!(RuleAction::Set("X".into()).writes());
        assert!(RuleAction::Set("X".into()).creates());

        assert!(RuleAction::SetIfPresent("NO".into()).writes());
        assert!(!RuleAction::SetIfPresent("NO".into()).creates());

        assert!(RuleAction::FreshUid.creates());
        assert!(RuleAction::UseBatchSlot(IdentitySlot::StudyUid).creates());

        assert!(!RuleAction::Remove.writes());
        assert!(!RuleAction::Remove.creates());
        assert!(!RuleAction::StripPrivate.writes());
    }

    #[test]
    fn test_writes_uid() {
        assert!(RuleAction::FreshUid.writes_uid());
        assert!(RuleAction::UseBatchSlot(IdentitySlot::SeriesUid).writes_uid());
        assert!(!RuleAction::UseBatchSlot(IdentitySlot::PatientName).writes_uid());
        assert!(!RuleAction::Set("X".into()).writes_uid());
        assert!(!RuleAction::FreshIdentifier.writes_uid());
    }

    #[test]
    fn test_slot() {
        assert_eq!(
            RuleAction::UseBatchSlot(IdentitySlot::PatientId).slot(),
            Some(IdentitySlot::PatientId)
        );
        assert_eq!(RuleAction::FreshUid.slot(), None);
    }

    #[test]
    fn test_short_str() {
        assert_eq!(RuleAction::Set("X".into()).short_str(), "replace-constant");
        assert_eq!(
            RuleAction::SetIfPresent("NO".into()).short_str(),
            "conditional-constant"
        );
        assert_eq!(RuleAction::Remove.short_str(), "remove");
    }
}
