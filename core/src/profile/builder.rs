use crate::identity::IdentitySlot;
use crate::profile::{Profile, Rule};
use crate::types::{RuleAction, TagSelector};
use std::borrow::Cow;

/// Builder for assembling a [`Profile`] rule by rule
///
/// Rules are evaluated in the order they are added; for an element
/// matched by more than one selector, the earliest rule wins. Selectors
/// accept keywords, numeric tags, or explicit [`TagSelector`] values.
///
/// # Example
///
/// ```
/// use deident_core::{IdentitySlot, Profile};
///
/// let profile = Profile::builder()
///     .set("PatientName", "Anonymized")
///     .use_batch_slot("StudyInstanceUID", IdentitySlot::StudyUid)
///     .fresh_uid("SOPInstanceUID")
///     .set_if_present("BurnedInAnnotation", "NO")
///     .strip_private_tags()
///     .build();
///
/// assert_eq!(profile.len(), 5);
/// assert!(profile.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder {
    rules: Vec<Rule>,
}

impl ProfileBuilder {
    /// Creates an empty builder
    pub fn new() -> Self {
        ProfileBuilder { rules: Vec::new() }
    }

    /// Appends an already-constructed rule
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends a rule that replaces the value with a constant,
    /// creating the element if absent
    ///
    /// # Example
    ///
    /// ```
    /// use deident_core::Profile;
    ///
    /// let profile = Profile::builder().set("AccessionNumber", "").build();
    /// assert_eq!(profile.len(), 1);
    /// ```
    pub fn set(
        self,
        selector: impl Into<TagSelector>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.rule(Rule::new(selector, RuleAction::Set(value.into())))
    }

    /// Appends a rule that replaces the value with a constant only if
    /// the element is already present
    ///
    /// # Example
    ///
    /// ```
    /// use deident_core::Profile;
    ///
    /// let profile = Profile::builder()
    ///     .set_if_present("BurnedInAnnotation", "NO")
    ///     .build();
    /// assert!(profile.validate().is_ok());
    /// ```
    pub fn set_if_present(
        self,
        selector: impl Into<TagSelector>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.rule(Rule::new(selector, RuleAction::SetIfPresent(value.into())))
    }

    /// Appends a rule that copies the value from a batch identity slot
    ///
    /// # Example
    ///
    /// ```
    /// use deident_core::{IdentitySlot, Profile};
    ///
    /// let profile = Profile::builder()
    ///     .use_batch_slot("PatientID", IdentitySlot::PatientId)
    ///     .build();
    /// assert!(profile.required_slots().contains(&IdentitySlot::PatientId));
    /// ```
    pub fn use_batch_slot(self, selector: impl Into<TagSelector>, slot: IdentitySlot) -> Self {
        self.rule(Rule::new(selector, RuleAction::UseBatchSlot(slot)))
    }

    /// Appends a rule that writes a new UID, distinct for every dataset
    pub fn fresh_uid(self, selector: impl Into<TagSelector>) -> Self {
        self.rule(Rule::new(selector, RuleAction::FreshUid))
    }

    /// Appends a rule that writes a new opaque identifier, distinct for
    /// every dataset
    pub fn fresh_identifier(self, selector: impl Into<TagSelector>) -> Self {
        self.rule(Rule::new(selector, RuleAction::FreshIdentifier))
    }

    /// Appends a rule that deletes matching elements if present
    ///
    /// # Example
    ///
    /// ```
    /// use deident_core::Profile;
    /// use dicom_core::Tag;
    ///
    /// let profile = Profile::builder()
    ///     .remove("InstitutionName")
    ///     .remove(Tag(0x0010, 0x1000))
    ///     .build();
    /// assert_eq!(profile.len(), 2);
    /// ```
    pub fn remove(self, selector: impl Into<TagSelector>) -> Self {
        self.rule(Rule::new(selector, RuleAction::Remove))
    }

    /// Appends the private-tag strip rule
    ///
    /// The strip always runs after every other rule, regardless of
    /// where it sits in the list, and leaves alone any element an
    /// explicit rule wrote a value to.
    pub fn strip_private_tags(self) -> Self {
        self.rule(Rule::strip_private())
    }

    /// Finishes the profile
    pub fn build(self) -> Profile {
        Profile::new(self.rules)
    }
}
