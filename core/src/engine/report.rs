use crate::types::ElementKind;
use dicom_core::dictionary::DataDictionary;
use dicom_core::Tag;
use dicom_dictionary_std::StandardDataDictionary;
use std::fmt;

/// What happened to one data element during anonymization
///
/// Dispositions never carry the original value, so a report can be
/// logged or returned to a caller without re-exposing the identity the
/// engine just removed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "snake_case"))]
pub enum ElementDisposition {
    /// Value overwritten by the named action
    Replaced { action: &'static str },
    /// Element created by the named action
    Created { action: &'static str },
    /// Element deleted by an explicit rule
    Removed,
    /// Element deleted by the final strip pass
    Stripped,
    /// A present-only rule targeted the element, but it was absent
    AbsentSkipped,
    /// No rule matched; the element was left as it was
    Unchanged,
}

impl ElementDisposition {
    /// Returns whether the dataset was modified for this element
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            ElementDisposition::Replaced { .. }
                | ElementDisposition::Created { .. }
                | ElementDisposition::Removed
                | ElementDisposition::Stripped
        )
    }
}

impl fmt::Display for ElementDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementDisposition::Replaced { action } => write!(f, "replaced ({})", action),
            ElementDisposition::Created { action } => write!(f, "created ({})", action),
            ElementDisposition::Removed => write!(f, "removed"),
            ElementDisposition::Stripped => write!(f, "stripped"),
            ElementDisposition::AbsentSkipped => write!(f, "absent, skipped"),
            ElementDisposition::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// One action log entry: an element and its disposition
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ActionEntry {
    /// The element's numeric tag
    #[cfg_attr(feature = "json", serde(serialize_with = "crate::types::serialize_tag"))]
    pub tag: Tag,

    /// The element's dictionary keyword, if it has one
    pub keyword: Option<String>,

    /// Semantic class of the element
    pub kind: ElementKind,

    /// What was done
    pub disposition: ElementDisposition,
}

impl ActionEntry {
    /// Creates an entry, looking up the tag's keyword in the standard
    /// dictionary
    pub(crate) fn new(tag: Tag, kind: ElementKind, disposition: ElementDisposition) -> Self {
        let keyword = StandardDataDictionary
            .by_tag(tag)
            .map(|entry| entry.alias.to_string());
        ActionEntry {
            tag,
            keyword,
            kind,
            disposition,
        }
    }

    /// Returns the keyword when known, otherwise the numeric tag
    pub fn identifier(&self) -> String {
        match &self.keyword {
            Some(keyword) => keyword.clone(),
            None => self.tag.to_string(),
        }
    }
}

impl fmt::Display for ActionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.keyword {
            Some(keyword) => write!(
                f,
                "{} {} [{}]: {}",
                keyword, self.tag, self.kind, self.disposition
            ),
            None => write!(f, "{} [{}]: {}", self.tag, self.kind, self.disposition),
        }
    }
}

/// Per-element action log for one processed dataset
///
/// Every element the applier visited appears exactly once, including
/// elements no rule matched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct AnonymizationReport {
    /// Entries in application order, strip-pass entries last
    pub entries: Vec<ActionEntry>,
}

impl AnonymizationReport {
    /// Looks up the entry for a tag
    pub fn entry_for(&self, tag: Tag) -> Option<&ActionEntry> {
        self.entries.iter().find(|entry| entry.tag == tag)
    }

    /// Returns the number of elements that were modified
    pub fn num_changed(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.disposition.is_change())
            .count()
    }

    /// Returns the number of elements left untouched by any rule
    pub fn num_unchanged(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.disposition == ElementDisposition::Unchanged)
            .count()
    }

    /// Returns the number of absent elements skipped by present-only rules
    pub fn num_skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.disposition == ElementDisposition::AbsentSkipped)
            .count()
    }
}
