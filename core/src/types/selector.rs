use crate::error::{DeidentError, Result};
use dicom_core::dictionary::{DataDictionary, DataDictionaryEntry};
use dicom_core::{Tag, VR};
use dicom_dictionary_std::StandardDataDictionary;
use std::fmt;

/// Returns whether a tag is private (vendor-specific)
///
/// Private tags live in odd-numbered groups.
pub fn is_private_tag(tag: Tag) -> bool {
    tag.group() % 2 != 0
}

/// Selects the data elements an anonymization rule applies to
///
/// Unifies the two addressing styles DICOM supports for the same
/// element: the symbolic keyword (`PatientName`) and the numeric tag
/// pair (`(0010,0010)`). A keyword is resolved against the standard
/// dictionary when the profile is compiled; an unknown keyword is a
/// configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSelector {
    /// Symbolic keyword, e.g. `PatientName`
    Keyword(String),
    /// Exact numeric tag, e.g. `(0010,0010)`
    Exact(Tag),
    /// Every tag whose group lies in an inclusive range, e.g. the
    /// curve groups `5000-50FF`
    GroupRange { start: u16, end: u16 },
    /// Every private (odd-group) tag
    Private,
}

impl TagSelector {
    /// Resolves the selector against the standard dictionary
    ///
    /// # Errors
    ///
    /// Returns `DeidentError::Configuration` if a keyword is not known
    /// to the dictionary or a group range is inverted.
    pub(crate) fn resolve(&self) -> Result<ResolvedSelector> {
        match self {
            TagSelector::Keyword(name) => {
                let entry = StandardDataDictionary.by_name(name).ok_or_else(|| {
                    DeidentError::Configuration(format!("unknown attribute keyword: {}", name))
                })?;
                Ok(ResolvedSelector::Tag {
                    tag: entry.tag(),
                    dict_vr: Some(entry.vr().relaxed()),
                })
            }
            TagSelector::Exact(tag) => Ok(ResolvedSelector::Tag {
                tag: *tag,
                dict_vr: StandardDataDictionary
                    .by_tag(*tag)
                    .map(|entry| entry.vr().relaxed()),
            }),
            TagSelector::GroupRange { start, end } => {
                if start > end {
                    return Err(DeidentError::Configuration(format!(
                        "inverted group range: {:04X}-{:04X}",
                        start, end
                    )));
                }
                Ok(ResolvedSelector::Range {
                    start: *start,
                    end: *end,
                })
            }
            TagSelector::Private => Ok(ResolvedSelector::Private),
        }
    }
}

impl From<&str> for TagSelector {
    fn from(name: &str) -> Self {
        TagSelector::Keyword(name.to_string())
    }
}

impl From<String> for TagSelector {
    fn from(name: String) -> Self {
        TagSelector::Keyword(name)
    }
}

impl From<Tag> for TagSelector {
    fn from(tag: Tag) -> Self {
        TagSelector::Exact(tag)
    }
}

impl fmt::Display for TagSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagSelector::Keyword(name) => write!(f, "{}", name),
            TagSelector::Exact(tag) => write!(f, "{}", tag),
            TagSelector::GroupRange { start, end } => {
                write!(f, "groups {:04X}-{:04X}", start, end)
            }
            TagSelector::Private => write!(f, "private tags"),
        }
    }
}

/// A selector with keywords already resolved to tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolvedSelector {
    Tag { tag: Tag, dict_vr: Option<VR> },
    Range { start: u16, end: u16 },
    Private,
}

impl ResolvedSelector {
    /// Tests a concrete tag against this selector
    pub(crate) fn matches(&self, candidate: Tag) -> bool {
        match self {
            ResolvedSelector::Tag { tag, .. } => *tag == candidate,
            ResolvedSelector::Range { start, end } => {
                (*start..=*end).contains(&candidate.group())
            }
            ResolvedSelector::Private => is_private_tag(candidate),
        }
    }

    /// Returns the single tag this selector names, if it names one
    ///
    /// Range and private selectors have no concrete tag and therefore
    /// never participate in element creation.
    pub(crate) fn concrete(&self) -> Option<(Tag, Option<VR>)> {
        match self {
            ResolvedSelector::Tag { tag, dict_vr } => Some((*tag, *dict_vr)),
            _ => None,
        }
    }
}

#[cfg(feature = "json")]
pub(crate) fn serialize_tag<S>(tag: &Tag, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_private_tag() {
        assert!(is_private_tag(Tag(0x0009, 0x0010)));
        assert!(is_private_tag(Tag(0x0029, 0x1010)));
        assert!(!is_private_tag(Tag(0x0010, 0x0010)));
        assert!(!is_private_tag(Tag(0x0008, 0x0018)));
    }

    #[test]
    fn test_keyword_resolution() {
        let resolved = TagSelector::from("PatientName").resolve().unwrap();
        match resolved {
            ResolvedSelector::Tag { tag, dict_vr } => {
                assert_eq!(tag, Tag(0x0010, 0x0010));
                assert_eq!(dict_vr, Some(VR::PN));
            }
            _ => panic!("expected a concrete tag"),
        }
    }

    #[test]
    fn test_unknown_keyword_is_configuration_error() {
        let err = TagSelector::from("NoSuchAttribute").resolve().unwrap_err();
        assert!(matches!(err, DeidentError::Configuration(_)));
    }

    #[test]
    fn test_exact_tag_resolution_looks_up_vr() {
        let resolved = TagSelector::from(Tag(0x0020, 0x000D)).resolve().unwrap();
        match resolved {
            ResolvedSelector::Tag { tag, dict_vr } => {
                assert_eq!(tag, Tag(0x0020, 0x000D));
                assert_eq!(dict_vr, Some(VR::UI));
            }
            _ => panic!("expected a concrete tag"),
        }
    }

    #[test]
    fn test_exact_unknown_tag_has_no_vr() {
        let resolved = TagSelector::from(Tag(0x0009, 0x0001)).resolve().unwrap();
        match resolved {
            ResolvedSelector::Tag { dict_vr, .. } => assert_eq!(dict_vr, None),
            _ => panic!("expected a concrete tag"),
        }
    }

    #[test]
    fn test_group_range_matching() {
        let resolved = TagSelector::GroupRange {
            start: 0x5000,
            end: 0x50FF,
        }
        .resolve()
        .unwrap();

        assert!(resolved.matches(Tag(0x5000, 0x0010)));
        assert!(resolved.matches(Tag(0x50FF, 0x3000)));
        assert!(!resolved.matches(Tag(0x5100, 0x0010)));
        assert!(!resolved.matches(Tag(0x0010, 0x0010)));
        assert_eq!(resolved.concrete(), None);
    }

    #[test]
    fn test_inverted_group_range_rejected() {
        let err = TagSelector::GroupRange {
            start: 0x50FF,
            end: 0x5000,
        }
        .resolve()
        .unwrap_err();
        assert!(matches!(err, DeidentError::Configuration(_)));
    }

    #[test]
    fn test_private_selector_matching() {
        let resolved = TagSelector::Private.resolve().unwrap();
        assert!(resolved.matches(Tag(0x0009, 0x0010)));
        assert!(!resolved.matches(Tag(0x0010, 0x0010)));
        assert_eq!(resolved.concrete(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TagSelector::from("PatientName").to_string(), "PatientName");
        assert_eq!(
            TagSelector::GroupRange {
                start: 0x5000,
                end: 0x50FF
            }
            .to_string(),
            "groups 5000-50FF"
        );
        assert_eq!(TagSelector::Private.to_string(), "private tags");
    }
}
