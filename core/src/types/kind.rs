use dicom_core::VR;
use std::fmt;

/// Semantic class of a DICOM data element
///
/// Derived from the element's value representation. Used to keep
/// generated values appropriate for the element they are written to,
/// most importantly so that UID-shaped values only ever land in
/// UID-valued elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum ElementKind {
    /// Person name (PN)
    Name,
    /// Short identifying string (LO, SH)
    Identifier,
    /// Date or time (DA, DT, TM)
    Date,
    /// Unique identifier (UI)
    Uid,
    /// Free text (ST, LT, UT)
    Text,
    /// Everything else (numeric, binary, sequences, ...)
    Other,
}

impl ElementKind {
    /// Classifies a value representation
    pub fn from_vr(vr: VR) -> Self {
        match vr {
            VR::PN => ElementKind::Name,
            VR::LO | VR::SH => ElementKind::Identifier,
            VR::DA | VR::DT | VR::TM => ElementKind::Date,
            VR::UI => ElementKind::Uid,
            VR::ST | VR::LT | VR::UT => ElementKind::Text,
            _ => ElementKind::Other,
        }
    }

    /// Returns whether this kind holds a DICOM unique identifier
    pub fn is_uid(&self) -> bool {
        matches!(self, ElementKind::Uid)
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            ElementKind::Name => "name",
            ElementKind::Identifier => "identifier",
            ElementKind::Date => "date",
            ElementKind::Uid => "uid",
            ElementKind::Text => "text",
            ElementKind::Other => "other",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}
