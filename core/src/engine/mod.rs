//! Rule application against a parsed dataset
//!
//! The applier walks the compiled rule list in order, claims each
//! matched element for the first rule that reaches it, then runs the
//! strip pass over whatever the explicit rules left untouched.

mod report;

pub use report::{ActionEntry, AnonymizationReport, ElementDisposition};

use crate::error::{DeidentError, Result};
use crate::identity::{fresh_identifier, fresh_uid, BatchIdentity, UidRoot};
use crate::profile::CompiledProfile;
use crate::types::{ElementKind, RuleAction};
use dicom_core::header::Header;
use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
use dicom_object::InMemDicomObject;
use std::collections::HashSet;

/// Applies a compiled profile to one dataset, in place
///
/// Returns the per-element action log. Elements are claimed by the
/// first rule whose selector matches them; later rules do not see a
/// claimed element, whether the first rule replaced, removed, created
/// or skipped it. An error leaves the dataset partially modified, so
/// callers must discard it rather than write it out.
pub(crate) fn apply(
    obj: &mut InMemDicomObject,
    profile: &CompiledProfile,
    identity: &BatchIdentity,
) -> Result<AnonymizationReport> {
    let snapshot: Vec<(Tag, VR)> = (&*obj)
        .into_iter()
        .map(|elem| (elem.tag(), elem.vr()))
        .collect();
    let present: HashSet<Tag> = snapshot.iter().map(|(tag, _)| *tag).collect();

    let mut visited: HashSet<Tag> = HashSet::new();
    let mut entries = Vec::new();

    for rule in &profile.rules {
        for (tag, vr) in &snapshot {
            if visited.contains(tag) || !rule.selector.matches(*tag) {
                continue;
            }
            visited.insert(*tag);
            let kind = ElementKind::from_vr(*vr);
            match &rule.action {
                RuleAction::Remove => {
                    obj.remove_element(*tag);
                    entries.push(ActionEntry::new(*tag, kind, ElementDisposition::Removed));
                }
                // never in the compiled rule list, see Profile::compile
                RuleAction::StripPrivate => {}
                action => {
                    let value = replacement_value(action, identity, &profile.uid_root)?;
                    obj.put(DataElement::new(*tag, *vr, PrimitiveValue::from(value)));
                    entries.push(ActionEntry::new(
                        *tag,
                        kind,
                        ElementDisposition::Replaced {
                            action: action.short_str(),
                        },
                    ));
                }
            }
        }

        // A concrete selector whose target is absent still gets a say:
        // creation-capable actions insert the element, the rest log the
        // absence. Range selectors never create.
        if let Some((tag, dict_vr)) = rule.selector.concrete() {
            if !present.contains(&tag) && !visited.contains(&tag) {
                visited.insert(tag);
                if rule.action.creates() {
                    let fallback = if rule.action.writes_uid() { VR::UI } else { VR::LO };
                    let vr = dict_vr.unwrap_or(fallback);
                    let value = replacement_value(&rule.action, identity, &profile.uid_root)?;
                    obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
                    entries.push(ActionEntry::new(
                        tag,
                        ElementKind::from_vr(vr),
                        ElementDisposition::Created {
                            action: rule.action.short_str(),
                        },
                    ));
                } else {
                    let kind = dict_vr.map(ElementKind::from_vr).unwrap_or(ElementKind::Other);
                    entries.push(ActionEntry::new(tag, kind, ElementDisposition::AbsentSkipped));
                }
            }
        }
    }

    // Strip pass. Only elements no explicit rule touched are candidates,
    // so a rule that wrote a value to a private tag keeps it.
    let mut stripped: Vec<(Tag, VR)> = Vec::new();
    if !profile.strip.is_empty() {
        for (tag, vr) in &snapshot {
            if !visited.contains(tag) && profile.strip.iter().any(|sel| sel.matches(*tag)) {
                stripped.push((*tag, *vr));
            }
        }
    }
    let stripped_tags: HashSet<Tag> = stripped.iter().map(|(tag, _)| *tag).collect();

    for (tag, vr) in &snapshot {
        if visited.contains(tag) || stripped_tags.contains(tag) {
            continue;
        }
        entries.push(ActionEntry::new(
            *tag,
            ElementKind::from_vr(*vr),
            ElementDisposition::Unchanged,
        ));
    }

    for (tag, vr) in stripped {
        obj.remove_element(tag);
        entries.push(ActionEntry::new(
            tag,
            ElementKind::from_vr(vr),
            ElementDisposition::Stripped,
        ));
    }

    Ok(AnonymizationReport { entries })
}

/// Produces the replacement string for a value-writing action
///
/// Callers only pass actions for which [`RuleAction::writes`] holds.
fn replacement_value(
    action: &RuleAction,
    identity: &BatchIdentity,
    uid_root: &UidRoot,
) -> Result<String> {
    match action {
        RuleAction::Set(value) | RuleAction::SetIfPresent(value) => Ok(value.to_string()),
        RuleAction::UseBatchSlot(slot) => match identity.get(*slot) {
            Some(value) => Ok(value.to_string()),
            None => Err(DeidentError::Configuration(format!(
                "rule reads batch slot `{}` but the batch identity does not hold it",
                slot
            ))),
        },
        RuleAction::FreshUid => fresh_uid(uid_root),
        RuleAction::FreshIdentifier => Ok(fresh_identifier()),
        RuleAction::Remove | RuleAction::StripPrivate => Err(DeidentError::Configuration(format!(
            "action `{}` does not write a value",
            action
        ))),
    }
}
