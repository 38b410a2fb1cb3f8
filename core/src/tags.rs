use dicom_core::Tag;
use dicom_object::InMemDicomObject;

// Patient Identity Tags
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);
pub const OTHER_PATIENT_IDS: Tag = Tag(0x0010, 0x1000);
pub const OTHER_PATIENT_NAMES: Tag = Tag(0x0010, 0x1001);

// Study/Series Identification Tags
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
pub const FRAME_OF_REFERENCE_UID: Tag = Tag(0x0020, 0x0052);
pub const STUDY_ID: Tag = Tag(0x0020, 0x0010);
pub const ACCESSION_NUMBER: Tag = Tag(0x0008, 0x0050);

// Personnel Tags
pub const REFERRING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x0090);
pub const PERFORMING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x1050);
pub const OPERATORS_NAME: Tag = Tag(0x0008, 0x1070);
pub const PHYSICIANS_OF_RECORD: Tag = Tag(0x0008, 0x1048);

// Institution/Site Tags
pub const INSTITUTION_NAME: Tag = Tag(0x0008, 0x0080);
pub const INSTITUTION_ADDRESS: Tag = Tag(0x0008, 0x0081);
pub const INSTITUTIONAL_DEPARTMENT_NAME: Tag = Tag(0x0008, 0x1040);
pub const STATION_NAME: Tag = Tag(0x0008, 0x1010);
pub const DEVICE_SERIAL_NUMBER: Tag = Tag(0x0018, 0x1000);

// De-identification Marking Tags
pub const BURNED_IN_ANNOTATION: Tag = Tag(0x0028, 0x0301);
pub const PATIENT_IDENTITY_REMOVED: Tag = Tag(0x0012, 0x0062);
pub const DEIDENTIFICATION_METHOD: Tag = Tag(0x0012, 0x0063);

// Repeating group bounds (curve data)
pub const CURVE_GROUP_START: u16 = 0x5000;
pub const CURVE_GROUP_END: u16 = 0x50FF;

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}
