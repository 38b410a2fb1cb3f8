use crate::identity::IdentitySlot;
use crate::profile::Profile;
use crate::tags;
use crate::types::TagSelector;

impl Profile {
    /// The standard anonymization profile
    ///
    /// Patient identity is replaced with batch-shared values, study and
    /// series identifiers are rewritten consistently across the batch,
    /// and each file receives its own fresh SOP instance UID. Personnel,
    /// institution and device fields are cleared or removed, curve data
    /// and private tags are stripped, and the dataset is marked as
    /// de-identified.
    ///
    /// # Example
    ///
    /// ```
    /// use deident_core::Profile;
    ///
    /// let profile = Profile::basic();
    /// assert!(profile.validate().is_ok());
    /// assert_eq!(profile.required_slots().len(), 5);
    /// ```
    pub fn basic() -> Profile {
        Profile::builder()
            // Patient identity
            .use_batch_slot("PatientName", IdentitySlot::PatientName)
            .use_batch_slot("PatientID", IdentitySlot::PatientId)
            .set("PatientBirthDate", "")
            .remove(tags::OTHER_PATIENT_IDS)
            .remove(tags::OTHER_PATIENT_NAMES)
            // Study, series and instance identity
            .use_batch_slot("StudyInstanceUID", IdentitySlot::StudyUid)
            .use_batch_slot("SeriesInstanceUID", IdentitySlot::SeriesUid)
            .use_batch_slot("FrameOfReferenceUID", IdentitySlot::FrameOfReferenceUid)
            .fresh_uid("SOPInstanceUID")
            .set("AccessionNumber", "")
            .set("StudyID", "")
            // Personnel and site
            .set("ReferringPhysicianName", "")
            .remove("PerformingPhysicianName")
            .remove("OperatorsName")
            .remove("PhysiciansOfRecord")
            .remove("InstitutionName")
            .remove("InstitutionAddress")
            .remove("InstitutionalDepartmentName")
            .remove("StationName")
            .remove("DeviceSerialNumber")
            // Burned-in annotation flag, only meaningful when present
            .set_if_present("BurnedInAnnotation", "NO")
            // De-identification markers
            .set("PatientIdentityRemoved", "YES")
            .set("DeidentificationMethod", "deident basic profile")
            // Curve data and private elements
            .remove(TagSelector::GroupRange {
                start: tags::CURVE_GROUP_START,
                end: tags::CURVE_GROUP_END,
            })
            .strip_private_tags()
            .build()
    }
}
