use crate::engine::{self, AnonymizationReport};
use crate::error::Result;
use crate::identity::{BatchIdentity, UidRoot};
use crate::profile::{CompiledProfile, Profile};
use dicom_object::InMemDicomObject;

/// Main entry point for dataset anonymization
///
/// Compiles a [`Profile`] once, then applies it to any number of
/// datasets. Datasets processed with the same [`BatchIdentity`] share
/// one anonymized patient and study identity; per-file values such as
/// SOPInstanceUID are freshly generated for every dataset regardless.
///
/// # Example
///
/// ```
/// use deident_core::{Anonymizer, Profile};
/// use dicom_object::InMemDicomObject;
/// use dicom_core::{DataElement, PrimitiveValue, VR, Tag};
///
/// let mut dcm = InMemDicomObject::new_empty();
/// dcm.put(DataElement::new(
///     Tag(0x0010, 0x0010), // PatientName
///     VR::PN,
///     PrimitiveValue::from("Doe^John"),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x0008, 0x0018), // SOPInstanceUID
///     VR::UI,
///     PrimitiveValue::from("1.2.840.99.1.2.3"),
/// ));
///
/// let anonymizer = Anonymizer::new(Profile::basic()).unwrap();
/// let batch = anonymizer.new_batch().unwrap();
/// let report = anonymizer.anonymize(&mut dcm, &batch).unwrap();
///
/// assert!(report.num_changed() > 0);
/// let name = dcm.element(Tag(0x0010, 0x0010)).unwrap().to_str().unwrap();
/// assert_ne!(name, "Doe^John");
/// ```
pub struct Anonymizer {
    profile: Profile,
    compiled: CompiledProfile,
}

impl Anonymizer {
    /// Creates an anonymizer issuing UIDs under the default `2.25` root
    ///
    /// # Errors
    ///
    /// Returns `DeidentError::Configuration` if the profile does not
    /// compile: an unknown keyword, an inverted tag range, or an action
    /// whose value kind conflicts with its target element.
    pub fn new(profile: Profile) -> Result<Self> {
        Self::with_uid_root(profile, UidRoot::default())
    }

    /// Creates an anonymizer issuing UIDs under the given root
    ///
    /// # Errors
    ///
    /// Same conditions as [`Anonymizer::new`].
    pub fn with_uid_root(profile: Profile, uid_root: UidRoot) -> Result<Self> {
        let compiled = profile.compile(uid_root)?;
        Ok(Anonymizer { profile, compiled })
    }

    /// Returns the profile this anonymizer applies
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Generates a batch identity covering every slot the profile reads
    ///
    /// Call once per upload batch, before any file is processed, and
    /// pass the same identity to [`Anonymizer::anonymize`] for every
    /// file in that batch.
    ///
    /// # Errors
    ///
    /// Returns `DeidentError::IdentityGeneration` if a unique value
    /// cannot be produced. This aborts the whole batch: without a
    /// shared identity the files cannot be kept consistent.
    pub fn new_batch(&self) -> Result<BatchIdentity> {
        BatchIdentity::generate(&self.profile.required_slots(), &self.compiled.uid_root)
    }

    /// Anonymizes one dataset in place
    ///
    /// # Errors
    ///
    /// On error the dataset may be partially modified; discard it
    /// instead of writing it out. Sibling datasets of the same batch
    /// are unaffected.
    pub fn anonymize(
        &self,
        obj: &mut InMemDicomObject,
        batch: &BatchIdentity,
    ) -> Result<AnonymizationReport> {
        engine::apply(obj, &self.compiled, batch)
    }

    /// Anonymizes a whole batch of datasets under one shared identity
    ///
    /// Each dataset is processed independently and reported in input
    /// order; one dataset failing does not stop the others.
    ///
    /// # Errors
    ///
    /// The outer `Result` fails only when the batch identity cannot be
    /// generated, in which case no dataset has been touched.
    pub fn anonymize_batch(
        &self,
        objects: &mut [InMemDicomObject],
    ) -> Result<Vec<Result<AnonymizationReport>>> {
        let batch = self.new_batch()?;
        Ok(objects
            .iter_mut()
            .map(|obj| self.anonymize(obj, &batch))
            .collect())
    }
}
