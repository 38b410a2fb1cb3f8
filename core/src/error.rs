use thiserror::Error;

/// Result type for deident operations
pub type Result<T> = std::result::Result<T, DeidentError>;

/// Error types for deident operations
#[derive(Error, Debug)]
pub enum DeidentError {
    /// Invalid profile or engine configuration (undeclared batch slot,
    /// unknown keyword, bad UID root). Caught before any file is touched.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to read or write a specific data element. Recovered at
    /// file granularity; sibling files keep processing.
    #[error("Element access error: {0}")]
    ElementAccess(String),

    /// Unique identifier generation failed. Fatal for the whole batch.
    #[error("Identity generation error: {0}")]
    IdentityGeneration(String),

    /// DICOM reading/writing error
    #[error("DICOM error: {0}")]
    Dicom(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for DeidentError {
    fn from(e: dicom_object::ReadError) -> Self {
        DeidentError::Dicom(format!("{}", e))
    }
}

impl From<dicom_object::WriteError> for DeidentError {
    fn from(e: dicom_object::WriteError) -> Self {
        DeidentError::Dicom(format!("{}", e))
    }
}

impl From<dicom_object::WithMetaError> for DeidentError {
    fn from(e: dicom_object::WithMetaError) -> Self {
        DeidentError::Dicom(format!("{}", e))
    }
}
