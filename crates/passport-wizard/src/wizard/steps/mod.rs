//! Step gates. Each step borrows only the slice of the form it owns and decides whether the
//! wizard may move past it.

mod countries;
mod documents;
mod registration;
mod universities;

pub use countries::CountrySelectionStep;
pub use documents::DocumentUploadStep;
pub use registration::RegistrationStep;
pub use universities::UniversitySelectionStep;

use super::domain::{DocumentKind, UniversityId};

/// Blocking alert raised when a step refuses to let the applicant continue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepRejection {
    #[error("full name and email are required")]
    IncompleteProfile,
    #[error("Please upload all required documents")]
    MissingDocuments { missing: Vec<DocumentKind> },
    #[error("{} must be uploaded as application/pdf (received '{content_type}')", .kind.label())]
    UnsupportedFileType {
        kind: DocumentKind,
        content_type: String,
    },
    #[error("Please select at least one country")]
    NoCountrySelected,
    #[error("Please select at least one university")]
    NoUniversitySelected,
    #[error("university '{0}' is not offered for the selected countries")]
    UnknownUniversity(UniversityId),
}
