//! Multi-step study-abroad application wizard: registration, document upload, country and
//! requirement selection, university selection, and the summary with mocked submission and
//! payment.

pub mod catalogue;
mod controller;
pub mod domain;
pub mod form;
pub mod mock;
pub mod payment;
pub mod sessions;
pub mod state;
pub mod steps;
pub mod submission;

pub use catalogue::{CatalogueEntry, UniversityCatalogue};
pub use controller::WizardController;
pub use domain::{
    CandidateFile, Country, DocumentKind, OfferLetter, RequirementKind, UniversityId,
    UniversityOption, UserProfile, WizardStep,
};
pub use form::ApplicationForm;
pub use payment::{CardDetails, PaymentDialog, PaymentMethod, PaymentStatus};
pub use sessions::{SessionId, SessionServiceError, SessionSnapshot, WizardSessionService};
pub use state::{ControllerError, WizardIntent, WizardState};
pub use steps::StepRejection;
pub use submission::{OfferDownload, SubmissionPhase, SummaryView};
