//! Hosts many wizard sessions in memory and drives their mock delays.

pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use repository::{
    SessionId, SessionRecord, SessionSnapshot, SessionStore, SessionStoreError,
    UniversityGroupView,
};
pub use router::wizard_router;
pub use service::{SessionServiceError, WizardSessionService};
