use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::wizard::domain::{Country, UniversityOption, WizardStep};
use crate::wizard::state::WizardState;
use crate::wizard::submission::SummaryView;

/// Identifier wrapper for hosted wizard sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored session: the wizard state plus bookkeeping timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: WizardState,
}

impl SessionRecord {
    pub fn new(id: SessionId, state: WizardState, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            state,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = &self.state;
        let step = state.step();
        let universities = &state.form().universities;

        SessionSnapshot {
            session_id: self.id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            step: step.number(),
            step_label: step.label(),
            total_steps: WizardStep::TOTAL,
            submitted: state.submitted(),
            paid: state.paid(),
            can_pay: state.payment().can_pay() && state.submitted() && !state.paid(),
            universities_selected: universities.selected_count(),
            universities_total: universities.len(),
            university_groups: universities
                .grouped_by_country()
                .into_iter()
                .map(|(country, options)| UniversityGroupView {
                    country,
                    code: country.code(),
                    universities: options.into_iter().cloned().collect(),
                })
                .collect(),
            summary: (step == WizardStep::Summary).then(|| state.summary()),
            state: state.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UniversityGroupView {
    pub country: Country,
    pub code: &'static str,
    pub universities: Vec<UniversityOption>,
}

/// Public view of a session returned by every session endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub step: u8,
    pub step_label: &'static str,
    pub total_steps: u8,
    pub submitted: bool,
    pub paid: bool,
    pub can_pay: bool,
    pub universities_selected: usize,
    pub universities_total: usize,
    pub university_groups: Vec<UniversityGroupView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryView>,
    pub state: WizardState,
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait SessionStore: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, SessionStoreError>;
    fn update(&self, record: SessionRecord) -> Result<(), SessionStoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError>;
    fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
