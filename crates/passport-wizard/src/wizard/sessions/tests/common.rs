use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::config::WizardSettings;
use crate::wizard::domain::{
    CandidateFile, Country, DocumentKind, UniversityId, UserProfile,
};
use crate::wizard::sessions::repository::{
    SessionId, SessionRecord, SessionStore, SessionStoreError,
};
use crate::wizard::sessions::{wizard_router, WizardSessionService};
use crate::wizard::state::WizardIntent;

pub(super) fn settings() -> WizardSettings {
    WizardSettings {
        submission_delay: Duration::from_millis(3000),
        payment_delay: Duration::from_millis(2000),
        payment_amount: 499,
    }
}

pub(super) fn profile() -> UserProfile {
    UserProfile {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        mobile: String::new(),
        password: "demo-only".to_string(),
    }
}

pub(super) fn build_service() -> (WizardSessionService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = WizardSessionService::new(store.clone(), settings());
    (service, store)
}

pub(super) fn router_with_service(service: Arc<WizardSessionService<MemoryStore>>) -> axum::Router {
    wizard_router(service)
}

/// Walks a new session through registration, uploads, and country selection so it sits
/// on the university step with nothing selected.
pub(super) fn session_on_university_step(
    service: &WizardSessionService<MemoryStore>,
    country: Country,
) -> SessionId {
    let snapshot = service.create().expect("session opens");
    let id = snapshot.session_id;

    service
        .dispatch(&id, WizardIntent::SubmitProfile { profile: profile() })
        .expect("profile accepted");
    for kind in DocumentKind::ordered() {
        service
            .dispatch(
                &id,
                WizardIntent::AttachDocument {
                    kind,
                    file: CandidateFile::pdf(format!("{}.pdf", kind.id())),
                },
            )
            .expect("pdf accepted");
    }
    service
        .dispatch(&id, WizardIntent::Next)
        .expect("documents complete");
    service
        .dispatch(&id, WizardIntent::ToggleCountry { country })
        .expect("country step active");
    service
        .dispatch(&id, WizardIntent::Next)
        .expect("country chosen");
    id
}

pub(super) fn session_on_summary(
    service: &WizardSessionService<MemoryStore>,
    picks: &[&str],
) -> SessionId {
    let id = session_on_university_step(service, Country::Canada);
    for pick in picks {
        service
            .dispatch(
                &id,
                WizardIntent::ToggleUniversity {
                    university_id: UniversityId(pick.to_string()),
                },
            )
            .expect("university listed");
    }
    service
        .dispatch(&id, WizardIntent::Next)
        .expect("universities chosen");
    id
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}

#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl SessionStore for MemoryStore {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, SessionStoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(SessionStoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), SessionStoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(SessionStoreError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(SessionStoreError::NotFound)
    }
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, SessionStoreError> {
        Err(SessionStoreError::Unavailable("offline".to_string()))
    }

    fn update(&self, _record: SessionRecord) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError> {
        Err(SessionStoreError::Unavailable("offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::Unavailable("offline".to_string()))
    }
}
