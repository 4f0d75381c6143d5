use metrics_exporter_prometheus::PrometheusHandle;
use passport_wizard::wizard::sessions::{
    SessionId, SessionRecord, SessionStore, SessionStoreError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session store; everything is lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl InMemorySessionStore {
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SessionRecord>>, SessionStoreError> {
        self.records
            .lock()
            .map_err(|_| SessionStoreError::Unavailable("session store mutex poisoned".to_string()))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.guard().map(|records| records.len()).unwrap_or_default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, SessionStoreError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&record.id) {
            return Err(SessionStoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), SessionStoreError> {
        let mut guard = self.guard()?;
        match guard.get_mut(&record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(SessionStoreError::NotFound),
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.guard()?
            .remove(id)
            .map(|_| ())
            .ok_or(SessionStoreError::NotFound)
    }
}
