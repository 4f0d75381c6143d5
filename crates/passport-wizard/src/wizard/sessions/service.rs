use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{info, warn};

use super::repository::{
    SessionId, SessionRecord, SessionSnapshot, SessionStore, SessionStoreError,
};
use crate::config::WizardSettings;
use crate::wizard::catalogue::UniversityCatalogue;
use crate::wizard::mock::{MockError, MockOperation, MockTimers};
use crate::wizard::state::{ControllerError, WizardIntent, WizardState};
use crate::wizard::submission::{DownloadError, OfferDownload};

/// Service hosting wizard sessions: applies intents, runs the mock delays, and serves
/// offer downloads.
pub struct WizardSessionService<S> {
    store: Arc<S>,
    timers: Arc<MockTimers>,
    writes: Arc<Mutex<()>>,
    catalogue: &'static UniversityCatalogue,
    settings: WizardSettings,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("wiz-{id:06}"))
}

impl<S> WizardSessionService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>, settings: WizardSettings) -> Self {
        Self {
            store,
            timers: Arc::new(MockTimers::default()),
            writes: Arc::new(Mutex::new(())),
            catalogue: UniversityCatalogue::standard(),
            settings,
        }
    }

    pub fn settings(&self) -> &WizardSettings {
        &self.settings
    }

    pub fn catalogue(&self) -> &'static UniversityCatalogue {
        self.catalogue
    }

    /// Open a fresh wizard positioned on the registration step.
    pub fn create(&self) -> Result<SessionSnapshot, SessionServiceError> {
        let state = WizardState::with_payment_amount(self.settings.payment_amount);
        let record = SessionRecord::new(next_session_id(), state, Utc::now());
        let stored = self.store.insert(record)?;
        info!(session = %stored.id, "wizard session opened");
        Ok(stored.snapshot())
    }

    pub fn snapshot(&self, id: &SessionId) -> Result<SessionSnapshot, SessionServiceError> {
        Ok(self.fetch(id)?.snapshot())
    }

    /// Apply an intent. Rejected intents leave the stored session untouched, except that a
    /// refused registration submit still stores the typed profile.
    pub fn dispatch(
        &self,
        id: &SessionId,
        intent: WizardIntent,
    ) -> Result<SessionSnapshot, SessionServiceError> {
        let _writes = lock_writes(&self.writes)?;
        let mut record = self.fetch(id)?;
        let before = record.state.step();

        let (next, outcome) = record.state.settle(intent, self.catalogue);
        if let Err(err) = outcome {
            info!(session = %id, step = before.number(), error = %err, "wizard intent refused");
            if next != record.state {
                record.state = next;
                record.updated_at = Utc::now();
                self.store.update(record)?;
            }
            return Err(err.into());
        }
        record.state = next;
        record.updated_at = Utc::now();

        let after = record.state.step();
        if before != after {
            info!(
                session = %id,
                from = before.number(),
                to = after.number(),
                "wizard step changed"
            );
        }

        self.store.update(record.clone())?;
        Ok(record.snapshot())
    }

    /// Start the submission mock. The session reports `Submitting` until the configured
    /// delay elapses.
    pub fn start_submission(&self, id: &SessionId) -> Result<SessionSnapshot, SessionServiceError> {
        self.start_mock(id, MockOperation::Submission, self.settings.submission_delay, |state| {
            state.begin_submission(Utc::now())
        })
    }

    /// Start the payment mock using the method and card details already on the session.
    pub fn start_payment(&self, id: &SessionId) -> Result<SessionSnapshot, SessionServiceError> {
        self.start_mock(id, MockOperation::Payment, self.settings.payment_delay, |state| {
            state.begin_payment()
        })
    }

    pub fn download(
        &self,
        id: &SessionId,
        slug: &str,
    ) -> Result<OfferDownload, SessionServiceError> {
        let record = self.fetch(id)?;
        let download = record.state.download_offer(slug)?;
        info!(session = %id, file = %download.file_name, "offer letter downloaded");
        Ok(download)
    }

    /// Drop the session and abort any mock delay still pending for it.
    pub fn close(&self, id: &SessionId) -> Result<(), SessionServiceError> {
        let _writes = lock_writes(&self.writes)?;
        let aborted = self.timers.cancel_session(id);
        self.store.remove(id)?;
        info!(session = %id, aborted, "wizard session closed");
        Ok(())
    }

    pub fn is_running(&self, id: &SessionId, operation: MockOperation) -> bool {
        self.timers.is_running(id, operation)
    }

    fn start_mock<F>(
        &self,
        id: &SessionId,
        operation: MockOperation,
        delay: std::time::Duration,
        begin: F,
    ) -> Result<SessionSnapshot, SessionServiceError>
    where
        F: FnOnce(&mut WizardState) -> Result<(), ControllerError>,
    {
        let _writes = lock_writes(&self.writes)?;
        let mut record = self.fetch(id)?;

        let mut next = record.state.clone();
        begin(&mut next)?;
        record.state = next;
        record.updated_at = Utc::now();

        let store = self.store.clone();
        let writes = self.writes.clone();
        let session = id.clone();
        self.timers.schedule(id.clone(), operation, delay, move || {
            finish_mock(store.as_ref(), &writes, &session, operation);
        })?;

        if let Err(err) = self.store.update(record.clone()) {
            self.timers.cancel_session(id);
            return Err(err.into());
        }

        info!(
            session = %id,
            operation = operation.label(),
            delay_ms = delay.as_millis() as u64,
            "mock delay started"
        );
        Ok(record.snapshot())
    }

    fn fetch(&self, id: &SessionId) -> Result<SessionRecord, SessionServiceError> {
        let record = self.store.fetch(id)?.ok_or(SessionStoreError::NotFound)?;
        Ok(record)
    }
}

fn lock_writes(writes: &Mutex<()>) -> Result<MutexGuard<'_, ()>, SessionStoreError> {
    writes
        .lock()
        .map_err(|_| SessionStoreError::Unavailable("session write lock poisoned".to_string()))
}

fn finish_mock<S>(store: &S, writes: &Mutex<()>, id: &SessionId, operation: MockOperation)
where
    S: SessionStore + ?Sized,
{
    let outcome = (|| -> Result<(), SessionServiceError> {
        // Runs on a tokio worker; the std lock only spans one fetch and update with no await.
        let _writes = lock_writes(writes)?;
        let mut record = store.fetch(id)?.ok_or(SessionStoreError::NotFound)?;
        match operation {
            MockOperation::Submission => record.state.complete_submission(Utc::now())?,
            MockOperation::Payment => record.state.complete_payment()?,
        }
        record.updated_at = Utc::now();
        store.update(record)?;
        Ok(())
    })();

    match outcome {
        Ok(()) => info!(session = %id, operation = operation.label(), "mock delay completed"),
        Err(err) => warn!(
            session = %id,
            operation = operation.label(),
            error = %err,
            "mock delay completed but session could not be updated"
        ),
    }
}

/// Error raised by the session service.
#[derive(Debug, thiserror::Error)]
pub enum SessionServiceError {
    #[error(transparent)]
    Store(#[from] SessionStoreError),
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error(transparent)]
    Timer(#[from] MockError),
}
