use super::sessions::SessionId;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Simulated asynchronous operations; neither has a failure path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    Submission,
    Payment,
}

impl MockOperation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submission => "submission",
            Self::Payment => "payment",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("a {} mock is already running for this session", .0.label())]
    AlreadyRunning(MockOperation),
    #[error("no async runtime available to drive the mock delay")]
    RuntimeUnavailable,
    #[error("mock timer registry unavailable")]
    Poisoned,
}

/// Registry of in-flight mock delays keyed by session. Each delay runs as a spawned task
/// whose handle is kept so the session can abort it when it is closed.
#[derive(Debug, Default)]
pub struct MockTimers {
    running: Mutex<HashMap<(SessionId, MockOperation), JoinHandle<()>>>,
}

impl MockTimers {
    pub fn schedule<F>(
        &self,
        session: SessionId,
        operation: MockOperation,
        delay: Duration,
        on_elapsed: F,
    ) -> Result<(), MockError>
    where
        F: FnOnce() + Send + 'static,
    {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| MockError::RuntimeUnavailable)?;
        let mut running = self.running.lock().map_err(|_| MockError::Poisoned)?;
        running.retain(|_, handle| !handle.is_finished());

        let key = (session, operation);
        if running.contains_key(&key) {
            return Err(MockError::AlreadyRunning(operation));
        }

        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            on_elapsed();
        });
        running.insert(key, task);
        Ok(())
    }

    pub fn is_running(&self, session: &SessionId, operation: MockOperation) -> bool {
        self.running
            .lock()
            .map(|running| {
                running
                    .get(&(session.clone(), operation))
                    .is_some_and(|handle| !handle.is_finished())
            })
            .unwrap_or(false)
    }

    /// Aborts every pending delay of the session, returning how many were still running.
    pub fn cancel_session(&self, session: &SessionId) -> usize {
        let Ok(mut running) = self.running.lock() else {
            return 0;
        };

        let keys: Vec<_> = running
            .keys()
            .filter(|(owner, _)| owner == session)
            .cloned()
            .collect();

        let mut aborted = 0;
        for key in keys {
            if let Some(handle) = running.remove(&key) {
                if !handle.is_finished() {
                    aborted += 1;
                }
                handle.abort();
            }
        }
        aborted
    }
}
