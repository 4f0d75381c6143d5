use super::catalogue::UniversityCatalogue;
use super::domain::WizardStep;
use super::state::{ControllerError, WizardIntent, WizardState};
use chrono::Utc;
use tracing::{debug, info};

/// Owns the wizard state for a single applicant and routes intents to the active step.
#[derive(Debug, Clone)]
pub struct WizardController {
    state: WizardState,
    catalogue: &'static UniversityCatalogue,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new(WizardState::default())
    }
}

impl WizardController {
    pub fn new(state: WizardState) -> Self {
        Self::with_catalogue(state, UniversityCatalogue::standard())
    }

    pub fn with_catalogue(state: WizardState, catalogue: &'static UniversityCatalogue) -> Self {
        Self { state, catalogue }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn into_state(self) -> WizardState {
        self.state
    }

    pub fn step(&self) -> WizardStep {
        self.state.step()
    }

    pub fn catalogue(&self) -> &'static UniversityCatalogue {
        self.catalogue
    }

    /// Unconditional forward move, bounded at the last step. Gates live in the steps.
    pub fn advance(&mut self) -> WizardStep {
        self.state.advance();
        self.state.step()
    }

    pub fn retreat(&mut self) -> WizardStep {
        self.state.retreat();
        self.state.step()
    }

    pub fn dispatch(&mut self, intent: WizardIntent) -> Result<WizardStep, ControllerError> {
        let before = self.state.step();
        let (next, outcome) = self.state.settle(intent, self.catalogue);
        self.state = next;
        match outcome {
            Ok(()) => {
                let after = self.state.step();
                if after != before {
                    info!(from = before.number(), to = after.number(), "wizard step changed");
                }
                Ok(after)
            }
            Err(err) => {
                debug!(step = before.number(), error = %err, "wizard intent refused");
                Err(err)
            }
        }
    }

    /// Runs the submission mock to completion without waiting; used by synchronous callers
    /// that have no timer to drive.
    pub fn submit_immediately(&mut self) -> Result<(), ControllerError> {
        let mut next = self.state.clone();
        next.begin_submission(Utc::now())?;
        next.complete_submission(Utc::now())?;
        self.state = next;
        Ok(())
    }

    pub fn pay_immediately(&mut self) -> Result<(), ControllerError> {
        let mut next = self.state.clone();
        next.begin_payment()?;
        next.complete_payment()?;
        self.state = next;
        Ok(())
    }
}
