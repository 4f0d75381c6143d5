use super::catalogue::UniversityCatalogue;
use super::domain::{
    CandidateFile, Country, DocumentKind, RequirementKind, UniversityId, UserProfile, WizardStep,
};
use super::form::ApplicationForm;
use super::payment::{CardDetails, PaymentDialog, PaymentError, PaymentMethod};
use super::steps::{
    CountrySelectionStep, DocumentUploadStep, RegistrationStep, StepRejection,
    UniversitySelectionStep,
};
use super::submission::{
    DownloadError, OfferDownload, SubmissionError, SubmissionState, SummaryView,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User-initiated mutation of the wizard. Everything except `Next`/`Back` targets one step
/// and is refused while another step is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WizardIntent {
    UpdateProfile { profile: UserProfile },
    SubmitProfile { profile: UserProfile },
    AttachDocument { kind: DocumentKind, file: CandidateFile },
    DetachDocument { kind: DocumentKind },
    ToggleCountry { country: Country },
    ToggleRequirement { requirement: RequirementKind },
    ToggleUniversity { university_id: UniversityId },
    OpenPayment,
    ClosePayment,
    SelectPaymentMethod { method: PaymentMethod },
    UpdateCard { card: CardDetails },
    Next,
    Back,
}

impl WizardIntent {
    pub fn target_step(&self) -> Option<WizardStep> {
        match self {
            Self::UpdateProfile { .. } | Self::SubmitProfile { .. } => {
                Some(WizardStep::Registration)
            }
            Self::AttachDocument { .. } | Self::DetachDocument { .. } => {
                Some(WizardStep::DocumentUpload)
            }
            Self::ToggleCountry { .. } | Self::ToggleRequirement { .. } => {
                Some(WizardStep::CountrySelection)
            }
            Self::ToggleUniversity { .. } => Some(WizardStep::UniversitySelection),
            Self::OpenPayment
            | Self::ClosePayment
            | Self::SelectPaymentMethod { .. }
            | Self::UpdateCard { .. } => Some(WizardStep::Summary),
            Self::Next | Self::Back => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Rejected(#[from] StepRejection),
    #[error(
        "{} is not the active step (currently on {})",
        .requested.label(),
        .active.label()
    )]
    StepNotActive {
        requested: WizardStep,
        active: WizardStep,
    },
    #[error("the summary cannot be left once submission has started")]
    SubmissionLocked,
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// Complete wizard state: the active step, the collected form, and the summary/payment
/// state machines. Intents are applied through [`WizardState::apply`], which never mutates
/// the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    step: WizardStep,
    form: ApplicationForm,
    submission: SubmissionState,
    payment: PaymentDialog,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::with_payment_amount(super::payment::DEFAULT_PAYMENT_AMOUNT)
    }
}

impl WizardState {
    pub fn with_payment_amount(amount: u32) -> Self {
        Self {
            step: WizardStep::Registration,
            form: ApplicationForm::default(),
            submission: SubmissionState::default(),
            payment: PaymentDialog::with_amount(amount),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &ApplicationForm {
        &self.form
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn payment(&self) -> &PaymentDialog {
        &self.payment
    }

    pub fn submitted(&self) -> bool {
        self.submission.submitted()
    }

    pub fn paid(&self) -> bool {
        self.submission.paid()
    }

    /// Moves one step forward; a no-op on the last step.
    pub fn advance(&mut self) -> bool {
        match self.step.next() {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    /// Moves one step back; a no-op on the first step.
    pub fn retreat(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    /// Like [`WizardState::apply`], but also returns the state to keep when the intent is
    /// refused. Only a refused registration submit keeps anything: the typed profile is
    /// stored while the step stays on registration.
    pub fn settle(
        &self,
        intent: WizardIntent,
        catalogue: &UniversityCatalogue,
    ) -> (Self, Result<(), ControllerError>) {
        let typed = match &intent {
            WizardIntent::SubmitProfile { profile } if self.step == WizardStep::Registration => {
                Some(profile.clone())
            }
            _ => None,
        };

        match self.apply(intent, catalogue) {
            Ok(next) => (next, Ok(())),
            Err(err) => {
                let mut kept = self.clone();
                if let Some(profile) = typed {
                    kept.form.profile = profile;
                }
                (kept, Err(err))
            }
        }
    }

    /// Returns the state that results from applying `intent`, or the reason it was refused.
    pub fn apply(
        &self,
        intent: WizardIntent,
        catalogue: &UniversityCatalogue,
    ) -> Result<Self, ControllerError> {
        if let Some(requested) = intent.target_step() {
            if requested != self.step {
                return Err(ControllerError::StepNotActive {
                    requested,
                    active: self.step,
                });
            }
        }

        let mut next = self.clone();
        next.dispatch(intent, catalogue)?;
        Ok(next)
    }

    fn dispatch(
        &mut self,
        intent: WizardIntent,
        catalogue: &UniversityCatalogue,
    ) -> Result<(), ControllerError> {
        let form = &mut self.form;
        match intent {
            WizardIntent::UpdateProfile { profile } => form.profile = profile,
            WizardIntent::SubmitProfile { profile } => {
                RegistrationStep::new(&mut form.profile).submit(profile)?;
                self.advance();
            }
            WizardIntent::AttachDocument { kind, file } => {
                DocumentUploadStep::new(&mut form.documents).attach(kind, file)?;
            }
            WizardIntent::DetachDocument { kind } => {
                DocumentUploadStep::new(&mut form.documents).detach(kind);
            }
            WizardIntent::ToggleCountry { country } => {
                self.country_step(catalogue).toggle_country(country);
            }
            WizardIntent::ToggleRequirement { requirement } => {
                self.country_step(catalogue).toggle_requirement(requirement);
            }
            WizardIntent::ToggleUniversity { university_id } => {
                UniversitySelectionStep::new(&mut form.universities)
                    .toggle_selection(&university_id)?;
            }
            WizardIntent::OpenPayment => {
                self.ensure_payable()?;
                self.payment.open()?;
            }
            WizardIntent::ClosePayment => self.payment.close()?,
            WizardIntent::SelectPaymentMethod { method } => self.payment.select_method(method)?,
            WizardIntent::UpdateCard { card } => self.payment.update_card(card)?,
            WizardIntent::Next => self.proceed(catalogue)?,
            WizardIntent::Back => {
                if self.step == WizardStep::Summary && !self.submission.is_reviewing() {
                    return Err(ControllerError::SubmissionLocked);
                }
                self.retreat();
            }
        }
        Ok(())
    }

    fn country_step<'a>(&'a mut self, catalogue: &'a UniversityCatalogue) -> CountrySelectionStep<'a> {
        let form = &mut self.form;
        CountrySelectionStep::new(
            &mut form.countries,
            &mut form.requirements,
            &mut form.universities,
            catalogue,
        )
    }

    /// Runs the active step's gate and advances only when it passes.
    fn proceed(&mut self, catalogue: &UniversityCatalogue) -> Result<(), StepRejection> {
        match self.step {
            WizardStep::Registration => RegistrationStep::new(&mut self.form.profile).proceed()?,
            WizardStep::DocumentUpload => {
                DocumentUploadStep::new(&mut self.form.documents).proceed()?
            }
            WizardStep::CountrySelection => self.country_step(catalogue).proceed()?,
            WizardStep::UniversitySelection => {
                UniversitySelectionStep::new(&mut self.form.universities).proceed()?
            }
            WizardStep::Summary => {}
        }
        self.advance();
        Ok(())
    }

    fn ensure_payable(&self) -> Result<(), PaymentError> {
        if self.submission.submitted() && !self.submission.paid() {
            Ok(())
        } else {
            Err(PaymentError::Unavailable)
        }
    }

    fn ensure_on_summary(&self) -> Result<(), ControllerError> {
        if self.step == WizardStep::Summary {
            Ok(())
        } else {
            Err(ControllerError::StepNotActive {
                requested: WizardStep::Summary,
                active: self.step,
            })
        }
    }

    pub fn begin_submission(&mut self, now: DateTime<Utc>) -> Result<(), ControllerError> {
        self.ensure_on_summary()?;
        self.submission.begin(&self.form.universities, now)?;
        Ok(())
    }

    /// Finishes the submission mock and opens the payment dialog.
    pub fn complete_submission(&mut self, now: DateTime<Utc>) -> Result<(), ControllerError> {
        self.submission.complete(now)?;
        self.payment.open()?;
        Ok(())
    }

    pub fn begin_payment(&mut self) -> Result<(), ControllerError> {
        self.ensure_on_summary()?;
        self.ensure_payable()?;
        self.payment.begin()?;
        Ok(())
    }

    pub fn complete_payment(&mut self) -> Result<(), ControllerError> {
        self.payment.complete()?;
        self.submission.mark_paid()?;
        Ok(())
    }

    pub fn download_offer(&self, slug: &str) -> Result<OfferDownload, DownloadError> {
        self.submission.download(slug)
    }

    pub fn summary(&self) -> SummaryView {
        SummaryView::build(&self.form, &self.submission)
    }
}
