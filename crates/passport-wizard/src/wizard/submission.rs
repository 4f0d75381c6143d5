use super::domain::{OfferLetter, UserProfile};
use super::form::{ApplicationForm, UniversityList};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const OFFER_LETTER_BODY: &str = "Demo Offer Letter";

/// `Reviewing -> Submitting -> Submitted { paid: false } -> Submitted { paid: true }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionPhase {
    Reviewing,
    Submitting {
        started_at: DateTime<Utc>,
    },
    Submitted {
        submitted_at: DateTime<Utc>,
        paid: bool,
    },
}

impl SubmissionPhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reviewing => "Reviewing",
            Self::Submitting { .. } => "Submitting",
            Self::Submitted { paid: false, .. } => "Submitted (payment pending)",
            Self::Submitted { paid: true, .. } => "Submitted (paid)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("a submission is already in progress")]
    InFlight,
    #[error("the application has already been submitted")]
    AlreadySubmitted,
    #[error("no submission is in progress")]
    NotInFlight,
    #[error("the application has not been submitted yet")]
    NotSubmitted,
    #[error("payment has already been recorded")]
    AlreadyPaid,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DownloadError {
    #[error("complete payment to download offer letters")]
    Locked,
    #[error("no offer letter matches '{0}'")]
    UnknownOffer(String),
}

/// Synthesized placeholder handed out for a paid offer letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferDownload {
    pub file_name: String,
    pub content_type: String,
    pub body: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionState {
    phase: SubmissionPhase,
    offer_letters: Vec<OfferLetter>,
}

impl Default for SubmissionState {
    fn default() -> Self {
        Self {
            phase: SubmissionPhase::Reviewing,
            offer_letters: Vec::new(),
        }
    }
}

impl SubmissionState {
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn is_reviewing(&self) -> bool {
        matches!(self.phase, SubmissionPhase::Reviewing)
    }

    pub fn in_flight(&self) -> bool {
        matches!(self.phase, SubmissionPhase::Submitting { .. })
    }

    pub fn submitted(&self) -> bool {
        matches!(self.phase, SubmissionPhase::Submitted { .. })
    }

    pub fn paid(&self) -> bool {
        matches!(self.phase, SubmissionPhase::Submitted { paid: true, .. })
    }

    pub fn offer_letters(&self) -> &[OfferLetter] {
        &self.offer_letters
    }

    /// Starts the mock submission, snapshotting one offer per selected university in list
    /// order.
    pub fn begin(
        &mut self,
        universities: &UniversityList,
        now: DateTime<Utc>,
    ) -> Result<(), SubmissionError> {
        match self.phase {
            SubmissionPhase::Reviewing => {}
            SubmissionPhase::Submitting { .. } => return Err(SubmissionError::InFlight),
            SubmissionPhase::Submitted { .. } => return Err(SubmissionError::AlreadySubmitted),
        }

        self.offer_letters = universities
            .selected()
            .map(|option| OfferLetter {
                university_name: option.name.clone(),
            })
            .collect();
        self.phase = SubmissionPhase::Submitting { started_at: now };
        Ok(())
    }

    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), SubmissionError> {
        match self.phase {
            SubmissionPhase::Submitting { .. } => {
                self.phase = SubmissionPhase::Submitted {
                    submitted_at: now,
                    paid: false,
                };
                Ok(())
            }
            SubmissionPhase::Submitted { .. } => Err(SubmissionError::AlreadySubmitted),
            SubmissionPhase::Reviewing => Err(SubmissionError::NotInFlight),
        }
    }

    pub fn mark_paid(&mut self) -> Result<(), SubmissionError> {
        match self.phase {
            SubmissionPhase::Submitted {
                submitted_at,
                paid: false,
            } => {
                self.phase = SubmissionPhase::Submitted {
                    submitted_at,
                    paid: true,
                };
                Ok(())
            }
            SubmissionPhase::Submitted { paid: true, .. } => Err(SubmissionError::AlreadyPaid),
            _ => Err(SubmissionError::NotSubmitted),
        }
    }

    /// Produces the placeholder download for the offer whose slug matches. Nothing is
    /// produced until payment has been recorded.
    pub fn download(&self, slug: &str) -> Result<OfferDownload, DownloadError> {
        let offer = self
            .offer_letters
            .iter()
            .find(|offer| offer.slug() == slug)
            .ok_or_else(|| DownloadError::UnknownOffer(slug.to_string()))?;

        if !self.paid() {
            return Err(DownloadError::Locked);
        }

        Ok(OfferDownload {
            file_name: offer.file_name(),
            content_type: mime::TEXT_PLAIN.to_string(),
            body: OFFER_LETTER_BODY,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentLine {
    pub label: &'static str,
    pub uploaded: bool,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UniversityLine {
    pub name: String,
    pub country: &'static str,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferLine {
    pub university_name: String,
    pub file_name: String,
    pub slug: String,
    pub download_ready: bool,
}

/// Read-only aggregation of every earlier step, shown before and after submission.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    pub documents: Vec<DocumentLine>,
    pub countries: Vec<&'static str>,
    pub requirements: Vec<&'static str>,
    pub universities: Vec<UniversityLine>,
    pub phase: &'static str,
    pub offer_letters: Vec<OfferLine>,
}

impl SummaryView {
    pub fn build(form: &ApplicationForm, submission: &SubmissionState) -> Self {
        let UserProfile {
            full_name,
            email,
            ..
        } = &form.profile;

        let offer_letters = if submission.submitted() {
            submission
                .offer_letters()
                .iter()
                .map(|offer| OfferLine {
                    university_name: offer.university_name.clone(),
                    file_name: offer.file_name(),
                    slug: offer.slug(),
                    download_ready: submission.paid(),
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            full_name: full_name.clone(),
            email: email.clone(),
            mobile: form.profile.mobile().map(str::to_string),
            documents: form
                .documents
                .slots()
                .iter()
                .map(|slot| DocumentLine {
                    label: slot.kind.label(),
                    uploaded: slot.is_filled(),
                    file_name: slot.file_name().to_string(),
                })
                .collect(),
            countries: form
                .countries
                .as_slice()
                .iter()
                .map(|country| country.name())
                .collect(),
            requirements: form
                .requirements
                .checked()
                .into_iter()
                .map(|kind| kind.label())
                .collect(),
            universities: form
                .universities
                .selected()
                .map(|option| UniversityLine {
                    name: option.name.clone(),
                    country: option.country.name(),
                    description: option.description.clone(),
                })
                .collect(),
            phase: submission.phase().label(),
            offer_letters,
        }
    }
}
