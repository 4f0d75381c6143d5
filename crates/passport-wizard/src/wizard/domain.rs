use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Registration,
    DocumentUpload,
    CountrySelection,
    UniversitySelection,
    Summary,
}

impl WizardStep {
    pub const TOTAL: u8 = 5;

    pub const fn ordered() -> [Self; 5] {
        [
            Self::Registration,
            Self::DocumentUpload,
            Self::CountrySelection,
            Self::UniversitySelection,
            Self::Summary,
        ]
    }

    /// One-based position of the step, always within `1..=TOTAL`.
    pub const fn number(self) -> u8 {
        match self {
            Self::Registration => 1,
            Self::DocumentUpload => 2,
            Self::CountrySelection => 3,
            Self::UniversitySelection => 4,
            Self::Summary => 5,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|step| step.number() == number)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Registration => "Registration",
            Self::DocumentUpload => "Document Upload",
            Self::CountrySelection => "Country & Requirements Selection",
            Self::UniversitySelection => "University Selection",
            Self::Summary => "Summary & Submission",
        }
    }
}

/// Applicant details captured on the registration step. The password is demo-only and is
/// never validated, hashed, or echoed back in snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

impl UserProfile {
    pub fn is_complete(&self) -> bool {
        !self.full_name.is_empty() && !self.email.is_empty()
    }

    pub fn mobile(&self) -> Option<&str> {
        if self.mobile.is_empty() {
            None
        } else {
            Some(&self.mobile)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Ssc,
    Hsc,
    Cv,
    Passport,
    Motivation,
}

impl DocumentKind {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Ssc,
            Self::Hsc,
            Self::Cv,
            Self::Passport,
            Self::Motivation,
        ]
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::Ssc => "ssc",
            Self::Hsc => "hsc",
            Self::Cv => "cv",
            Self::Passport => "passport",
            Self::Motivation => "motivation",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ssc => "SSC Certificate",
            Self::Hsc => "HSC Certificate",
            Self::Cv => "CV / Resume",
            Self::Passport => "Passport Scan",
            Self::Motivation => "Motivation Letter",
        }
    }

    pub const fn is_required(self) -> bool {
        true
    }

    pub fn from_id(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ordered().into_iter().find(|kind| kind.id() == needle)
    }
}

/// Opaque reference to a file the applicant offered for a document slot. Only the declared
/// content type is inspected; the payload itself is never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFile {
    pub file_name: String,
    pub content_type: String,
    #[serde(default)]
    pub size_bytes: u64,
}

impl CandidateFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            size_bytes: 0,
        }
    }

    pub fn pdf(file_name: impl Into<String>) -> Self {
        Self::new(file_name, mime::APPLICATION_PDF.as_ref())
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == mime::APPLICATION_PDF.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSlot {
    pub kind: DocumentKind,
    pub file: Option<CandidateFile>,
}

impl DocumentSlot {
    pub fn empty(kind: DocumentKind) -> Self {
        Self { kind, file: None }
    }

    pub fn file_name(&self) -> &str {
        self.file
            .as_ref()
            .map(|file| file.file_name.as_str())
            .unwrap_or_default()
    }

    pub fn is_filled(&self) -> bool {
        self.file.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    Canada,
    Australia,
    Germany,
    #[serde(rename = "USA")]
    Usa,
    #[serde(rename = "UK")]
    Uk,
}

impl Country {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Canada,
            Self::Australia,
            Self::Germany,
            Self::Usa,
            Self::Uk,
        ]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Canada => "Canada",
            Self::Australia => "Australia",
            Self::Germany => "Germany",
            Self::Usa => "USA",
            Self::Uk => "UK",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Canada => "CA",
            Self::Australia => "AU",
            Self::Germany => "DE",
            Self::Usa => "US",
            Self::Uk => "GB",
        }
    }

    /// Resolves either the display name or the two-letter code, ignoring case.
    pub fn lookup(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ordered().into_iter().find(|country| {
            country.name().eq_ignore_ascii_case(raw) || country.code().eq_ignore_ascii_case(raw)
        })
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequirementKind {
    Parents,
    Spouse,
    Pr,
    WorkVisa,
    Scholarship,
}

impl RequirementKind {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Parents,
            Self::Spouse,
            Self::Pr,
            Self::WorkVisa,
            Self::Scholarship,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Parents => "Include parents",
            Self::Spouse => "Include spouse",
            Self::Pr => "PR options",
            Self::WorkVisa => "Post-study work visa",
            Self::Scholarship => "Scholarship options",
        }
    }

    pub const fn help(self) -> &'static str {
        match self {
            Self::Parents => "Include parents in the application process",
            Self::Spouse => "Include spouse in the application",
            Self::Pr => "Explore permanent residency options",
            Self::WorkVisa => "Post-study work visa assistance",
            Self::Scholarship => "Scholarship application support",
        }
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::Parents => "parents",
            Self::Spouse => "spouse",
            Self::Pr => "pr",
            Self::WorkVisa => "work-visa",
            Self::Scholarship => "scholarship",
        }
    }

    pub fn from_id(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ordered().into_iter().find(|kind| kind.id() == needle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementFlag {
    pub kind: RequirementKind,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniversityId(pub String);

impl fmt::Display for UniversityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityOption {
    pub id: UniversityId,
    pub name: String,
    pub country: Country,
    pub description: String,
    pub selected: bool,
}

/// Offer produced for a university that was selected when the application was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferLetter {
    pub university_name: String,
}

impl OfferLetter {
    /// Lower-cased university name with every whitespace run, leading and trailing runs
    /// included, replaced by one hyphen.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.university_name.len());
        let mut in_whitespace = false;
        for ch in self.university_name.chars() {
            if ch.is_whitespace() {
                if !in_whitespace {
                    slug.push('-');
                }
                in_whitespace = true;
            } else {
                slug.extend(ch.to_lowercase());
                in_whitespace = false;
            }
        }
        slug
    }

    pub fn file_name(&self) -> String {
        format!("offer-letter-{}.pdf", self.slug())
    }
}
