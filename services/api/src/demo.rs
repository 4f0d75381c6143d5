use crate::infra::InMemorySessionStore;
use clap::Args;
use passport_wizard::config::AppConfig;
use passport_wizard::error::AppError;
use passport_wizard::wizard::mock::MockOperation;
use passport_wizard::wizard::sessions::{SessionId, SessionSnapshot, SessionStore};
use passport_wizard::wizard::submission::DownloadError;
use passport_wizard::wizard::{
    CandidateFile, CardDetails, ControllerError, Country, DocumentKind, OfferDownload,
    PaymentMethod, RequirementKind, SessionServiceError, UniversityCatalogue, UniversityId,
    UserProfile, WizardIntent, WizardSessionService,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const FAST_DELAY: Duration = Duration::from_millis(50);
const POLL_INTERVAL: Duration = Duration::from_millis(25);
const MAX_POLLS: u32 = 200;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Applicant name entered on the registration step
    #[arg(long, default_value = "Demo Applicant")]
    pub(crate) name: String,
    /// Applicant email entered on the registration step
    #[arg(long, default_value = "applicant@example.com")]
    pub(crate) email: String,
    /// Attach a real file to a document slot, e.g. `--document cv=./resume.pdf`. The MIME type
    /// is guessed from the extension; slots without a file get a placeholder PDF.
    #[arg(long = "document", value_parser = parse_document)]
    pub(crate) documents: Vec<DocumentUpload>,
    /// Destination country by name or code (repeatable, defaults to Canada)
    #[arg(long = "country", value_parser = parse_country)]
    pub(crate) countries: Vec<Country>,
    /// Requirement to tick: parents, spouse, pr, work-visa, scholarship (repeatable)
    #[arg(long = "requirement", value_parser = parse_requirement)]
    pub(crate) requirements: Vec<RequirementKind>,
    /// University id to select (repeatable, defaults to the first university per country)
    #[arg(long = "university")]
    pub(crate) universities: Vec<String>,
    /// Pay with PayPal instead of the demo card
    #[arg(long)]
    pub(crate) paypal: bool,
    /// Shrink both mock delays so the walk finishes almost immediately
    #[arg(long)]
    pub(crate) fast: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct DocumentUpload {
    pub(crate) kind: DocumentKind,
    pub(crate) path: PathBuf,
}

fn parse_document(raw: &str) -> Result<DocumentUpload, String> {
    let (kind, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KIND=PATH, got '{raw}'"))?;
    let kind = DocumentKind::from_id(kind).ok_or_else(|| {
        format!("unknown document kind '{kind}' (expected ssc, hsc, cv, passport or motivation)")
    })?;
    if path.trim().is_empty() {
        return Err(format!("missing path for document '{}'", kind.id()));
    }
    Ok(DocumentUpload {
        kind,
        path: PathBuf::from(path.trim()),
    })
}

fn parse_country(raw: &str) -> Result<Country, String> {
    Country::lookup(raw).ok_or_else(|| {
        format!("unknown country '{raw}' (expected Canada, Australia, Germany, USA or UK)")
    })
}

fn parse_requirement(raw: &str) -> Result<RequirementKind, String> {
    RequirementKind::from_id(raw).ok_or_else(|| format!("unknown requirement '{raw}'"))
}

fn candidate_from_path(path: &Path) -> Result<CandidateFile, AppError> {
    let metadata = std::fs::metadata(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let content_type = mime_guess::from_path(path).first_or_octet_stream();

    Ok(CandidateFile {
        file_name,
        content_type: content_type.essence_str().to_string(),
        size_bytes: metadata.len(),
    })
}

pub(crate) fn print_catalogue() {
    let catalogue = UniversityCatalogue::standard();
    println!("University catalogue");
    for country in Country::ordered() {
        println!("\n{} ({})", country.name(), country.code());
        for entry in catalogue.universities_for(country) {
            println!("- {}: {} | {}", entry.id, entry.name, entry.description);
        }
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mut settings = AppConfig::load()?.wizard;
    if args.fast {
        settings = settings.with_delays(FAST_DELAY);
    }

    let service = WizardSessionService::new(Arc::new(InMemorySessionStore::default()), settings);
    println!("Passport wizard demo");
    let outcome = walk(&service, args).await?;

    println!("\nDownloads");
    for download in &outcome.downloads {
        println!(
            "- {} ({}): \"{}\"",
            download.file_name, download.content_type, download.body
        );
    }

    service.close(&outcome.session_id)?;
    Ok(())
}

pub(crate) struct DemoOutcome {
    pub(crate) session_id: SessionId,
    pub(crate) downloads: Vec<OfferDownload>,
}

pub(crate) async fn walk<S>(
    service: &WizardSessionService<S>,
    args: DemoArgs,
) -> Result<DemoOutcome, AppError>
where
    S: SessionStore + 'static,
{
    let DemoArgs {
        name,
        email,
        documents,
        countries,
        requirements,
        universities,
        paypal,
        fast: _,
    } = args;

    let snapshot = service.create()?;
    let id = snapshot.session_id.clone();
    print_step(&snapshot);

    let profile = UserProfile {
        full_name: name,
        email,
        ..UserProfile::default()
    };
    let snapshot = service.dispatch(&id, WizardIntent::SubmitProfile { profile })?;
    print_step(&snapshot);

    for kind in DocumentKind::ordered() {
        let provided = documents.iter().rev().find(|upload| upload.kind == kind);
        let candidate = match provided {
            Some(upload) => candidate_from_path(&upload.path)?,
            None => CandidateFile::pdf(format!("{}-placeholder.pdf", kind.id())),
        };
        let file_name = candidate.file_name.clone();

        match service.dispatch(&id, WizardIntent::AttachDocument { kind, file: candidate }) {
            Ok(_) => println!("- {}: {}", kind.label(), file_name),
            Err(SessionServiceError::Controller(ControllerError::Rejected(rejection))) => {
                println!("! {rejection}; using a placeholder instead");
                service.dispatch(
                    &id,
                    WizardIntent::AttachDocument {
                        kind,
                        file: CandidateFile::pdf(format!("{}-placeholder.pdf", kind.id())),
                    },
                )?;
            }
            Err(err) => return Err(err.into()),
        }
    }
    let snapshot = service.dispatch(&id, WizardIntent::Next)?;
    print_step(&snapshot);

    let countries = if countries.is_empty() {
        vec![Country::Canada]
    } else {
        countries
    };
    for country in countries {
        service.dispatch(&id, WizardIntent::ToggleCountry { country })?;
    }
    for requirement in requirements {
        service.dispatch(&id, WizardIntent::ToggleRequirement { requirement })?;
    }
    let snapshot = service.dispatch(&id, WizardIntent::Next)?;
    print_step(&snapshot);

    for university in universities {
        let intent = WizardIntent::ToggleUniversity {
            university_id: UniversityId(university),
        };
        match service.dispatch(&id, intent) {
            Ok(_) => {}
            Err(SessionServiceError::Controller(ControllerError::Rejected(rejection))) => {
                println!("! {rejection}");
            }
            Err(err) => return Err(err.into()),
        }
    }
    let mut snapshot = service.snapshot(&id)?;
    if snapshot.universities_selected == 0 {
        let defaults: Vec<UniversityId> = snapshot
            .university_groups
            .iter()
            .filter_map(|group| group.universities.first())
            .map(|option| option.id.clone())
            .collect();
        for university_id in defaults {
            snapshot = service.dispatch(&id, WizardIntent::ToggleUniversity { university_id })?;
        }
    }
    print_universities(&snapshot);

    let snapshot = service.dispatch(&id, WizardIntent::Next)?;
    print_step(&snapshot);
    print_summary(&snapshot);

    service.start_submission(&id)?;
    println!(
        "\nSubmitting application ({} ms mock)...",
        service.settings().submission_delay.as_millis()
    );
    let snapshot = wait_for(service, &id, MockOperation::Submission, |snapshot| {
        snapshot.submitted
    })
    .await?;
    print_summary(&snapshot);

    for offer in snapshot.state.submission().offer_letters() {
        if let Err(SessionServiceError::Download(DownloadError::Locked)) =
            service.download(&id, &offer.slug())
        {
            println!("- {} is locked until payment", offer.file_name());
        }
    }

    if paypal {
        service.dispatch(
            &id,
            WizardIntent::SelectPaymentMethod {
                method: PaymentMethod::PayPal,
            },
        )?;
    } else {
        service.dispatch(
            &id,
            WizardIntent::UpdateCard {
                card: CardDetails {
                    number: "4242 4242 4242 4242".to_string(),
                    expiry: "12/30".to_string(),
                    cvv: "123".to_string(),
                    name: snapshot
                        .summary
                        .as_ref()
                        .map(|summary| summary.full_name.clone())
                        .unwrap_or_default(),
                },
            },
        )?;
    }

    let amount = snapshot.state.payment().amount();
    service.start_payment(&id)?;
    println!(
        "\nProcessing payment of ${amount} via {} ({} ms mock)...",
        if paypal { "PayPal" } else { "card" },
        service.settings().payment_delay.as_millis()
    );
    let snapshot = wait_for(service, &id, MockOperation::Payment, |snapshot| snapshot.paid).await?;
    println!("Payment complete: offer letters unlocked");

    let downloads = snapshot
        .state
        .submission()
        .offer_letters()
        .iter()
        .map(|offer| service.download(&id, &offer.slug()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DemoOutcome {
        session_id: id,
        downloads,
    })
}

async fn wait_for<S, F>(
    service: &WizardSessionService<S>,
    id: &SessionId,
    operation: MockOperation,
    done: F,
) -> Result<SessionSnapshot, AppError>
where
    S: SessionStore + 'static,
    F: Fn(&SessionSnapshot) -> bool,
{
    let delay = match operation {
        MockOperation::Submission => service.settings().submission_delay,
        MockOperation::Payment => service.settings().payment_delay,
    };
    tokio::time::sleep(delay).await;

    for _ in 0..MAX_POLLS {
        let snapshot = service.snapshot(id)?;
        if done(&snapshot) {
            return Ok(snapshot);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    Err(AppError::Io(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("{} mock did not complete", operation.label()),
    )))
}

fn print_step(snapshot: &SessionSnapshot) {
    println!(
        "\nStep {} of {}: {}",
        snapshot.step, snapshot.total_steps, snapshot.step_label
    );
}

fn print_universities(snapshot: &SessionSnapshot) {
    for group in &snapshot.university_groups {
        println!("{} ({})", group.country, group.code);
        for option in &group.universities {
            let marker = if option.selected { "x" } else { " " };
            println!("- [{marker}] {} | {}", option.name, option.description);
        }
    }
    println!(
        "Selected: {} of {} universities",
        snapshot.universities_selected, snapshot.universities_total
    );
}

fn print_summary(snapshot: &SessionSnapshot) {
    let Some(summary) = snapshot.summary.as_ref() else {
        return;
    };

    println!("Applicant: {} <{}>", summary.full_name, summary.email);
    if let Some(mobile) = &summary.mobile {
        println!("Mobile: {mobile}");
    }
    for line in &summary.documents {
        let status = if line.uploaded { "uploaded" } else { "missing" };
        println!("- {}: {} {}", line.label, status, line.file_name);
    }
    println!("Countries: {}", summary.countries.join(", "));
    if !summary.requirements.is_empty() {
        println!("Requirements: {}", summary.requirements.join(", "));
    }
    for university in &summary.universities {
        println!("- {} ({})", university.name, university.country);
    }
    println!("Status: {}", summary.phase);
    for offer in &summary.offer_letters {
        let state = if offer.download_ready { "ready" } else { "locked" };
        println!("- {} [{state}]", offer.file_name);
    }
}
