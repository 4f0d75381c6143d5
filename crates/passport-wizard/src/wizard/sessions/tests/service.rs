use super::common::*;
use std::sync::Arc;
use std::time::Duration;

use crate::wizard::domain::{Country, DocumentKind, UniversityId, UserProfile, WizardStep};
use crate::wizard::mock::MockOperation;
use crate::wizard::payment::{CardDetails, PaymentError, PaymentMethod, PaymentStatus};
use crate::wizard::sessions::repository::{SessionStore, SessionStoreError};
use crate::wizard::sessions::{SessionServiceError, WizardSessionService};
use crate::wizard::state::{ControllerError, WizardIntent};
use crate::wizard::steps::StepRejection;
use crate::wizard::submission::{DownloadError, SubmissionError};

#[test]
fn create_opens_on_registration() {
    let (service, store) = build_service();
    let snapshot = service.create().expect("session opens");

    assert_eq!(snapshot.step, 1);
    assert_eq!(snapshot.total_steps, 5);
    assert!(!snapshot.submitted);
    assert!(snapshot.session_id.0.starts_with("wiz-"));
    assert!(store
        .fetch(&snapshot.session_id)
        .expect("fetch succeeds")
        .is_some());
}

#[test]
fn refused_registration_still_stores_the_typed_profile() {
    let (service, store) = build_service();
    let id = service.create().expect("session opens").session_id;

    let outcome = service.dispatch(
        &id,
        WizardIntent::SubmitProfile {
            profile: UserProfile {
                email: String::new(),
                ..profile()
            },
        },
    );
    assert!(matches!(
        outcome,
        Err(SessionServiceError::Controller(ControllerError::Rejected(
            StepRejection::IncompleteProfile
        )))
    ));

    let stored = store
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.state.step(), WizardStep::Registration);
    assert_eq!(stored.state.form().profile.full_name, "Ada Lovelace");
}

#[test]
fn missing_document_blocks_the_upload_step() {
    let (service, store) = build_service();
    let id = service.create().expect("session opens").session_id;
    service
        .dispatch(&id, WizardIntent::SubmitProfile { profile: profile() })
        .expect("profile accepted");
    for kind in DocumentKind::ordered()
        .into_iter()
        .filter(|kind| *kind != DocumentKind::Motivation)
    {
        service
            .dispatch(
                &id,
                WizardIntent::AttachDocument {
                    kind,
                    file: crate::wizard::domain::CandidateFile::pdf("scan.pdf"),
                },
            )
            .expect("pdf accepted");
    }

    match service.dispatch(&id, WizardIntent::Next) {
        Err(SessionServiceError::Controller(ControllerError::Rejected(
            StepRejection::MissingDocuments { missing },
        ))) => assert_eq!(missing, vec![DocumentKind::Motivation]),
        other => panic!("expected missing documents, got {other:?}"),
    }

    let stored = store
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.state.step(), WizardStep::DocumentUpload);
}

#[test]
fn changing_countries_discards_university_picks() {
    let (service, _) = build_service();
    let id = session_on_university_step(&service, Country::Canada);
    service
        .dispatch(
            &id,
            WizardIntent::ToggleUniversity {
                university_id: UniversityId("toronto".to_string()),
            },
        )
        .expect("toronto listed");

    service
        .dispatch(&id, WizardIntent::Back)
        .expect("back to countries");
    service
        .dispatch(
            &id,
            WizardIntent::ToggleCountry {
                country: Country::Canada,
            },
        )
        .expect("canada removed");
    service
        .dispatch(
            &id,
            WizardIntent::ToggleCountry {
                country: Country::Germany,
            },
        )
        .expect("germany added");
    let snapshot = service
        .dispatch(&id, WizardIntent::Next)
        .expect("germany chosen");

    assert_eq!(snapshot.step, 4);
    assert_eq!(snapshot.universities_total, 2);
    assert_eq!(snapshot.universities_selected, 0);
    assert_eq!(snapshot.university_groups.len(), 1);
    assert_eq!(snapshot.university_groups[0].country, Country::Germany);
}

#[tokio::test(start_paused = true)]
async fn submission_completes_after_the_mock_delay() {
    let (service, _) = build_service();
    let id = session_on_summary(&service, &["toronto", "ubc"]);

    let snapshot = service.start_submission(&id).expect("submission starts");
    assert!(!snapshot.submitted);
    assert!(service.is_running(&id, MockOperation::Submission));

    match service.start_submission(&id) {
        Err(SessionServiceError::Controller(ControllerError::Submission(
            SubmissionError::InFlight,
        ))) => {}
        other => panic!("expected in-flight rejection, got {other:?}"),
    }

    tokio::time::sleep(Duration::from_millis(2999)).await;
    assert!(!service.snapshot(&id).expect("snapshot").submitted);

    tokio::time::sleep(Duration::from_millis(2)).await;
    let snapshot = service.snapshot(&id).expect("snapshot");
    assert!(snapshot.submitted);
    assert!(!snapshot.paid);
    assert!(snapshot.state.payment().is_open());

    let offers: Vec<&str> = snapshot
        .state
        .submission()
        .offer_letters()
        .iter()
        .map(|offer| offer.university_name.as_str())
        .collect();
    assert_eq!(
        offers,
        vec!["University of Toronto", "University of British Columbia"]
    );
}

#[tokio::test(start_paused = true)]
async fn payment_unlocks_downloads() {
    let (service, _) = build_service();
    let id = session_on_summary(&service, &["mcgill"]);

    match service.start_payment(&id) {
        Err(SessionServiceError::Controller(ControllerError::Payment(
            PaymentError::Unavailable,
        ))) => {}
        other => panic!("payment must wait for submission, got {other:?}"),
    }

    service.start_submission(&id).expect("submission starts");
    tokio::time::sleep(Duration::from_millis(3001)).await;

    match service.download(&id, "mcgill-university") {
        Err(SessionServiceError::Download(DownloadError::Locked)) => {}
        other => panic!("download must be locked before payment, got {other:?}"),
    }

    match service.start_payment(&id) {
        Err(SessionServiceError::Controller(ControllerError::Payment(PaymentError::NotReady))) => {}
        other => panic!("card details are missing, got {other:?}"),
    }

    service
        .dispatch(
            &id,
            WizardIntent::UpdateCard {
                card: CardDetails {
                    name: "Ada Lovelace".to_string(),
                    number: "4242 4242 4242 4242".to_string(),
                    ..CardDetails::default()
                },
            },
        )
        .expect("card captured");
    let snapshot = service.start_payment(&id).expect("payment starts");
    assert_eq!(snapshot.state.payment().status(), PaymentStatus::Processing);
    assert!(!snapshot.can_pay);

    tokio::time::sleep(Duration::from_millis(2001)).await;
    let snapshot = service.snapshot(&id).expect("snapshot");
    assert!(snapshot.paid);
    assert!(!snapshot.state.payment().is_open());

    let download = service
        .download(&id, "mcgill-university")
        .expect("download unlocked");
    assert_eq!(download.file_name, "offer-letter-mcgill-university.pdf");

    match service.dispatch(&id, WizardIntent::OpenPayment) {
        Err(SessionServiceError::Controller(ControllerError::Payment(
            PaymentError::Unavailable,
        ))) => {}
        other => panic!("payment cannot be reopened once paid, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn paypal_payment_skips_card_details() {
    let (service, _) = build_service();
    let id = session_on_summary(&service, &["ubc"]);
    service.start_submission(&id).expect("submission starts");
    tokio::time::sleep(Duration::from_millis(3001)).await;

    service
        .dispatch(
            &id,
            WizardIntent::SelectPaymentMethod {
                method: PaymentMethod::PayPal,
            },
        )
        .expect("method chosen");
    service.start_payment(&id).expect("payment starts");
    tokio::time::sleep(Duration::from_millis(2001)).await;

    assert!(service.snapshot(&id).expect("snapshot").paid);
}

#[tokio::test(start_paused = true)]
async fn closing_a_session_aborts_its_timers() {
    let (service, store) = build_service();
    let id = session_on_summary(&service, &["toronto"]);
    service.start_submission(&id).expect("submission starts");

    service.close(&id).expect("session closes");
    assert!(!service.is_running(&id, MockOperation::Submission));
    tokio::time::sleep(Duration::from_millis(5000)).await;

    assert!(store.fetch(&id).expect("fetch succeeds").is_none());
    assert!(matches!(
        service.snapshot(&id),
        Err(SessionServiceError::Store(SessionStoreError::NotFound))
    ));
}

#[test]
fn unavailable_store_propagates() {
    let service = WizardSessionService::new(Arc::new(UnavailableStore), settings());
    assert!(matches!(
        service.create(),
        Err(SessionServiceError::Store(SessionStoreError::Unavailable(_)))
    ));
}
