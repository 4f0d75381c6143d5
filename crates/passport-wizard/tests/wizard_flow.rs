use passport_wizard::wizard::payment::PaymentError;
use passport_wizard::wizard::submission::{DownloadError, SubmissionError};
use passport_wizard::wizard::{
    CandidateFile, ControllerError, Country, DocumentKind, StepRejection, UniversityCatalogue,
    UniversityId, UserProfile, WizardController, WizardIntent, WizardStep,
};

fn applicant() -> UserProfile {
    UserProfile {
        full_name: "Grace Hopper".to_string(),
        email: "grace@example.com".to_string(),
        mobile: String::new(),
        password: "demo".to_string(),
    }
}

fn upload_all(controller: &mut WizardController) {
    for kind in DocumentKind::ordered() {
        controller
            .dispatch(WizardIntent::AttachDocument {
                kind,
                file: CandidateFile::pdf(format!("{}.pdf", kind.id())),
            })
            .expect("pdf accepted");
    }
}

fn controller_on_countries() -> WizardController {
    let mut controller = WizardController::default();
    controller
        .dispatch(WizardIntent::SubmitProfile {
            profile: applicant(),
        })
        .expect("profile accepted");
    upload_all(&mut controller);
    controller
        .dispatch(WizardIntent::Next)
        .expect("documents complete");
    assert_eq!(controller.step(), WizardStep::CountrySelection);
    controller
}

fn pick(controller: &mut WizardController, id: &str) {
    controller
        .dispatch(WizardIntent::ToggleUniversity {
            university_id: UniversityId(id.to_string()),
        })
        .expect("university listed");
}

#[test]
fn step_never_leaves_its_bounds() {
    let mut controller = WizardController::default();
    for _ in 0..3 {
        assert_eq!(controller.retreat(), WizardStep::Registration);
    }
    for _ in 0..12 {
        let step = controller.advance();
        assert!((1..=WizardStep::TOTAL).contains(&step.number()));
    }
    assert_eq!(controller.step(), WizardStep::Summary);

    for _ in 0..12 {
        let step = controller.retreat();
        assert!((1..=WizardStep::TOTAL).contains(&step.number()));
    }
    assert_eq!(controller.step(), WizardStep::Registration);
}

#[test]
fn registration_requires_name_and_email() {
    let mut controller = WizardController::default();
    let outcome = controller.dispatch(WizardIntent::SubmitProfile {
        profile: UserProfile {
            full_name: String::new(),
            ..applicant()
        },
    });

    assert_eq!(
        outcome,
        Err(ControllerError::Rejected(StepRejection::IncompleteProfile))
    );
    assert_eq!(controller.step(), WizardStep::Registration);
    assert_eq!(controller.state().form().profile.email, applicant().email);
}

#[test]
fn document_gate_requires_every_slot() {
    let mut controller = WizardController::default();
    controller
        .dispatch(WizardIntent::SubmitProfile {
            profile: applicant(),
        })
        .expect("profile accepted");
    upload_all(&mut controller);
    controller
        .dispatch(WizardIntent::DetachDocument {
            kind: DocumentKind::Passport,
        })
        .expect("detach always succeeds");

    let outcome = controller.dispatch(WizardIntent::Next);
    assert_eq!(
        outcome,
        Err(ControllerError::Rejected(StepRejection::MissingDocuments {
            missing: vec![DocumentKind::Passport],
        }))
    );
    assert_eq!(
        outcome.map_err(|err| err.to_string()),
        Err("Please upload all required documents".to_string())
    );
    assert_eq!(controller.step(), WizardStep::DocumentUpload);

    controller
        .dispatch(WizardIntent::AttachDocument {
            kind: DocumentKind::Passport,
            file: CandidateFile::pdf("passport.pdf"),
        })
        .expect("pdf accepted");
    assert_eq!(
        controller.dispatch(WizardIntent::Next),
        Ok(WizardStep::CountrySelection)
    );
}

#[test]
fn non_pdf_uploads_are_rejected_and_leave_the_slot_empty() {
    let mut controller = WizardController::default();
    controller
        .dispatch(WizardIntent::SubmitProfile {
            profile: applicant(),
        })
        .expect("profile accepted");

    let outcome = controller.dispatch(WizardIntent::AttachDocument {
        kind: DocumentKind::Ssc,
        file: CandidateFile::new("ssc.jpg", "image/jpeg"),
    });
    assert!(matches!(
        outcome,
        Err(ControllerError::Rejected(StepRejection::UnsupportedFileType {
            kind: DocumentKind::Ssc,
            ..
        }))
    ));

    let slot = controller
        .state()
        .form()
        .documents
        .slot(DocumentKind::Ssc)
        .expect("ssc slot exists");
    assert!(!slot.is_filled());
}

#[test]
fn country_gate_requires_a_selection() {
    let mut controller = controller_on_countries();
    let outcome = controller.dispatch(WizardIntent::Next);
    assert_eq!(
        outcome.map_err(|err| err.to_string()),
        Err("Please select at least one country".to_string())
    );
    assert_eq!(controller.step(), WizardStep::CountrySelection);
}

#[test]
fn universities_follow_country_selection_order() {
    let mut controller = controller_on_countries();
    for country in [Country::Uk, Country::Canada] {
        controller
            .dispatch(WizardIntent::ToggleCountry { country })
            .expect("country step active");
    }
    controller.dispatch(WizardIntent::Next).expect("countries chosen");

    let universities = &controller.state().form().universities;
    let countries: Vec<Country> = universities
        .options()
        .iter()
        .map(|option| option.country)
        .collect();
    assert_eq!(
        countries,
        vec![
            Country::Uk,
            Country::Uk,
            Country::Uk,
            Country::Canada,
            Country::Canada,
            Country::Canada,
        ]
    );
    assert!(universities.options().iter().all(|option| !option.selected));

    let groups = universities.grouped_by_country();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].0, Country::Uk);
    assert_eq!(groups[1].0, Country::Canada);
}

#[test]
fn going_back_and_changing_countries_discards_picks() {
    let mut controller = controller_on_countries();
    controller
        .dispatch(WizardIntent::ToggleCountry {
            country: Country::Canada,
        })
        .expect("country step active");
    controller.dispatch(WizardIntent::Next).expect("canada chosen");
    pick(&mut controller, "mcgill");
    assert_eq!(controller.state().form().universities.selected_count(), 1);

    controller.dispatch(WizardIntent::Back).expect("back to countries");
    for country in [Country::Canada, Country::Germany] {
        controller
            .dispatch(WizardIntent::ToggleCountry { country })
            .expect("country step active");
    }
    controller.dispatch(WizardIntent::Next).expect("germany chosen");

    let universities = &controller.state().form().universities;
    assert_eq!(universities.len(), 2);
    assert_eq!(universities.selected_count(), 0);
    assert!(universities
        .options()
        .iter()
        .all(|option| option.country == Country::Germany));
}

#[test]
fn university_gate_requires_a_pick() {
    let mut controller = controller_on_countries();
    controller
        .dispatch(WizardIntent::ToggleCountry {
            country: Country::Australia,
        })
        .expect("country step active");
    controller.dispatch(WizardIntent::Next).expect("australia chosen");

    assert_eq!(
        controller
            .dispatch(WizardIntent::Next)
            .map_err(|err| err.to_string()),
        Err("Please select at least one university".to_string())
    );

    let unknown = controller.dispatch(WizardIntent::ToggleUniversity {
        university_id: UniversityId("oxford".to_string()),
    });
    assert!(matches!(
        unknown,
        Err(ControllerError::Rejected(StepRejection::UnknownUniversity(_)))
    ));
}

#[test]
fn offer_letters_follow_selected_universities_in_list_order() {
    let mut controller = controller_on_countries();
    controller
        .dispatch(WizardIntent::ToggleCountry {
            country: Country::Usa,
        })
        .expect("country step active");
    controller.dispatch(WizardIntent::Next).expect("usa chosen");

    pick(&mut controller, "stanford");
    pick(&mut controller, "mit");
    controller.dispatch(WizardIntent::Next).expect("two picked");
    controller.submit_immediately().expect("submission completes");

    let offers: Vec<String> = controller
        .state()
        .submission()
        .offer_letters()
        .iter()
        .map(|offer| offer.file_name())
        .collect();
    assert_eq!(
        offers,
        vec![
            "offer-letter-mit.pdf".to_string(),
            "offer-letter-stanford-university.pdf".to_string(),
        ]
    );
}

#[test]
fn downloads_stay_locked_until_paid_and_payment_is_one_way() {
    let mut controller = controller_on_countries();
    controller
        .dispatch(WizardIntent::ToggleCountry {
            country: Country::Germany,
        })
        .expect("country step active");
    controller.dispatch(WizardIntent::Next).expect("germany chosen");
    pick(&mut controller, "tu-berlin");
    controller.dispatch(WizardIntent::Next).expect("one picked");

    assert_eq!(
        controller.state().download_offer("tu-berlin"),
        Err(DownloadError::UnknownOffer("tu-berlin".to_string()))
    );

    controller.submit_immediately().expect("submission completes");
    assert_eq!(
        controller.submit_immediately(),
        Err(ControllerError::Submission(SubmissionError::AlreadySubmitted))
    );
    assert_eq!(
        controller.state().download_offer("tu-berlin"),
        Err(DownloadError::Locked)
    );

    assert_eq!(
        controller.pay_immediately(),
        Err(ControllerError::Payment(PaymentError::NotReady))
    );
    controller
        .dispatch(WizardIntent::UpdateCard {
            card: passport_wizard::wizard::CardDetails {
                name: "Grace Hopper".to_string(),
                number: "4000 0000 0000 0002".to_string(),
                expiry: "12/30".to_string(),
                cvv: "123".to_string(),
            },
        })
        .expect("dialog editable");
    controller.pay_immediately().expect("payment completes");

    let download = controller
        .state()
        .download_offer("tu-berlin")
        .expect("download unlocked");
    assert_eq!(download.file_name, "offer-letter-tu-berlin.pdf");
    assert_eq!(download.content_type, "text/plain");
    assert_eq!(download.body, "Demo Offer Letter");

    assert_eq!(
        controller.pay_immediately(),
        Err(ControllerError::Payment(PaymentError::Unavailable))
    );
    assert!(controller.state().paid());
}

#[test]
fn catalogue_materializes_fresh_unselected_options() {
    let catalogue = UniversityCatalogue::standard();
    let options = catalogue.materialize(&[Country::Germany, Country::Canada]);
    let names: Vec<&str> = options.iter().map(|option| option.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "LMU Munich",
            "TU Berlin",
            "University of Toronto",
            "McGill University",
            "University of British Columbia",
        ]
    );
    assert!(options.iter().all(|option| !option.selected));
}
