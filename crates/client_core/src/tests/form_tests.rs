use super::*;
use shared::domain::PublicationType;

fn catalog() -> TypeCatalog {
    TypeCatalog::new(vec![
        PublicationType {
            id: "1".into(),
            name: "scientific".into(),
        },
        PublicationType {
            id: "2".into(),
            name: "thesis".into(),
        },
    ])
}

fn complete_draft() -> FormDraft {
    FormDraft {
        kind: "thesis".to_string(),
        title: "Open access in engineering".to_string(),
        is_collective_authors: false,
        authors: "Petrov P.".to_string(),
        coauthors: Vec::new(),
        contact_name: "Petrov P.".to_string(),
        contact_phone: "+7 495 223-05-23".to_string(),
        contact_email: "petrov@example.org".to_string(),
        no_state_secret: false,
        expert_number: "17".to_string(),
        expert_date: "01.03.2024".to_string(),
        expert_start: "04.03.2024".to_string(),
        expert_end: "15.03.2024".to_string(),
    }
}

#[test]
fn minimal_draft_with_required_fields_validates() {
    let draft = complete_draft();
    assert!(validate(&draft));
    assert!(draft.missing_fields().is_empty());
}

#[test]
fn any_blank_required_field_fails_validation() {
    for field in RequiredField::ALL {
        let mut draft = complete_draft();
        match field {
            RequiredField::Type => draft.kind.clear(),
            RequiredField::Title => draft.title.clear(),
            RequiredField::Authors => draft.authors.clear(),
            RequiredField::ContactName => draft.contact_name.clear(),
            RequiredField::ContactPhone => draft.contact_phone.clear(),
            RequiredField::ContactEmail => draft.contact_email.clear(),
            RequiredField::ExpertNumber => draft.expert_number.clear(),
            RequiredField::ExpertDate => draft.expert_date.clear(),
            RequiredField::ExpertStart => draft.expert_start.clear(),
            RequiredField::ExpertEnd => draft.expert_end.clear(),
        }
        assert!(!validate(&draft), "{field} should be required");
        assert_eq!(draft.missing_fields(), vec![field]);
    }
}

#[test]
fn empty_draft_reports_every_required_field() {
    assert_eq!(
        FormDraft::default().missing_fields(),
        RequiredField::ALL.to_vec()
    );
}

#[test]
fn coauthor_edits_ignore_out_of_range_indexes() {
    let mut draft = FormDraft::default();
    draft.add_coauthor();
    draft.add_coauthor();
    draft.set_coauthor(0, "Sidorov S.");
    draft.set_coauthor(1, "Kuznetsova K.");
    draft.set_coauthor(5, "ignored");
    assert_eq!(draft.coauthors, vec!["Sidorov S.", "Kuznetsova K."]);

    draft.remove_coauthor(9);
    assert_eq!(draft.coauthors.len(), 2);

    draft.remove_coauthor(0);
    assert_eq!(draft.coauthors, vec!["Kuznetsova K."]);
}

#[test]
fn compose_joins_coauthors_and_stamps_unpadded_date() {
    let mut controller = FormController::new();
    *controller.draft_mut() = complete_draft();
    controller.draft_mut().coauthors = vec!["Sidorov S.".to_string(), "Kuznetsova K.".to_string()];

    let today = NaiveDate::from_ymd_opt(2024, 3, 5).expect("date");
    let request = controller.compose(&catalog(), today).expect("compose");

    assert_eq!(request.coauthors, "Sidorov S., Kuznetsova K.");
    assert_eq!(request.status, PublicationStatus::Pending);
    assert_eq!(request.kind.as_str(), "thesis");

    let body = serde_json::to_value(&request).expect("json");
    assert_eq!(body["createdAt"], "5.3.2024");
    assert_eq!(body["type"], "thesis");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["contactEmail"], "petrov@example.org");
}

#[test]
fn compose_rejects_missing_fields_and_unknown_types() {
    let mut controller = FormController::new();
    *controller.draft_mut() = complete_draft();
    controller.draft_mut().contact_email.clear();
    let today = NaiveDate::from_ymd_opt(2024, 3, 5).expect("date");

    let err = controller
        .compose(&catalog(), today)
        .expect_err("missing email");
    assert!(matches!(
        err,
        ClientError::Validation { ref missing } if missing == &vec![RequiredField::ContactEmail]
    ));
    assert_eq!(err.to_string(), "missing required fields: contactEmail");

    controller.draft_mut().contact_email = "petrov@example.org".to_string();
    controller.draft_mut().kind = "monograph".to_string();
    let err = controller
        .compose(&catalog(), today)
        .expect_err("unknown type");
    assert!(matches!(err, ClientError::UnknownType(_)));
    assert!(err.is_validation());
}

#[test]
fn default_type_fills_empty_draft_and_survives_reset_and_close() {
    let mut controller = FormController::new();
    controller.set_default_type(catalog().first().cloned());
    assert_eq!(controller.draft().kind, "scientific");

    controller.open();
    controller.draft_mut().title = "Draft title".to_string();
    controller.close();

    assert!(!controller.is_open());
    assert_eq!(controller.draft(), &FormDraft::with_type(catalog().first()));
}

#[test]
fn expert_dates_are_zero_padded() {
    let mut draft = FormDraft::default();
    draft.set_expert_dates(
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"),
        NaiveDate::from_ymd_opt(2024, 3, 4).expect("date"),
        NaiveDate::from_ymd_opt(2024, 12, 15).expect("date"),
    );
    assert_eq!(draft.expert_date, "01.03.2024");
    assert_eq!(draft.expert_start, "04.03.2024");
    assert_eq!(draft.expert_end, "15.12.2024");
}
