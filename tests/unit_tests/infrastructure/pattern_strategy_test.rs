use callsheet::application::ports::ContactExtractor;
use callsheet::domain::{DocumentProfile, ExtractionOptions, RawContact, StrategyKind};
use callsheet::infrastructure::strategies::PatternStrategy;

async fn extract(text: &str) -> Vec<RawContact> {
    PatternStrategy::new()
        .extract(
            text,
            &DocumentProfile::unknown(),
            &ExtractionOptions::default(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn given_tab_separated_row_when_extracting_then_all_fields_found() {
    let contacts = extract("Jane Doe\tDirector\tjane@prod.com\t+1 555 010 0100").await;

    assert_eq!(contacts.len(), 1);
    let contact = &contacts[0];
    assert_eq!(contact.name, "Jane Doe");
    assert_eq!(contact.role.as_deref(), Some("Director"));
    assert_eq!(contact.email.as_deref(), Some("jane@prod.com"));
    assert_eq!(contact.phone.as_deref(), Some("+1 555 010 0100"));
    assert_eq!(contact.source, StrategyKind::Pattern);
    assert_eq!(contact.raw_confidence, 0.85);
}

#[tokio::test]
async fn given_pipe_separated_row_when_extracting_then_found() {
    let contacts = extract("| Ada Lovelace | Gaffer | ada@prod.com |").await;

    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Ada Lovelace");
    assert_eq!(contacts[0].role.as_deref(), Some("Gaffer"));
    assert_eq!(contacts[0].email.as_deref(), Some("ada@prod.com"));
    assert_eq!(contacts[0].raw_confidence, 0.85);
}

#[tokio::test]
async fn given_labeled_line_when_extracting_then_role_and_company_found() {
    let contacts =
        extract("Director: Jane Doe (Apex Films) jane@apex.com +1 555-010-0100").await;

    assert_eq!(contacts.len(), 1);
    let contact = &contacts[0];
    assert_eq!(contact.name, "Jane Doe");
    assert_eq!(contact.role.as_deref(), Some("Director"));
    assert_eq!(contact.company.as_deref(), Some("Apex Films"));
    assert_eq!(contact.email.as_deref(), Some("jane@apex.com"));
    assert_eq!(contact.phone.as_deref(), Some("+1 555-010-0100"));
    assert_eq!(contact.raw_confidence, 0.8);
}

#[tokio::test]
async fn given_loose_prose_line_when_extracting_then_name_paired_with_email() {
    let contacts = extract("please reach Jane Doe at jane@apex.com about the schedule").await;

    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Jane Doe");
    assert_eq!(contacts[0].email.as_deref(), Some("jane@apex.com"));
    assert!(contacts[0].role.is_none());
    assert_eq!(contacts[0].raw_confidence, 0.6);
}

#[tokio::test]
async fn given_header_row_and_plain_prose_when_extracting_then_nothing_found() {
    let contacts = extract("Name\tRole\tEmail\tPhone\nThe crew gathers at dawn.").await;

    assert!(contacts.is_empty());
}

#[tokio::test]
async fn given_full_sheet_when_extracting_then_rows_kept_in_order() {
    let text = "Name\tRole\tEmail\tPhone\n\
                Jane Doe\tDirector\tjane@apex.com\t+1 555 010 0100\n\
                \n\
                Marco Reyes\tGaffer\tmarco@apex.com\t+1 555 010 0101\n\
                Ada Lovelace\tProducer\tada@apex.com\t+1 555 010 0102\n";

    let contacts = extract(text).await;

    assert_eq!(contacts.len(), 3);
    assert_eq!(contacts[0].name, "Jane Doe");
    assert_eq!(contacts[1].name, "Marco Reyes");
    assert_eq!(contacts[2].name, "Ada Lovelace");
}

#[tokio::test]
async fn given_overlong_digit_run_when_extracting_then_not_taken_as_phone() {
    let contacts = extract("Catering Crew\t98765432109876543210\tkitchen@apex.com").await;

    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Catering Crew");
    assert_eq!(contacts[0].email.as_deref(), Some("kitchen@apex.com"));
    assert!(contacts[0].phone.is_none());
}
