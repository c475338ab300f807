use callsheet::application::services::DocumentProfiler;
use callsheet::domain::{DocumentProfile, DocumentType, MimeKind, ProductionCategory};

const CALL_SHEET_TEXT: &str = "CALL SHEET - Sunrise Feature Film\nShoot Day 4\n\nName\tRole\tEmail\tPhone\nJane Doe\tDirector\tjane@sunrise.film\t+1 555 010 0100\nJohn Smith\tGaffer\tjohn@sunrise.film\t+1 555 010 0101\nAda Lovelace\tProducer\tada@sunrise.film\t+1 555 010 0102\n";

#[test]
fn given_tabular_call_sheet_when_profiled_then_high_confidence_profile() {
    let profiler = DocumentProfiler::new();

    let profile = profiler.profile(CALL_SHEET_TEXT.as_bytes(), MimeKind::Text);

    assert_eq!(profile.document_type, DocumentType::CallSheet);
    assert_eq!(profile.production_category, ProductionCategory::Film);
    assert!(profile.has_table_structure);
    assert_eq!(profile.estimated_contact_count, 3);
    assert!(profile.structural_confidence >= 0.7);
}

#[test]
fn given_episodic_crew_list_when_profiled_then_television_category() {
    let profiler = DocumentProfiler::new();
    let text = "CREW LIST\nEpisode 3, Season 2\nShowrunner: Maya Chen\n";

    let profile = profiler.profile(text.as_bytes(), MimeKind::Text);

    assert_eq!(profile.document_type, DocumentType::CrewList);
    assert_eq!(profile.production_category, ProductionCategory::Television);
}

#[test]
fn given_plain_prose_when_profiled_then_unknown_with_low_confidence() {
    let profiler = DocumentProfiler::new();
    let text = "Dear team, the schedule for next week has moved. We will regroup on \
                Monday morning and walk the stage together before lunch.";

    let profile = profiler.profile(text.as_bytes(), MimeKind::Text);

    assert_eq!(profile.document_type, DocumentType::Unknown);
    assert_eq!(profile.production_category, ProductionCategory::Unknown);
    assert!(!profile.has_table_structure);
    assert!(profile.structural_confidence < 0.3);
}

#[test]
fn given_empty_document_when_profiled_then_unknown_profile() {
    let profiler = DocumentProfiler::new();

    assert_eq!(
        profiler.profile(b"", MimeKind::Text),
        DocumentProfile::unknown()
    );
    assert_eq!(
        profiler.profile(b"  \n\t ", MimeKind::Text),
        DocumentProfile::unknown()
    );
}

#[test]
fn given_compressed_binary_when_profiled_then_confidence_stays_low() {
    let profiler = DocumentProfiler::new();
    let mut data = b"%PDF-1.7\n".to_vec();
    data.extend([0xde, 0xad, 0xbe, 0xef].repeat(64));

    let profile = profiler.profile(&data, MimeKind::Pdf);

    assert_eq!(profile.document_type, DocumentType::Unknown);
    assert!(profile.structural_confidence < 0.3);
}

#[test]
fn given_more_phones_than_emails_when_profiled_then_larger_signal_wins() {
    let profiler = DocumentProfiler::new();
    let text = "Anna Reyes 555-010-0100\nBen Ortiz 555-010-0101\nCara Singh 555-010-0102\nDan Wells 555-010-0103\nanna@apex.com ben@apex.com\n";

    let profile = profiler.profile(text.as_bytes(), MimeKind::Text);

    assert_eq!(profile.estimated_contact_count, 4);
}
