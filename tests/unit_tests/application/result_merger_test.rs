use callsheet::application::services::ResultMerger;
use callsheet::domain::{Candidate, RawContact, StrategyKind};

fn candidates(raws: Vec<RawContact>) -> Vec<Candidate> {
    raws.into_iter().map(Candidate::from_raw).collect()
}

#[test]
fn given_same_email_with_spelling_differences_when_merging_then_one_candidate_survives() {
    let merger = ResultMerger::new();
    let input = candidates(vec![
        RawContact::new("Jane Doe", StrategyKind::Pattern, 0.85)
            .with_email("Jane.Doe@Prod.COM")
            .with_phone("+1 (555) 010-0100")
            .with_company("Apex Films"),
        RawContact::new("J. Doe", StrategyKind::Model, 0.7)
            .with_email(" jane.doe@prod.com")
            .with_role("Director"),
    ]);

    let merged = merger.merge(input);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].name, "Jane Doe");
    assert_eq!(merged[0].role.as_deref(), Some("Director"));
    assert!(merged[0].phone.is_some());
    assert_eq!(merged[0].raw_confidence, 0.85);
    assert!(merged[0].multi_source());
}

#[test]
fn given_equally_complete_duplicates_when_merging_then_model_fields_preferred() {
    let merger = ResultMerger::new();
    let input = candidates(vec![
        RawContact::new("Jane Doe", StrategyKind::Pattern, 0.9).with_email("jane@apex.com"),
        RawContact::new("Jane M. Doe", StrategyKind::Model, 0.7).with_email("jane@apex.com"),
    ]);

    let merged = merger.merge(input);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].name, "Jane M. Doe");
    assert_eq!(merged[0].raw_confidence, 0.9);
    assert!(merged[0].multi_source());
}

#[test]
fn given_same_name_with_different_emails_when_merging_then_both_kept() {
    let merger = ResultMerger::new();
    let input = candidates(vec![
        RawContact::new("Alex Gray", StrategyKind::Pattern, 0.85).with_email("alex@apex.com"),
        RawContact::new("Alex Gray", StrategyKind::Model, 0.7).with_email("gray@umbrella.tv"),
    ]);

    let merged = merger.merge(input);

    assert_eq!(merged.len(), 2);
}

#[test]
fn given_name_only_duplicates_when_merging_then_case_and_spacing_ignored() {
    let merger = ResultMerger::new();
    let input = candidates(vec![
        RawContact::new("Jane   Doe", StrategyKind::Pattern, 0.9),
        RawContact::new("jane doe", StrategyKind::Model, 0.5),
    ]);

    let merged = merger.merge(input);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].name, "jane doe");
    assert_eq!(merged[0].raw_confidence, 0.9);
}

#[test]
fn given_equivalent_phone_formats_when_merging_then_collapsed() {
    let merger = ResultMerger::new();
    let input = candidates(vec![
        RawContact::new("Sam Hill", StrategyKind::Pattern, 0.85).with_phone("001 555 010 0177"),
        RawContact::new("Sam Hill", StrategyKind::Model, 0.7).with_phone("+1 (555) 010-0177"),
    ]);

    let merged = merger.merge(input);

    assert_eq!(merged.len(), 1);
}

#[test]
fn given_overlapping_partial_records_when_merging_then_fields_union_toward_most_complete() {
    let merger = ResultMerger::new();
    let input = candidates(vec![
        RawContact::new("Jane Doe", StrategyKind::Pattern, 0.6).with_email("jane@apex.com"),
        RawContact::new("Jane Doe", StrategyKind::Model, 0.9)
            .with_email("jane@apex.com")
            .with_phone("+1 555 010 0100")
            .with_role("Director")
            .with_company("Apex Films"),
    ]);

    let merged = merger.merge(input);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].email.as_deref(), Some("jane@apex.com"));
    assert_eq!(merged[0].phone.as_deref(), Some("+1 555 010 0100"));
    assert_eq!(merged[0].role.as_deref(), Some("Director"));
    assert_eq!(merged[0].company.as_deref(), Some("Apex Films"));
    assert_eq!(merged[0].raw_confidence, 0.9);
    assert_eq!(merged[0].merged_from.len(), 2);
}

#[test]
fn given_already_merged_set_when_merged_again_then_output_unchanged() {
    let merger = ResultMerger::new();
    let input = candidates(vec![
        RawContact::new("Jane Doe", StrategyKind::Pattern, 0.85).with_email("jane@apex.com"),
        RawContact::new("Jane Doe", StrategyKind::Model, 0.7).with_email("jane@apex.com"),
        RawContact::new("Bob Stone", StrategyKind::Pattern, 0.85).with_email("bob@apex.com"),
    ]);

    let merged = merger.merge(input);
    let merged_again = merger.merge(merged.clone());

    assert_eq!(merged.len(), 2);
    assert_eq!(merged_again, merged);
}

#[test]
fn given_fewer_than_two_candidates_when_merging_then_passthrough() {
    let merger = ResultMerger::new();
    let single = candidates(vec![RawContact::new(
        "Jane Doe",
        StrategyKind::Pattern,
        0.85,
    )]);

    assert!(merger.merge(Vec::new()).is_empty());
    assert_eq!(merger.merge(single.clone()), single);
}
