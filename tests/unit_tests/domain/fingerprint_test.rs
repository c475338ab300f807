use callsheet::domain::{ExtractionOptions, Fingerprint, JobPriority, MimeKind, StrategyKind};

const TEST_DOC: &[u8] = b"CALL SHEET\nJane Doe\tDirector\tjane@apex.com\n";

#[test]
fn given_identical_inputs_when_fingerprinted_then_keys_match() {
    let a = Fingerprint::compute(TEST_DOC, MimeKind::Text, &ExtractionOptions::default());
    let b = Fingerprint::compute(TEST_DOC, MimeKind::Text, &ExtractionOptions::default());

    assert_eq!(a, b);
}

#[test]
fn given_different_bytes_when_fingerprinted_then_keys_differ() {
    let a = Fingerprint::compute(TEST_DOC, MimeKind::Text, &ExtractionOptions::default());
    let b = Fingerprint::compute(
        b"CALL SHEET\nAda Lovelace\tProducer\tada@apex.com\n",
        MimeKind::Text,
        &ExtractionOptions::default(),
    );

    assert_ne!(a, b);
}

#[test]
fn given_different_media_types_when_fingerprinted_then_keys_differ() {
    let a = Fingerprint::compute(TEST_DOC, MimeKind::Text, &ExtractionOptions::default());
    let b = Fingerprint::compute(TEST_DOC, MimeKind::Pdf, &ExtractionOptions::default());

    assert_ne!(a, b);
}

#[test]
fn given_forced_strategy_when_fingerprinted_then_key_differs_from_auto() {
    let auto = Fingerprint::compute(TEST_DOC, MimeKind::Text, &ExtractionOptions::default());
    let forced = Fingerprint::compute(
        TEST_DOC,
        MimeKind::Text,
        &ExtractionOptions::new(Some(StrategyKind::Model), JobPriority::Normal),
    );

    assert_ne!(auto, forced);
}

#[test]
fn given_different_priorities_when_fingerprinted_then_keys_match() {
    let normal = Fingerprint::compute(
        TEST_DOC,
        MimeKind::Text,
        &ExtractionOptions::new(None, JobPriority::Normal),
    );
    let high = Fingerprint::compute(
        TEST_DOC,
        MimeKind::Text,
        &ExtractionOptions::new(None, JobPriority::High),
    );

    assert_eq!(normal, high);
}

#[test]
fn given_any_input_when_fingerprinted_then_key_is_hex_sha256() {
    let fingerprint = Fingerprint::compute(TEST_DOC, MimeKind::Text, &ExtractionOptions::default());

    assert_eq!(fingerprint.as_str().len(), 64);
    assert!(fingerprint.as_str().chars().all(|c| c.is_ascii_hexdigit()));
}
