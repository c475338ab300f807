use callsheet::infrastructure::observability::redact_contact_details;

#[test]
fn given_email_in_text_when_redacted_then_masked() {
    assert_eq!(
        redact_contact_details("reach jane@apex.com today"),
        "reach [EMAIL] today"
    );
}

#[test]
fn given_phone_in_text_when_redacted_then_masked() {
    assert_eq!(
        redact_contact_details("call +1 555 010 0100 now"),
        "call [PHONE] now"
    );
}

#[test]
fn given_contact_line_when_redacted_then_no_details_leak() {
    let masked = redact_contact_details("Jane Doe jane@apex.com +1 555 010 0100");

    assert_eq!(masked, "Jane Doe [EMAIL] [PHONE]");
    assert!(!masked.contains('@'));
}

#[test]
fn given_long_payload_when_redacted_then_truncated_with_length() {
    let masked = redact_contact_details(&"a".repeat(500));

    assert!(masked.starts_with(&"a".repeat(200)));
    assert!(masked.ends_with("(500 chars total)"));
}

#[test]
fn given_blank_text_when_redacted_then_placeholder() {
    assert_eq!(redact_contact_details("   "), "[EMPTY]");
}
