use unicode_normalization::UnicodeNormalization;

/// Canonical form used when comparing email addresses.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

/// Canonical form used when comparing phone numbers: digits only, with a
/// leading `+` kept for numbers written in international form.
pub(crate) fn normalize_phone(phone: &str) -> String {
    let trimmed = phone.trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if trimmed.starts_with("00") {
        let rest = digits.strip_prefix("00").unwrap_or(&digits);
        format!("+{}", rest)
    } else if trimmed.starts_with('+') {
        format!("+{}", digits)
    } else {
        digits
    }
}

/// Canonical form used when fuzzily comparing names and roles.
pub(crate) fn normalize_text(text: &str) -> String {
    text.nfkc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
