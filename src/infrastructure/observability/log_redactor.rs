use std::sync::LazyLock;

use regex::Regex;

const MAX_VISIBLE_LENGTH: usize = 200;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap()
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s().-]{6,}\d").unwrap());

/// Makes document-derived text safe to log: contact details are masked
/// and long payloads are truncated. Log lines must never become a copy
/// of the call sheet.
pub fn redact_contact_details(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let masked = EMAIL_RE.replace_all(trimmed, "[EMAIL]");
    let masked = PHONE_RE.replace_all(&masked, "[PHONE]");

    if masked.len() > MAX_VISIBLE_LENGTH {
        let cut = masked
            .char_indices()
            .take_while(|(i, _)| *i < MAX_VISIBLE_LENGTH)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(masked.len());
        format!("{}... ({} chars total)", &masked[..cut], masked.len())
    } else {
        masked.into_owned()
    }
}
