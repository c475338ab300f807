use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::application::ports::{ContactExtractor, ExtractorError};
use crate::domain::{DocumentProfile, ExtractionOptions, RawContact, StrategyKind};

const TABLE_ROW_CONFIDENCE: f32 = 0.85;
const LABELED_CONFIDENCE: f32 = 0.8;
const LOOSE_CONFIDENCE: f32 = 0.6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap()
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\(?\d[\d\s().-]{5,18}\d").unwrap());

static NAME_CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][\p{L}'.-]+(?:\s+[A-Z][\p{L}'.-]+){1,3}$").unwrap()
});

static NAME_IN_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Z][\p{L}'.-]+(?:\s+[A-Z][\p{L}'.-]+){1,3}").unwrap()
});

static LABELED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<label>[A-Za-z][A-Za-z0-9 /&'.-]{1,39}):\s*(?P<rest>.+)$").unwrap()
});

static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

static COMPANY_PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]{2,60})\)").unwrap());

/// Words that mark a cell or label as a production role.
const ROLE_KEYWORDS: [&str; 29] = [
    "director", "producer", "manager", "coordinator", "supervisor", "assistant", "gaffer",
    "grip", "electric", "dp", "dop", "cinematographer", "editor", "sound", "mixer", "makeup",
    "wardrobe", "stylist", "writer", "showrunner", "pa", "ad", "stunts", "location", "casting",
    "vfx", "colorist", "composer", "publicist",
];

/// Deterministic extraction over line structure: delimited table rows,
/// `Role: Name ...` lines, and loose lines that pair a name with a way
/// to reach them.
pub struct PatternStrategy;

impl PatternStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PatternStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactExtractor for PatternStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Pattern
    }

    async fn extract(
        &self,
        text: &str,
        _profile: &DocumentProfile,
        _options: &ExtractionOptions,
    ) -> Result<Vec<RawContact>, ExtractorError> {
        Ok(extract_contacts(text))
    }
}

fn extract_contacts(text: &str) -> Vec<RawContact> {
    let mut contacts = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(contact) = parse_table_row(line) {
            contacts.push(contact);
        } else if let Some(contact) = parse_labeled_line(line) {
            contacts.push(contact);
        } else if let Some(contact) = parse_loose_line(line) {
            contacts.push(contact);
        }
    }
    contacts
}

fn parse_table_row(line: &str) -> Option<RawContact> {
    let cells = split_cells(line);
    if cells.len() < 3 {
        return None;
    }

    let mut name = None;
    let mut role = None;
    let mut email = None;
    let mut phone = None;
    let mut leftovers = Vec::new();

    for cell in &cells {
        if email.is_none() && EMAIL_RE.is_match(cell) {
            email = EMAIL_RE.find(cell).map(|m| m.as_str().to_string());
        } else if phone.is_none() && find_phone(cell).is_some() {
            phone = find_phone(cell);
        } else if role.is_none() && looks_like_role(cell) {
            role = Some(cell.clone());
        } else if name.is_none() && NAME_CELL_RE.is_match(cell) {
            name = Some(cell.clone());
        } else {
            leftovers.push(cell.clone());
        }
    }

    let name = name?;
    let mut contact = RawContact::new(name, StrategyKind::Pattern, TABLE_ROW_CONFIDENCE);
    if let Some(role) = role {
        contact = contact.with_role(role);
    }
    if let Some(email) = email {
        contact = contact.with_email(email);
    }
    if let Some(phone) = phone {
        contact = contact.with_phone(phone);
    }
    if let Some(company) = leftovers.into_iter().find(|cell| is_wordy(cell)) {
        contact = contact.with_company(company);
    }
    Some(contact)
}

fn parse_labeled_line(line: &str) -> Option<RawContact> {
    let captures = LABELED_RE.captures(line)?;
    let label = captures.name("label")?.as_str().trim();
    let rest = captures.name("rest")?.as_str();

    if !looks_like_role(label) {
        return None;
    }

    let email = EMAIL_RE.find(rest).map(|m| m.as_str().to_string());
    let phone = find_phone(rest);
    let company = COMPANY_PAREN_RE
        .captures(rest)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());

    let scrubbed = scrub(rest, email.as_deref(), phone.as_deref());
    let name = NAME_IN_TEXT_RE.find(&scrubbed)?.as_str().to_string();

    let mut contact = RawContact::new(name, StrategyKind::Pattern, LABELED_CONFIDENCE)
        .with_role(label.to_string());
    if let Some(email) = email {
        contact = contact.with_email(email);
    }
    if let Some(phone) = phone {
        contact = contact.with_phone(phone);
    }
    if let Some(company) = company {
        contact = contact.with_company(company);
    }
    Some(contact)
}

fn parse_loose_line(line: &str) -> Option<RawContact> {
    let email = EMAIL_RE.find(line).map(|m| m.as_str().to_string());
    let phone = find_phone(line);
    if email.is_none() && phone.is_none() {
        return None;
    }

    let scrubbed = scrub(line, email.as_deref(), phone.as_deref());
    let name = NAME_IN_TEXT_RE.find(&scrubbed)?.as_str().to_string();

    let mut contact = RawContact::new(name, StrategyKind::Pattern, LOOSE_CONFIDENCE);
    if let Some(email) = email {
        contact = contact.with_email(email);
    }
    if let Some(phone) = phone {
        contact = contact.with_phone(phone);
    }
    Some(contact)
}

fn split_cells(line: &str) -> Vec<String> {
    let raw: Vec<&str> = if line.contains('\t') {
        line.split('\t').collect()
    } else if line.contains('|') {
        line.split('|').collect()
    } else {
        MULTI_SPACE_RE.split(line).collect()
    };

    raw.iter()
        .map(|cell| cell.trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect()
}

fn looks_like_role(cell: &str) -> bool {
    let lowered = cell.to_lowercase();
    ROLE_KEYWORDS
        .iter()
        .any(|keyword| lowered.split_whitespace().any(|word| word == *keyword))
}

fn find_phone(text: &str) -> Option<String> {
    for m in PHONE_RE.find_iter(text) {
        let digits = m.as_str().chars().filter(|c| c.is_ascii_digit()).count();
        if (7..=15).contains(&digits) {
            return Some(m.as_str().trim().to_string());
        }
    }
    None
}

fn is_wordy(cell: &str) -> bool {
    cell.chars().filter(|c| c.is_alphabetic()).count() >= 3
}

fn scrub(text: &str, email: Option<&str>, phone: Option<&str>) -> String {
    let mut out = text.to_string();
    if let Some(email) = email {
        out = out.replace(email, " ");
    }
    if let Some(phone) = phone {
        out = out.replace(phone, " ");
    }
    out = COMPANY_PAREN_RE.replace_all(&out, " ").into_owned();
    out
}
