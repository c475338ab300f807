use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{DocumentProfile, DocumentType, MimeKind, ProductionCategory};

/// How much of a binary document is scanned for structural signals.
const PROFILE_SCAN_CAP: usize = 256 * 1024;

/// Share of non-empty lines that must look columnar before the document
/// counts as tabular.
const TABLE_LINE_RATIO: f32 = 0.25;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\d[\d\s().-]{6,}\d").expect("phone regex")
});

const CALL_SHEET_MARKERS: [&str; 3] = ["call sheet", "callsheet", "call time"];
const CREW_LIST_MARKERS: [&str; 2] = ["crew list", "crew contact"];
const CONTACT_LIST_MARKERS: [&str; 2] = ["contact list", "contact sheet"];

const FILM_MARKERS: [&str; 3] = ["feature film", "production office", "shoot day"];
const TV_MARKERS: [&str; 4] = ["episode", "season", "showrunner", "network"];
const COMMERCIAL_MARKERS: [&str; 3] = ["agency", "client", "brand"];
const MUSIC_MARKERS: [&str; 3] = ["artist", "label", "music video"];

/// Cheap, strategy-free structural analysis. Works on the raw upload so
/// it can run before any text extraction, which keeps routing fast even
/// for documents the ingestors would take seconds on.
pub struct DocumentProfiler;

impl DocumentProfiler {
    pub fn new() -> Self {
        Self
    }

    pub fn profile(&self, data: &[u8], mime: MimeKind) -> DocumentProfile {
        let text = match mime {
            MimeKind::Text => String::from_utf8_lossy(data).into_owned(),
            _ => printable_runs(data, PROFILE_SCAN_CAP),
        };

        if text.trim().is_empty() {
            return DocumentProfile::unknown();
        }

        let lowered = text.to_lowercase();
        let document_type = classify_document_type(&lowered);
        let production_category = classify_production_category(&lowered);
        let has_table_structure = looks_tabular(&text);
        let estimated_contact_count = estimate_contact_count(&text);

        let mut confidence = 0.0f32;
        if document_type != DocumentType::Unknown {
            confidence += 0.4;
        }
        if production_category != ProductionCategory::Unknown {
            confidence += 0.2;
        }
        if has_table_structure {
            confidence += 0.2;
        }
        if estimated_contact_count >= 3 {
            confidence += 0.2;
        }

        let profile = DocumentProfile {
            document_type,
            production_category,
            has_table_structure,
            estimated_contact_count,
            structural_confidence: confidence.min(1.0),
        };

        tracing::debug!(
            document_type = %profile.document_type,
            production_category = %profile.production_category,
            tabular = profile.has_table_structure,
            estimated_contacts = profile.estimated_contact_count,
            structural_confidence = profile.structural_confidence,
            "Document profiled"
        );

        profile
    }
}

impl Default for DocumentProfiler {
    fn default() -> Self {
        Self::new()
    }
}

fn classify_document_type(lowered: &str) -> DocumentType {
    if contains_any(lowered, &CALL_SHEET_MARKERS) {
        DocumentType::CallSheet
    } else if contains_any(lowered, &CREW_LIST_MARKERS) {
        DocumentType::CrewList
    } else if contains_any(lowered, &CONTACT_LIST_MARKERS) {
        DocumentType::ContactList
    } else {
        DocumentType::Unknown
    }
}

fn classify_production_category(lowered: &str) -> ProductionCategory {
    let scores = [
        (ProductionCategory::Film, marker_hits(lowered, &FILM_MARKERS)),
        (ProductionCategory::Television, marker_hits(lowered, &TV_MARKERS)),
        (
            ProductionCategory::Commercial,
            marker_hits(lowered, &COMMERCIAL_MARKERS),
        ),
        (ProductionCategory::Music, marker_hits(lowered, &MUSIC_MARKERS)),
    ];

    scores
        .into_iter()
        .filter(|(_, hits)| *hits > 0)
        .max_by_key(|(_, hits)| *hits)
        .map(|(category, _)| category)
        .unwrap_or(ProductionCategory::Unknown)
}

fn contains_any(haystack: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| haystack.contains(marker))
}

fn marker_hits(haystack: &str, markers: &[&str]) -> usize {
    markers
        .iter()
        .filter(|marker| haystack.contains(*marker))
        .count()
}

fn looks_tabular(text: &str) -> bool {
    let mut non_empty = 0usize;
    let mut columnar = 0usize;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        non_empty += 1;
        if line.matches('\t').count() >= 2
            || line.matches('|').count() >= 2
            || line.split("  ").filter(|cell| !cell.trim().is_empty()).count() >= 3
        {
            columnar += 1;
        }
    }
    non_empty > 0 && (columnar as f32 / non_empty as f32) >= TABLE_LINE_RATIO
}

fn estimate_contact_count(text: &str) -> u32 {
    let emails = EMAIL_RE.find_iter(text).count();
    let phones = PHONE_RE.find_iter(text).count();
    emails.max(phones) as u32
}

/// Pulls printable ASCII runs out of binary formats so the keyword and
/// density heuristics have something to look at. Compressed streams
/// yield little, which correctly leaves confidence low.
fn printable_runs(data: &[u8], cap: usize) -> String {
    let mut out = String::new();
    let mut run = String::new();
    for &byte in data.iter().take(cap) {
        match byte {
            b'\n' | b'\r' => {
                flush_run(&mut out, &mut run);
                out.push('\n');
            }
            b'\t' | b' ' => run.push(byte as char),
            byte if byte.is_ascii_graphic() => run.push(byte as char),
            _ => flush_run(&mut out, &mut run),
        }
    }
    flush_run(&mut out, &mut run);
    out
}

fn flush_run(out: &mut String, run: &mut String) {
    if run.trim().len() >= 4 {
        out.push_str(run);
        out.push('\n');
    }
    run.clear();
}
