use crate::application::services::normalize::normalize_phone;
use crate::domain::{Candidate, DocumentProfile};

const EMAIL_POINTS: u8 = 30;
const NAME_POINTS: u8 = 25;
const PHONE_POINTS: u8 = 20;
const ROLE_POINTS: u8 = 15;
const COMPANY_POINTS: u8 = 10;

/// Extra credit for role and company read out of a document with real
/// table structure, where those cells are labeled rather than guessed.
const TABLE_FIELD_BONUS: u8 = 5;

const QUALITY_WEIGHT: f32 = 0.6;
const RAW_WEIGHT: f32 = 0.4;

/// Candidates corroborated by more than one strategy get this bonus and
/// never land below the floor.
const MULTI_SOURCE_BONUS: f32 = 0.1;
const MULTI_SOURCE_FLOOR: f32 = 0.75;

/// Below this quality a candidate is flagged, not dropped. Reviewers
/// decide what to do with weak rows.
const LOW_QUALITY_THRESHOLD: u8 = 40;

/// Roles too vague to say anything about who the contact is.
const GENERIC_ROLES: [&str; 6] = ["crew", "staff", "team", "other", "n/a", "tbd"];

/// Assigns field-quality and final confidence to merged candidates, and
/// orders them best first.
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(
        &self,
        mut candidates: Vec<Candidate>,
        profile: &DocumentProfile,
    ) -> Vec<Candidate> {
        for candidate in &mut candidates {
            let quality = quality_score(candidate, profile);
            let mut final_confidence = (QUALITY_WEIGHT * (quality as f32 / 100.0)
                + RAW_WEIGHT * candidate.raw_confidence)
                .clamp(0.0, 1.0);

            if candidate.multi_source() {
                final_confidence = (final_confidence + MULTI_SOURCE_BONUS)
                    .min(1.0)
                    .max(MULTI_SOURCE_FLOOR);
            }

            candidate.quality_score = quality;
            candidate.final_confidence = final_confidence;
            candidate.low_confidence = quality < LOW_QUALITY_THRESHOLD;
        }

        candidates.sort_by(|a, b| b.final_confidence.total_cmp(&a.final_confidence));
        candidates
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new()
    }
}

fn quality_score(candidate: &Candidate, profile: &DocumentProfile) -> u8 {
    let table_bonus = if profile.has_table_structure {
        TABLE_FIELD_BONUS
    } else {
        0
    };

    let mut score = 0u8;
    if candidate.email.is_some() {
        score += EMAIL_POINTS;
    }
    if plausible_name(&candidate.name) {
        score += NAME_POINTS;
    }
    if candidate
        .phone
        .as_deref()
        .map(plausible_phone)
        .unwrap_or(false)
    {
        score += PHONE_POINTS;
    }
    if candidate
        .role
        .as_deref()
        .map(informative_role)
        .unwrap_or(false)
    {
        score += ROLE_POINTS + table_bonus;
    }
    if candidate.company.is_some() {
        score += COMPANY_POINTS + table_bonus;
    }
    score.min(100)
}

fn plausible_name(name: &str) -> bool {
    if name.contains('@') {
        return false;
    }
    let words: Vec<&str> = name.split_whitespace().collect();
    words.len() >= 2
        && words
            .iter()
            .all(|word| word.chars().next().map(char::is_alphabetic).unwrap_or(false))
}

fn plausible_phone(phone: &str) -> bool {
    let digits = normalize_phone(phone);
    let count = digits.trim_start_matches('+').len();
    (7..=15).contains(&count)
}

fn informative_role(role: &str) -> bool {
    let lowered = role.trim().to_lowercase();
    !lowered.is_empty() && !GENERIC_ROLES.contains(&lowered.as_str())
}
