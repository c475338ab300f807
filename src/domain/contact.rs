use serde::{Deserialize, Serialize};

use crate::domain::strategy::StrategyKind;

/// A contact as produced by a single extraction strategy, before merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawContact {
    pub name: String,
    pub role: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: StrategyKind,
    pub raw_confidence: f32,
}

impl RawContact {
    pub fn new(name: impl Into<String>, source: StrategyKind, raw_confidence: f32) -> Self {
        Self {
            name: name.into(),
            role: None,
            company: None,
            email: None,
            phone: None,
            source,
            raw_confidence,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// A merged, scored contact candidate as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub role: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub merged_from: Vec<StrategyKind>,
    pub raw_confidence: f32,
    pub final_confidence: f32,
    pub quality_score: u8,
    pub low_confidence: bool,
}

impl Candidate {
    pub fn from_raw(raw: RawContact) -> Self {
        Self {
            name: raw.name,
            role: raw.role,
            company: raw.company,
            email: raw.email,
            phone: raw.phone,
            merged_from: vec![raw.source],
            raw_confidence: raw.raw_confidence,
            final_confidence: 0.0,
            quality_score: 0,
            low_confidence: false,
        }
    }

    pub fn multi_source(&self) -> bool {
        let mut seen = self.merged_from.clone();
        seen.sort_by_key(|kind| kind.as_str());
        seen.dedup();
        seen.len() > 1
    }

    /// Number of populated fields, the name included.
    pub fn completeness(&self) -> usize {
        1 + [
            self.role.is_some(),
            self.company.is_some(),
            self.email.is_some(),
            self.phone.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}
