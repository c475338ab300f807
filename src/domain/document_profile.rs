use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    CallSheet,
    CrewList,
    ContactList,
    Unknown,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::CallSheet => "call_sheet",
            DocumentType::CrewList => "crew_list",
            DocumentType::ContactList => "contact_list",
            DocumentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionCategory {
    Film,
    Television,
    Commercial,
    Music,
    Unknown,
}

impl ProductionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionCategory::Film => "film",
            ProductionCategory::Television => "television",
            ProductionCategory::Commercial => "commercial",
            ProductionCategory::Music => "music",
            ProductionCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProductionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cheap structural analysis of a document, computed before any
/// extraction strategy runs. Drives routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentProfile {
    pub document_type: DocumentType,
    pub production_category: ProductionCategory,
    pub has_table_structure: bool,
    pub estimated_contact_count: u32,
    pub structural_confidence: f32,
}

impl DocumentProfile {
    /// Profile used when analysis cannot say anything about the document.
    pub fn unknown() -> Self {
        Self {
            document_type: DocumentType::Unknown,
            production_category: ProductionCategory::Unknown,
            has_table_structure: false,
            estimated_contact_count: 0,
            structural_confidence: 0.0,
        }
    }
}
