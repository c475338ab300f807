use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::strategy::StrategyKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPriority {
    #[default]
    Normal,
    High,
}

impl JobPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPriority::Normal => "normal",
            JobPriority::High => "high",
        }
    }
}

impl fmt::Display for JobPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-request knobs accepted alongside an upload.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractionOptions {
    pub force_strategy: Option<StrategyKind>,
    pub priority: JobPriority,
}

impl ExtractionOptions {
    pub fn new(force_strategy: Option<StrategyKind>, priority: JobPriority) -> Self {
        Self {
            force_strategy,
            priority,
        }
    }

    /// The options portion of the cache key. Priority changes scheduling,
    /// not results, and is excluded.
    pub fn cache_key_fragment(&self) -> String {
        match self.force_strategy {
            Some(kind) => format!("force={}", kind.as_str()),
            None => "force=auto".to_string(),
        }
    }
}
