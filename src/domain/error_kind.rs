use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, machine-readable failure classification reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    UnsupportedFormat,
    FileTooLarge,
    EmptyDocument,
    CorruptFile,
    NoCandidatesFound,
    StrategyTimeout,
    StrategyUnavailable,
    RoutingDecisionFailed,
    CacheUnavailable,
    JobCancelled,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorKind::FileTooLarge => "FILE_TOO_LARGE",
            ErrorKind::EmptyDocument => "EMPTY_DOCUMENT",
            ErrorKind::CorruptFile => "CORRUPT_FILE",
            ErrorKind::NoCandidatesFound => "NO_CANDIDATES_FOUND",
            ErrorKind::StrategyTimeout => "STRATEGY_TIMEOUT",
            ErrorKind::StrategyUnavailable => "STRATEGY_UNAVAILABLE",
            ErrorKind::RoutingDecisionFailed => "ROUTING_DECISION_FAILED",
            ErrorKind::CacheUnavailable => "CACHE_UNAVAILABLE",
            ErrorKind::JobCancelled => "JOB_CANCELLED",
            ErrorKind::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified extraction failure carried on failed jobs and batch items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub kind: ErrorKind,
    pub reason: String,
}

impl ExtractionFailure {
    pub fn new(kind: ErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.reason)
    }
}
