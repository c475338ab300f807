use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{ContactExtractor, ExtractorError};
use crate::domain::{DocumentProfile, ExtractionOptions, RawContact, StrategyKind};

enum Outcome {
    Contacts(Vec<RawContact>),
    Unavailable(String),
    Failed(String),
}

/// Test stand-in for an extraction strategy with scripted behavior.
/// Counts invocations so tests can assert a strategy did or did not run.
pub struct MockStrategy {
    kind: StrategyKind,
    outcome: Outcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockStrategy {
    pub fn returning(kind: StrategyKind, contacts: Vec<RawContact>) -> Self {
        Self {
            kind,
            outcome: Outcome::Contacts(contacts),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty(kind: StrategyKind) -> Self {
        Self::returning(kind, Vec::new())
    }

    pub fn unavailable(kind: StrategyKind, message: &str) -> Self {
        Self {
            kind,
            outcome: Outcome::Unavailable(message.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(kind: StrategyKind, message: &str) -> Self {
        Self {
            kind,
            outcome: Outcome::Failed(message.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn invocations(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContactExtractor for MockStrategy {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    async fn extract(
        &self,
        _text: &str,
        _profile: &DocumentProfile,
        _options: &ExtractionOptions,
    ) -> Result<Vec<RawContact>, ExtractorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Outcome::Contacts(contacts) => Ok(contacts.clone()),
            Outcome::Unavailable(message) => Err(ExtractorError::Unavailable(message.clone())),
            Outcome::Failed(message) => Err(ExtractorError::Failed(message.clone())),
        }
    }
}
