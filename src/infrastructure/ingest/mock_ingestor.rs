use async_trait::async_trait;

use crate::application::ports::{DocumentIngest, IngestError};
use crate::domain::MimeKind;

enum Behavior {
    Return(String),
    FailExtraction(String),
    FailCorrupt(String),
}

/// Test stand-in for the real ingestors.
pub struct MockIngestor {
    behavior: Behavior,
}

impl MockIngestor {
    pub fn returning(text: &str) -> Self {
        Self {
            behavior: Behavior::Return(text.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            behavior: Behavior::FailExtraction(message.to_string()),
        }
    }

    pub fn corrupt(message: &str) -> Self {
        Self {
            behavior: Behavior::FailCorrupt(message.to_string()),
        }
    }
}

#[async_trait]
impl DocumentIngest for MockIngestor {
    async fn read_text(&self, _data: &[u8], _mime: MimeKind) -> Result<String, IngestError> {
        match &self.behavior {
            Behavior::Return(text) => Ok(text.clone()),
            Behavior::FailExtraction(message) => {
                Err(IngestError::ExtractionFailed(message.clone()))
            }
            Behavior::FailCorrupt(message) => Err(IngestError::CorruptFile(message.clone())),
        }
    }
}
