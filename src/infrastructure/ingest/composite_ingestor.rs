use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{DocumentIngest, IngestError};
use crate::domain::MimeKind;

use super::text_sanitizer::sanitize_extracted_text;

/// Routes ingestion by media type and sanitizes whatever the chosen
/// adapter produced, so every strategy sees the same text hygiene.
pub struct CompositeIngestor {
    adapters: HashMap<MimeKind, Arc<dyn DocumentIngest>>,
}

impl CompositeIngestor {
    pub fn new(adapters: Vec<(MimeKind, Arc<dyn DocumentIngest>)>) -> Self {
        Self {
            adapters: adapters.into_iter().collect(),
        }
    }
}

#[async_trait]
impl DocumentIngest for CompositeIngestor {
    async fn read_text(&self, data: &[u8], mime: MimeKind) -> Result<String, IngestError> {
        let adapter = self
            .adapters
            .get(&mime)
            .ok_or_else(|| IngestError::UnsupportedFormat(mime.as_mime().to_string()))?;

        let raw = adapter.read_text(data, mime).await?;
        Ok(sanitize_extracted_text(&raw))
    }
}
