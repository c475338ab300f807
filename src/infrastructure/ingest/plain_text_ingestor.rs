use async_trait::async_trait;

use crate::application::ports::{DocumentIngest, IngestError};
use crate::domain::MimeKind;

pub struct PlainTextIngestor;

#[async_trait]
impl DocumentIngest for PlainTextIngestor {
    async fn read_text(&self, data: &[u8], mime: MimeKind) -> Result<String, IngestError> {
        if mime != MimeKind::Text {
            return Err(IngestError::UnsupportedFormat(mime.as_mime().to_string()));
        }

        if data.is_empty() {
            return Err(IngestError::EmptyDocument);
        }

        String::from_utf8(data.to_vec())
            .map_err(|e| IngestError::CorruptFile(format!("invalid utf-8: {e}")))
    }
}
