use async_trait::async_trait;

use crate::domain::{ErrorKind, MimeKind};

/// Turns an uploaded document into plain text ready for extraction.
#[async_trait]
pub trait DocumentIngest: Send + Sync {
    async fn read_text(&self, data: &[u8], mime: MimeKind) -> Result<String, IngestError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("document is empty")]
    EmptyDocument,
    #[error("corrupt file: {0}")]
    CorruptFile(String),
    #[error("text extraction timed out after {0}s")]
    ExtractionTimeout(u64),
    #[error("text extraction failed: {0}")]
    ExtractionFailed(String),
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            IngestError::EmptyDocument => ErrorKind::EmptyDocument,
            IngestError::CorruptFile(_) => ErrorKind::CorruptFile,
            IngestError::ExtractionTimeout(_) => ErrorKind::InternalError,
            IngestError::ExtractionFailed(_) => ErrorKind::InternalError,
        }
    }
}
