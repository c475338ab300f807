mod composite_ingestor;
mod mock_ingestor;
mod plain_text_ingestor;
mod remote_doc_ingestor;
mod text_sanitizer;

pub use composite_ingestor::CompositeIngestor;
pub use mock_ingestor::MockIngestor;
pub use plain_text_ingestor::PlainTextIngestor;
pub use remote_doc_ingestor::RemoteDocIngestor;
pub use text_sanitizer::sanitize_extracted_text;
