mod init_tracing;
mod log_redactor;
mod request_id;
mod tracing_config;

pub use init_tracing::init_tracing;
pub use log_redactor::redact_contact_details;
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use tracing_config::TracingConfig;
