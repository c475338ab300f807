mod batch;
mod cache_admin;
mod cancel;
mod extract;
mod health;
mod job_status;

pub use batch::batch_extract_handler;
pub use cache_admin::clear_cache_handler;
pub use cancel::cancel_job_handler;
pub use extract::extract_handler;
pub use health::health_handler;
pub use job_status::job_status_handler;
