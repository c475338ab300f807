mod memory_job_store;

pub use memory_job_store::MemoryJobStore;
