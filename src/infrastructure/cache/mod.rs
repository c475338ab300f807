mod memory_result_cache;
mod mock_result_cache;

pub use memory_result_cache::MemoryResultCache;
pub use mock_result_cache::BrokenResultCache;
