mod mock_strategy;
mod model_strategy;
mod pattern_strategy;

pub use mock_strategy::MockStrategy;
pub use model_strategy::{parse_model_contacts, ModelStrategy};
pub use pattern_strategy::PatternStrategy;
