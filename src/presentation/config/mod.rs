mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    CacheSettings, IngestSettings, JobSettings, LimitSettings, RoutingSettings, ServerSettings,
    Settings, StrategySettings,
};
