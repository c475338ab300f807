use std::str::FromStr;

use super::Environment;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub limits: LimitSettings,
    pub routing: RoutingSettings,
    pub strategies: StrategySettings,
    pub ingest: IngestSettings,
    pub cache: CacheSettings,
    pub jobs: JobSettings,
    pub environment: Environment,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct LimitSettings {
    pub max_upload_bytes: u64,
    pub max_batch_files: usize,
}

#[derive(Debug, Clone)]
pub struct RoutingSettings {
    pub size_ceiling_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct StrategySettings {
    pub timeout_secs: u64,
    pub model_base_url: String,
    pub model_name: String,
    pub model_api_key: String,
}

#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub layout_endpoint: String,
    pub layout_api_key: String,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub capacity: usize,
    pub ttl_secs: u64,
}

#[derive(Debug, Clone)]
pub struct JobSettings {
    pub workers: usize,
    pub queue_capacity: usize,
    pub sync_wait_secs: u64,
    pub retention_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            server: ServerSettings {
                host: env_or("HOST", "0.0.0.0"),
                port: env_parse_or("SERVER_PORT", 3000),
            },
            limits: LimitSettings {
                max_upload_bytes: env_parse_or("MAX_UPLOAD_MB", 25u64) * 1024 * 1024,
                max_batch_files: env_parse_or("MAX_BATCH_FILES", 10),
            },
            routing: RoutingSettings {
                size_ceiling_bytes: env_parse_or("ROUTING_SIZE_CEILING_MB", 10u64) * 1024 * 1024,
            },
            strategies: StrategySettings {
                timeout_secs: env_parse_or("STRATEGY_TIMEOUT_SECS", 120),
                model_base_url: env_or("MODEL_BASE_URL", "http://localhost:1234"),
                model_name: env_or("MODEL_NAME", "gpt-4o-mini"),
                model_api_key: env_or("MODEL_API_KEY", ""),
            },
            ingest: IngestSettings {
                layout_endpoint: env_or("LAYOUT_ENDPOINT", "http://localhost:5080"),
                layout_api_key: env_or("LAYOUT_API_KEY", ""),
            },
            cache: CacheSettings {
                capacity: env_parse_or("CACHE_CAPACITY", 512),
                ttl_secs: env_parse_or("CACHE_TTL_SECS", 3600),
            },
            jobs: JobSettings {
                workers: env_parse_or("EXTRACTION_WORKERS", 4),
                queue_capacity: env_parse_or("QUEUE_CAPACITY", 64),
                sync_wait_secs: env_parse_or("SYNC_WAIT_SECS", 20),
                retention_secs: env_parse_or("JOB_RETENTION_SECS", 86_400),
                sweep_interval_secs: env_parse_or("SWEEP_INTERVAL_SECS", 300),
            },
            environment: std::env::var("APP_ENV")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Environment::Local),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            limits: LimitSettings {
                max_upload_bytes: 25 * 1024 * 1024,
                max_batch_files: 10,
            },
            routing: RoutingSettings {
                size_ceiling_bytes: 10 * 1024 * 1024,
            },
            strategies: StrategySettings {
                timeout_secs: 120,
                model_base_url: "http://localhost:1234".to_string(),
                model_name: "gpt-4o-mini".to_string(),
                model_api_key: String::new(),
            },
            ingest: IngestSettings {
                layout_endpoint: "http://localhost:5080".to_string(),
                layout_api_key: String::new(),
            },
            cache: CacheSettings {
                capacity: 512,
                ttl_secs: 3600,
            },
            jobs: JobSettings {
                workers: 4,
                queue_capacity: 64,
                sync_wait_secs: 20,
                retention_secs: 86_400,
                sweep_interval_secs: 300,
            },
            environment: Environment::Local,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
