//! Application configuration structures
//!
//! Plain data; loading lives in the infra crate (`fieldmachine-infra`).

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PROFILE_CACHE_CAPACITY, DEFAULT_PROFILE_CACHE_TTL_SECS};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path
    pub path: String,
    /// Connection pool size
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "fieldmachine.db".into(), pool_size: 8 }
    }
}

/// Profile view cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for cached profile views, in seconds
    pub ttl_seconds: u64,
    /// Maximum number of cached profile views
    pub capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_PROFILE_CACHE_TTL_SECS,
            capacity: DEFAULT_PROFILE_CACHE_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.database.pool_size, 8);
        assert_eq!(config.cache.ttl_seconds, 300);
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.database.path, config.database.path);
        assert_eq!(parsed.cache.capacity, config.cache.capacity);
    }
}
