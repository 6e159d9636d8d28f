//! Configuration loading
//!
//! Resolution order: defaults, then the first config file found in the
//! working directory, then `FIELDMACHINE_*` environment variables. A `.env`
//! file is honoured if present.

use std::env;
use std::path::Path;

use fieldmachine_domain::{Config, FieldMachineError, Result};
use tracing::{debug, info};

const CONFIG_CANDIDATES: &[&str] =
    &["config.toml", "config.json", "fieldmachine.toml", "fieldmachine.json"];

/// Load configuration from the current working directory and environment.
pub fn load() -> Result<Config> {
    // Missing .env is not an error
    let _ = dotenvy::dotenv();

    let mut config = Config::default();
    for candidate in CONFIG_CANDIDATES {
        let path = Path::new(candidate);
        if path.exists() {
            info!(path = %path.display(), "loading configuration file");
            config = load_file(path)?;
            break;
        }
    }

    apply_env_overrides(&mut config)?;
    debug!(
        db_path = %config.database.path,
        pool_size = config.database.pool_size,
        cache_ttl_seconds = config.cache.ttl_seconds,
        "configuration resolved"
    );
    Ok(config)
}

/// Parse a single configuration file by extension.
pub fn load_file(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| FieldMachineError::Config(format!("read {}: {e}", path.display())))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&contents)
            .map_err(|e| FieldMachineError::Config(format!("parse {}: {e}", path.display()))),
        Some("json") => serde_json::from_str(&contents)
            .map_err(|e| FieldMachineError::Config(format!("parse {}: {e}", path.display()))),
        _ => Err(FieldMachineError::Config(format!(
            "unsupported config format: {}",
            path.display()
        ))),
    }
}

fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(path) = env::var("FIELDMACHINE_DB_PATH") {
        config.database.path = path;
    }
    if let Some(pool_size) = parse_env("FIELDMACHINE_DB_POOL_SIZE")? {
        config.database.pool_size = pool_size;
    }
    if let Some(ttl) = parse_env("FIELDMACHINE_CACHE_TTL_SECS")? {
        config.cache.ttl_seconds = ttl;
    }
    if let Some(capacity) = parse_env("FIELDMACHINE_CACHE_CAPACITY")? {
        config.cache.capacity = capacity;
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| FieldMachineError::Config(format!("{name} has an invalid value"))),
        Err(_) => Ok(None),
    }
}
