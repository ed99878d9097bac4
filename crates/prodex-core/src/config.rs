use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the real environment so tests can
/// drive them with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("PRODEX_ENV", "development"));
    let bind_addr = parse_addr("PRODEX_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PRODEX_LOG_LEVEL", "info");
    let api_keys = parse_api_keys(&or_default("PRODEX_API_KEYS", ""));

    if api_keys.is_empty() && env != Environment::Development {
        return Err(ConfigError::MissingEnvVar("PRODEX_API_KEYS".to_string()));
    }

    let render_timeout_secs = parse_u64("PRODEX_RENDER_TIMEOUT_SECS", "30")?;
    if render_timeout_secs == 0 {
        return Err(invalid(
            "PRODEX_RENDER_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let render_user_agent = or_default(
        "PRODEX_RENDER_USER_AGENT",
        "prodex/0.1 (product-extraction)",
    );
    let render_max_retries = parse_u32("PRODEX_RENDER_MAX_RETRIES", "2")?;
    let render_backoff_base_ms = parse_u64("PRODEX_RENDER_BACKOFF_BASE_MS", "500")?;
    let rate_limit_per_minute = parse_usize("PRODEX_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        api_keys,
        render_timeout_secs,
        render_user_agent,
        render_max_retries,
        render_backoff_base_ms,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Splits a comma-separated token list, dropping blanks and duplicates.
fn parse_api_keys(raw: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for key in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_owned());
        }
    }
    keys
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
