use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("CENTREFIND_ENV", "development"))?;

    let bind_addr = or_default("CENTREFIND_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("CENTREFIND_BIND_ADDR", e.to_string()))?;

    let log_level = or_default("CENTREFIND_LOG_LEVEL", "info");
    let sources_path = PathBuf::from(or_default(
        "CENTREFIND_SOURCES_PATH",
        "./config/sources.yaml",
    ));
    let areas_path = lookup("CENTREFIND_AREAS_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);
    let gazetteer_path = lookup("CENTREFIND_GAZETTEER_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let default_k = or_default("CENTREFIND_DEFAULT_K", "8")
        .parse::<usize>()
        .map_err(|e| invalid("CENTREFIND_DEFAULT_K", e.to_string()))?;
    if default_k == 0 {
        return Err(invalid("CENTREFIND_DEFAULT_K", "must be at least 1".to_string()));
    }

    let min_separation_miles = or_default("CENTREFIND_MIN_SEPARATION_MILES", "0.005")
        .parse::<f64>()
        .map_err(|e| invalid("CENTREFIND_MIN_SEPARATION_MILES", e.to_string()))?;
    if !min_separation_miles.is_finite() || min_separation_miles < 0.0 {
        return Err(invalid(
            "CENTREFIND_MIN_SEPARATION_MILES",
            "must be a finite, non-negative number of miles".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        sources_path,
        areas_path,
        gazetteer_path,
        default_k,
        min_separation_miles,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CENTREFIND_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
