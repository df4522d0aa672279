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
/// Decoupled from the real environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty strings count as unset so `FOO=` in a .env file disables an option.
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let env = parse_environment(&or_default("FORUMLENS_ENV", "development"))?;

    let data_dir = PathBuf::from(or_default("FORUMLENS_DATA_DIR", "./pohkim/public"));
    let output_dir = PathBuf::from(or_default("FORUMLENS_OUTPUT_DIR", "./analytics/reports"));
    let sentiment_path = optional("FORUMLENS_SENTIMENT_PATH").map(PathBuf::from);
    let analytics_config_path = optional("FORUMLENS_ANALYTICS_CONFIG").map(PathBuf::from);
    let log_level = or_default("FORUMLENS_LOG_LEVEL", "info");
    let log_dir = optional("FORUMLENS_LOG_DIR").map(PathBuf::from);

    let as_of = optional("FORUMLENS_AS_OF")
        .map(|raw| {
            chrono::DateTime::parse_from_rfc3339(raw.trim())
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: "FORUMLENS_AS_OF".to_string(),
                    reason: e.to_string(),
                })
        })
        .transpose()?;

    Ok(AppConfig {
        env,
        data_dir,
        output_dir,
        sentiment_path,
        analytics_config_path,
        log_level,
        log_dir,
        as_of,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FORUMLENS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
