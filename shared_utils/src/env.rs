use std::str::FromStr;

use thiserror::Error;

/// Errors produced while reading configuration from the process environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// The variable is not set, or is set to an empty string.
    #[error("Missing environment variable: {0}")]
    Missing(String),

    /// The variable is set but its value could not be parsed.
    #[error("Invalid value for environment variable {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Reads an environment variable, returning a structured error if it's missing.
///
/// Blank values count as missing, so `FOO=` in a `.env` file does not
/// silently turn into an empty credential.
pub fn get_env_var(name: &str) -> Result<String, EnvError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(EnvError::Missing(name.to_string())),
    }
}

/// Reads an environment variable, falling back to `default` when it is missing.
pub fn get_env_var_or(name: &str, default: &str) -> String {
    get_env_var(name).unwrap_or_else(|_| default.to_string())
}

/// Reads and parses an environment variable. Returns `Ok(None)` when unset.
pub fn get_env_parse<T>(name: &str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| EnvError::Invalid {
                name: name.to_string(),
                reason: e.to_string(),
            }),
        Err(EnvError::Missing(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
