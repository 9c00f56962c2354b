//! Environment-backed configuration helpers

use std::str::FromStr;

/// Errors raised while reading configuration from the environment
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable present but its value does not parse
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    Invalid {
        name: String,
        value: String,
        reason: String,
    },
}

/// Load a `.env` file from the working directory or its parents, if any
///
/// Returns the path that was loaded. Variables already set in the process
/// environment are not overridden.
pub fn load_dotenv() -> Option<std::path::PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(_) => None,
    }
}

/// Read a variable, treating unset and blank values the same
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a variable or fall back to a default
pub fn env_or(name: &str, default: &str) -> String {
    env_var(name).unwrap_or_else(|| default.to_string())
}

/// Read and parse a variable, `None` when unset or blank
pub fn env_parse<T>(name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(name)
        .map(|value| {
            value.parse::<T>().map_err(|e| ConfigError::Invalid {
                name: name.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns a distinct variable name so parallel runs do not collide.

    #[test]
    fn test_blank_is_unset() {
        unsafe {
            std::env::set_var("FILING_UTILS_TEST_BLANK", "   ");
        }
        assert_eq!(env_var("FILING_UTILS_TEST_BLANK"), None);
        assert_eq!(env_or("FILING_UTILS_TEST_BLANK", "fallback"), "fallback");
    }

    #[test]
    fn test_env_parse() {
        unsafe {
            std::env::set_var("FILING_UTILS_TEST_PORT", " 8080 ");
            std::env::set_var("FILING_UTILS_TEST_BAD", "eighty");
        }
        assert_eq!(env_parse::<u16>("FILING_UTILS_TEST_PORT"), Ok(Some(8080)));
        assert_eq!(env_parse::<u16>("FILING_UTILS_TEST_MISSING"), Ok(None));

        let err = env_parse::<u16>("FILING_UTILS_TEST_BAD").unwrap_err();
        assert!(err.to_string().contains("FILING_UTILS_TEST_BAD"));
    }
}
