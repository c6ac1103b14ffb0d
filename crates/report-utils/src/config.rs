//! Environment-based configuration helpers

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// An environment variable was set but could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for {key}: '{value}' ({detail})")]
pub struct EnvError {
    pub key: String,
    pub value: String,
    pub detail: String,
}

/// Value of `key` when it is set to something other than whitespace
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse `key` into `T`; unset or blank yields `Ok(None)`
pub fn env_var<T>(key: &str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: Display,
{
    env_string(key).map(|raw| parse_value(key, &raw)).transpose()
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, EnvError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse().map_err(|e: T::Err| EnvError {
        key: key.to_string(),
        value: raw.to_string(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u16>("PORT", "8080"), Ok(8080));

        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert_eq!(err.key, "PORT");
        assert_eq!(err.value, "eighty");
        assert!(err.to_string().starts_with("Invalid value for PORT: 'eighty'"));
    }

    #[test]
    fn test_unset_variable() {
        let key = "REPORT_UTILS_TEST_SURELY_UNSET";
        assert_eq!(env_string(key), None);
        assert_eq!(env_var::<u32>(key), Ok(None));
    }
}
