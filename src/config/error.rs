//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file `{0}` not found")]
    NotFound(PathBuf),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid config file `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::NotFound(PathBuf::from("ccbuilder.json"));
        assert_eq!(err.to_string(), "config file `ccbuilder.json` not found");

        let err = ConfigError::Validation("sourceDir is empty".into());
        assert_eq!(err.to_string(), "config validation error: sourceDir is empty");
    }
}
