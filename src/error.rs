//! Error types shared by the solver, the configuration loader and the binary.

use thiserror::Error;

/// Why an expression could not be solved. The inner message comes from the symbolic engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("could not parse expression: {0}")]
    Parse(String),
    #[error("could not integrate expression: {0}")]
    Integration(String),
}

impl SolverError {
    /// The engine message without the prefix.
    pub fn details(&self) -> &str {
        match self {
            SolverError::Parse(msg) | SolverError::Integration(msg) => msg,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    #[error("invalid log level '{0}' (expected off, error, warn, info, debug or trace)")]
    InvalidLogLevel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_error_messages() {
        let err = SolverError::Parse("Unbalanced parentheses".to_string());
        assert_eq!(err.to_string(), "could not parse expression: Unbalanced parentheses");
        assert_eq!(err.details(), "Unbalanced parentheses");
        let err = SolverError::Integration("Cannot integrate x**x".to_string());
        assert_eq!(err.details(), "Cannot integrate x**x");
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::InvalidPort("http".to_string()).to_string(),
            "invalid port 'http'"
        );
    }
}
