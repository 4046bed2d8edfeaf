#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("rqlite directive error (line {line}): {message}")]
    Directive { line: usize, message: String },

    #[error("Invalid dsn: {0}")]
    Dsn(String),
}

impl From<ConfigError> for crate::DomainError {
    fn from(e: ConfigError) -> Self {
        crate::DomainError::ConfigError(e.to_string())
    }
}
