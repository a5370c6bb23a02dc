use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command annotation is missing for method '{0}'")]
    MissingAnnotation(String),

    #[error(
        "Fallback method '{method}({signature})' not found on type '{owner}', registered overloads: {available:?}"
    )]
    NoSuchFallbackMethod {
        owner: String,
        method: String,
        signature: String,
        available: Vec<String>,
    },

    #[error("Unsupported thread pool property: {0}")]
    UnsupportedProperty(String),

    #[error("Invalid value '{value}' for property '{name}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Cyclic fallback chain: {}", .0.join(" -> "))]
    CyclicFallback(Vec<String>),

    #[error("Invalid invocation metadata: {0}")]
    InvalidMetadata(String),

    #[error("Method '{0}' is already registered")]
    DuplicateMethod(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),
}

pub type Result<T> = std::result::Result<T, CommandError>;

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}
