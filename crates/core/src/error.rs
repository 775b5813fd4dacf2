use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaddyError {
    #[error("{collection} validation failed: {}", .failures.join(", "))]
    Validation {
        collection: &'static str,
        failures: Vec<String>,
    },

    #[error("{collection} validation failed: expected a JSON object")]
    NotAnObject { collection: &'static str },

    #[error("{0}")]
    Invalid(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PaddyError>;
