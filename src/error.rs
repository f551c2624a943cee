use thiserror::Error;

/// Failures that abort an `ecr-login` run.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ECR API error: {0}")]
    Api(String),

    #[error("Failed to decode authorization token: {0}")]
    Decode(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LoginError>;
