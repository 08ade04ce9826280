use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Signature data error: {0}")]
    SignatureData(String),

    #[error("Signature length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Metadata resolution error: {0}")]
    Resolution(String),

    #[error("Image hash error: {0}")]
    Hash(String),

    #[error("Image cache error: {0}")]
    Cache(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[cfg(feature = "remote")]
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, RosterError>;
