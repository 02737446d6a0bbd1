use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShareError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Content stream unavailable: {0}")]
    StreamUnavailable(String),

    #[error("Invalid content reference: {0}")]
    InvalidUri(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel closed: {0}")]
    Channel(String),
}

impl serde::Serialize for ShareError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShareError>;
