use thiserror::Error;

use crate::model::format::Format;

#[derive(Error, Debug)]
pub enum L10nError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Invalid {format} document: {message}")]
    Format { format: Format, message: String },

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("Invalid unit id '{id}': {message}")]
    UnitId { id: String, message: String },

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("Invalid payload: {message}")]
    Payload { message: String },
}

impl L10nError {
    pub fn format(format: Format, message: impl Into<String>) -> Self {
        L10nError::Format {
            format,
            message: message.into(),
        }
    }

    pub fn payload(message: impl Into<String>) -> Self {
        L10nError::Payload {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, L10nError>;
