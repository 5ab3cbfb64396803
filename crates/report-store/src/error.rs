//! Document store errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid document key: {0:?}")]
    InvalidKey(String),
}
