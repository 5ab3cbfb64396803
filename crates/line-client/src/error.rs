//! LINE client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Channel access token rejected")]
    Unauthorized,

    #[error("Too many messages in one request: {0} (max {max})", max = crate::MAX_MESSAGES_PER_REQUEST)]
    TooManyMessages(usize),

    #[error("Send failed: {0}")]
    SendFailed(String),
}
