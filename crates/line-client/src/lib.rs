//! LINE Messaging API client.

mod client;
mod error;
mod signature;
mod types;

pub use client::LineClient;
pub use error::LineError;
pub use signature::{SignatureVerifier, SIGNATURE_HEADER};
pub use types::*;

/// Max message objects LINE accepts in one push or reply call.
pub const MAX_MESSAGES_PER_REQUEST: usize = 5;
