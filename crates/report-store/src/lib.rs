//! Document storage for the unsafe-report bot.
//!
//! State lives in a remote JSON document store (Firebase Realtime
//! Database); the in-memory backend mirrors its path semantics for tests
//! and local runs.

mod document;
mod error;
mod store;
mod types;

pub use document::{DocumentStore, FirebaseStore, MemoryStore};
pub use error::StoreError;
pub use store::{ReportStore, SESSIONS_PATH, UNITS_PATH, USERS_PATH};
pub use types::*;
