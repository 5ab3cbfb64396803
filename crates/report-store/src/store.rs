//! Typed access to catalog, session and registration documents.

use crate::document::{DocumentStore, FirebaseStore, MemoryStore};
use crate::error::StoreError;
use crate::types::*;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Unit catalog, as a JSON array.
pub const UNITS_PATH: &str = "units";
/// Finalized registrations, keyed by LINE user id.
pub const USERS_PATH: &str = "lineUsers";
/// In-progress selections, keyed by LINE user id.
pub const SESSIONS_PATH: &str = "registrationSession";

/// Store for the bot's documents.
///
/// Every call goes to the backend; nothing is cached between calls, so
/// concurrent writers to the same document race and the last write wins.
#[derive(Clone)]
pub struct ReportStore {
    documents: DocumentStore,
}

impl ReportStore {
    pub fn new(documents: DocumentStore) -> Self {
        Self { documents }
    }

    /// Store backed by a Firebase Realtime Database.
    pub fn firebase(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        Ok(Self::new(DocumentStore::Firebase(FirebaseStore::new(
            base_url, timeout,
        )?)))
    }

    /// Store held in process memory.
    pub fn memory() -> Self {
        Self::new(DocumentStore::Memory(MemoryStore::new()))
    }

    /// Raw backend, for callers that need paths outside the typed API.
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    // ==================== CATALOG ====================

    /// Load the unit catalog in catalog order.
    #[instrument(skip(self))]
    pub async fn units(&self) -> Result<Vec<Unit>, StoreError> {
        let value = self.documents.get(UNITS_PATH).await?;
        Ok(parse_units(value))
    }

    /// Write `defaults` as the catalog unless one is already stored.
    /// Returns whether anything was written.
    #[instrument(skip(self, defaults), fields(unit_count = defaults.len()))]
    pub async fn seed_units(&self, defaults: &[Unit]) -> Result<bool, StoreError> {
        if !self.units().await?.is_empty() {
            debug!("Unit catalog already present, skipping seed");
            return Ok(false);
        }

        self.documents
            .set(UNITS_PATH, &serde_json::to_value(defaults)?)
            .await?;
        info!("Seeded unit catalog with {} units", defaults.len());
        Ok(true)
    }

    // ==================== SESSIONS ====================

    #[instrument(skip(self))]
    pub async fn session(&self, user_id: &str) -> Result<Option<RegistrationSession>, StoreError> {
        let value = self.documents.get(&session_path(user_id)?).await?;
        if value.is_null() {
            return Ok(None);
        }

        match serde_json::from_value::<RegistrationSession>(value.clone()) {
            Ok(session) => Ok(Some(session)),
            Err(tagged_err) => match serde_json::from_value::<UntaggedSession>(value) {
                Ok(doc) => Ok(Some(doc.into())),
                Err(_) => {
                    warn!("Discarding unreadable session for {}: {}", user_id, tagged_err);
                    Ok(None)
                }
            },
        }
    }

    #[instrument(skip(self, session))]
    pub async fn save_session(
        &self,
        user_id: &str,
        session: &RegistrationSession,
    ) -> Result<(), StoreError> {
        self.documents
            .set(&session_path(user_id)?, &serde_json::to_value(session)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_session(&self, user_id: &str) -> Result<(), StoreError> {
        self.documents.delete(&session_path(user_id)?).await
    }

    // ==================== REGISTRATIONS ====================

    #[instrument(skip(self))]
    pub async fn registration(&self, user_id: &str) -> Result<Option<UserRegistration>, StoreError> {
        let value = self.documents.get(&user_path(user_id)?).await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Replace the user's registration wholesale.
    #[instrument(skip(self, registration))]
    pub async fn save_registration(
        &self,
        user_id: &str,
        registration: &UserRegistration,
    ) -> Result<(), StoreError> {
        self.documents
            .set(&user_path(user_id)?, &serde_json::to_value(registration)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_registration(&self, user_id: &str) -> Result<(), StoreError> {
        self.documents.delete(&user_path(user_id)?).await
    }

    /// Mark an existing registration inactive. Returns false when the user
    /// has no registration (nothing is written in that case).
    #[instrument(skip(self))]
    pub async fn deactivate_registration(&self, user_id: &str) -> Result<bool, StoreError> {
        if self.registration(user_id).await?.is_none() {
            return Ok(false);
        }

        let mut fields = Map::new();
        fields.insert(
            "status".into(),
            serde_json::to_value(RegistrationStatus::Inactive)?,
        );
        self.documents.patch(&user_path(user_id)?, &fields).await?;
        Ok(true)
    }

    /// All registrations with their user ids. Unreadable records are
    /// skipped.
    #[instrument(skip(self))]
    pub async fn registrations(&self) -> Result<Vec<(String, UserRegistration)>, StoreError> {
        let value = self.documents.get(USERS_PATH).await?;
        let Value::Object(records) = value else {
            return Ok(Vec::new());
        };

        let mut registrations = Vec::with_capacity(records.len());
        for (user_id, record) in records {
            match serde_json::from_value::<UserRegistration>(record) {
                Ok(registration) => registrations.push((user_id, registration)),
                Err(e) => warn!("Skipping unreadable registration {}: {}", user_id, e),
            }
        }
        Ok(registrations)
    }
}

/// Catalogs come back as an array (possibly with null holes) or, when
/// edited by hand, as an object keyed by index.
fn parse_units(value: Value) -> Vec<Unit> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        Value::Object(map) => {
            let mut units: Vec<Unit> = map
                .into_iter()
                .filter_map(|(_, v)| serde_json::from_value(v).ok())
                .collect();
            units.sort_by_key(|u| u.id);
            units
        }
        _ => Vec::new(),
    }
}

/// Keys Firebase refuses in paths.
const FORBIDDEN_KEY_CHARS: &[char] = &['/', '.', '#', '$', '[', ']'];

fn validate_key(key: &str) -> Result<&str, StoreError> {
    if key.is_empty() || key.contains(FORBIDDEN_KEY_CHARS) || key.chars().any(char::is_control) {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(key)
}

fn session_path(user_id: &str) -> Result<String, StoreError> {
    Ok(format!("{}/{}", SESSIONS_PATH, validate_key(user_id)?))
}

fn user_path(user_id: &str) -> Result<String, StoreError> {
    Ok(format!("{}/{}", USERS_PATH, validate_key(user_id)?))
}
