//! API request and response types.

use serde::{Deserialize, Serialize};

/// Liveness response for `GET /api/webhook`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

/// Response to an accepted webhook delivery.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
}

/// Request to notify everyone registered for a unit.
///
/// Fields are optional so missing ones can be reported as a payload error
/// rather than a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest {
    #[serde(default)]
    pub unit_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyResponse {
    pub success: bool,
    pub sent_count: usize,
    pub unit_name: String,
}
