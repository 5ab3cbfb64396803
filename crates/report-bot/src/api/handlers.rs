//! HTTP request handlers.

use super::types::{HealthResponse, NotifyRequest, NotifyResponse, WebhookResponse};
use super::AppState;
use crate::error::{AppError, AppResult};
use crate::notifier::NotifyOutcome;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use line_client::{WebhookBody, SIGNATURE_HEADER};
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

/// Liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "LINE webhook is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Bare `OPTIONS` requests; real preflights are answered by the CORS layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Receive a LINE webhook delivery.
///
/// The signature is checked against the raw body before anything is
/// parsed. Events are handled in delivery order; a store failure stops
/// the remaining events and fails the request so LINE redelivers it.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookResponse>> {
    if let Some(verifier) = &state.verifier {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::MissingSignature)?;

        if !verifier.verify(&body, signature) {
            warn!("Rejected webhook with invalid signature");
            return Err(AppError::InvalidSignature);
        }
    }

    let payload: WebhookBody =
        serde_json::from_slice(&body).map_err(|e| AppError::InvalidPayload(e.to_string()))?;
    debug!("Webhook delivery with {} event(s)", payload.events.len());

    for event in &payload.events {
        debug!("Handling {} event", event.kind());
        state.bot.handle_event(event).await?;
    }

    Ok(Json(WebhookResponse { success: true }))
}

/// Push a report notification to every user registered for a unit.
pub async fn notify(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<NotifyRequest>, JsonRejection>,
) -> AppResult<Json<NotifyResponse>> {
    if let Some(key) = &state.notify_api_key {
        let provided = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        if provided != Some(key.expose_secret().as_str()) {
            warn!("Rejected notify request with missing or wrong key");
            return Err(AppError::Unauthorized);
        }
    }

    let Json(request) = payload.map_err(|e| AppError::InvalidPayload(e.body_text()))?;
    let unit_name = required(request.unit_name, "unitName")?;
    let message = required(request.message, "message")?;

    info!(unit_name = %unit_name, "Notification requested");

    match state.notifier.notify(&unit_name, &message).await? {
        NotifyOutcome::NoRecipients => Err(AppError::NoRecipients(unit_name)),
        NotifyOutcome::Sent { attempted } => Ok(Json(NotifyResponse {
            success: true,
            sent_count: attempted,
            unit_name,
        })),
    }
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::InvalidPayload(format!("{} is required", field))),
    }
}
