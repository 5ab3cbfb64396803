//! HTTP API: the LINE webhook and the notification endpoint.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::logging_middleware;
pub use types::*;

use crate::bot::Bot;
use crate::notifier::Notifier;
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use line_client::{SignatureVerifier, SIGNATURE_HEADER};
use secrecy::SecretString;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Webhook event handler
    pub bot: Arc<Bot>,
    /// Report notification fan-out
    pub notifier: Notifier,
    /// Webhook signature check; `None` when verification is disabled
    pub verifier: Option<SignatureVerifier>,
    /// Bearer key for the notify endpoint; `None` leaves it open
    pub notify_api_key: Option<SecretString>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        bot: Bot,
        notifier: Notifier,
        verifier: Option<SignatureVerifier>,
        notify_api_key: Option<String>,
    ) -> Self {
        Self {
            bot: Arc::new(bot),
            notifier,
            verifier,
            notify_api_key: notify_api_key
                .filter(|k| !k.is_empty())
                .map(SecretString::new),
        }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(SIGNATURE_HEADER),
        ]);

    Router::new()
        .route(
            "/api/webhook",
            get(handlers::health)
                .post(handlers::webhook)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/notify",
            post(handlers::notify)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .layer(cors)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
