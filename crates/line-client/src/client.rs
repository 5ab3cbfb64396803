//! LINE HTTP client.

use crate::error::LineError;
use crate::types::*;
use crate::MAX_MESSAGES_PER_REQUEST;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

/// LINE Messaging API client.
///
/// The channel access token is kept in a `SecretString` so it never
/// shows up in debug output.
#[derive(Clone)]
pub struct LineClient {
    client: Client,
    base_url: String,
    access_token: SecretString,
}

impl LineClient {
    /// Create a new LINE client.
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LineError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: SecretString::new(access_token.into()),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.access_token.expose_secret())
    }

    /// Check that the access token is accepted by the API.
    pub async fn health_check(&self) -> bool {
        self.authorized(self.client.get(format!("{}/v2/bot/info", self.base_url)))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Push messages to an arbitrary recipient.
    #[instrument(skip(self, messages), fields(message_count = messages.len()))]
    pub async fn push(&self, to: &str, messages: &[Message]) -> Result<(), LineError> {
        check_batch(messages)?;

        let response = self
            .authorized(
                self.client
                    .post(format!("{}/v2/bot/message/push", self.base_url)),
            )
            .json(&PushRequest { to, messages })
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            warn!("Push failed: {}", msg);
            return Err(LineError::SendFailed(msg));
        }

        debug!("Pushed {} message(s) to {}", messages.len(), to);
        Ok(())
    }

    /// Reply to a webhook event. Reply tokens are single-use.
    #[instrument(skip(self, reply_token, messages), fields(message_count = messages.len()))]
    pub async fn reply(&self, reply_token: &str, messages: &[Message]) -> Result<(), LineError> {
        check_batch(messages)?;

        let response = self
            .authorized(
                self.client
                    .post(format!("{}/v2/bot/message/reply", self.base_url)),
            )
            .json(&ReplyRequest {
                reply_token,
                messages,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            warn!("Reply failed: {}", msg);
            return Err(LineError::SendFailed(msg));
        }

        debug!("Replied with {} message(s)", messages.len());
        Ok(())
    }

    /// Look up a user's display name and avatar.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, LineError> {
        let response = self
            .authorized(self.client.get(format!(
                "{}/v2/bot/profile/{}",
                self.base_url,
                encode(user_id)
            )))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED => Err(LineError::Unauthorized),
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(LineError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

fn check_batch(messages: &[Message]) -> Result<(), LineError> {
    if messages.len() > MAX_MESSAGES_PER_REQUEST {
        return Err(LineError::TooManyMessages(messages.len()));
    }
    Ok(())
}
