//! Webhook event handling.

use crate::catalog::{Catalog, MatchPolicy, Preset};
use crate::commands::{Dispatcher, MessageContext};
use crate::error::AppResult;
use crate::replies;
use crate::session::SessionEngine;
use line_client::{Event, LineClient, Message};
use report_store::ReportStore;
use tracing::{debug, info, warn};

/// Handles one webhook event at a time.
pub struct Bot {
    line: LineClient,
    store: ReportStore,
    dispatcher: Dispatcher,
    presets: Vec<Preset>,
    policy: MatchPolicy,
}

impl Bot {
    pub fn new(
        line: LineClient,
        store: ReportStore,
        presets: Vec<Preset>,
        policy: MatchPolicy,
    ) -> Self {
        let dispatcher = Dispatcher::standard(SessionEngine::new(store.clone()), line.clone());
        Self {
            line,
            store,
            dispatcher,
            presets,
            policy,
        }
    }

    /// Handle a single event. Store failures are returned; reply failures
    /// are only logged.
    pub async fn handle_event(&self, event: &Event) -> AppResult<()> {
        match event {
            Event::Follow {
                reply_token,
                source,
            } => {
                let display_name = match &source.user_id {
                    Some(user_id) => {
                        info!("Followed by {}", user_id);
                        match self.line.get_profile(user_id).await {
                            Ok(profile) => Some(profile.display_name),
                            Err(e) => {
                                warn!("Profile lookup failed for {}: {}", user_id, e);
                                None
                            }
                        }
                    }
                    None => None,
                };

                self.reply(reply_token, &[replies::welcome(display_name.as_deref())])
                    .await;
            }
            Event::Unfollow { source } => {
                let Some(user_id) = &source.user_id else {
                    return Ok(());
                };
                if self.store.deactivate_registration(user_id).await? {
                    info!("Deactivated registration for {}", user_id);
                } else {
                    debug!("Unfollow from unregistered user {}", user_id);
                }
            }
            Event::Message {
                reply_token,
                source,
                message,
            } => {
                let (Some(user_id), Some(text)) = (&source.user_id, message.text()) else {
                    debug!("Ignoring non-text message");
                    return Ok(());
                };

                let catalog = Catalog::new(self.store.units().await?, self.presets.clone(), self.policy);
                let ctx = MessageContext::new(user_id.as_str(), text, catalog);
                let messages = self.dispatcher.dispatch(&ctx).await?;

                if !messages.is_empty() {
                    self.reply(reply_token, &messages).await;
                }
            }
            Event::Unsupported => {
                debug!("Ignoring unsupported event");
            }
        }

        Ok(())
    }

    async fn reply(&self, reply_token: &str, messages: &[Message]) {
        if let Err(e) = self.line.reply(reply_token, messages).await {
            warn!("Failed to send reply: {}", e);
        }
    }
}
