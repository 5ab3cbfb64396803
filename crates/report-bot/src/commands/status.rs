//! Status command - shows the current registration.

use crate::commands::{CommandHandler, MessageContext};
use crate::error::AppResult;
use crate::replies;
use crate::session::SessionEngine;
use async_trait::async_trait;
use line_client::Message;

pub struct StatusHandler {
    engine: SessionEngine,
}

impl StatusHandler {
    pub fn new(engine: SessionEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl CommandHandler for StatusHandler {
    fn name(&self) -> &str {
        "status"
    }

    fn keywords(&self) -> &[&str] {
        &["status", "สถานะ"]
    }

    async fn execute(&self, ctx: &MessageContext) -> AppResult<Vec<Message>> {
        let registration = self.engine.registration(&ctx.user_id).await?;
        Ok(vec![replies::status(registration.as_ref())])
    }
}
