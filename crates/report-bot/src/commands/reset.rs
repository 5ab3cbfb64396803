//! Reset command - removes both the session and the registration.

use crate::commands::{CommandHandler, MessageContext};
use crate::error::AppResult;
use crate::replies;
use crate::session::SessionEngine;
use async_trait::async_trait;
use line_client::Message;

pub struct ResetHandler {
    engine: SessionEngine,
}

impl ResetHandler {
    pub fn new(engine: SessionEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl CommandHandler for ResetHandler {
    fn name(&self) -> &str {
        "reset"
    }

    fn keywords(&self) -> &[&str] {
        &["reset", "รีเซ็ต"]
    }

    async fn execute(&self, ctx: &MessageContext) -> AppResult<Vec<Message>> {
        self.engine.reset(&ctx.user_id).await?;
        Ok(vec![replies::reset_done()])
    }
}
