//! Cancel command - discards the selection in progress.

use crate::commands::{CommandHandler, MessageContext};
use crate::error::AppResult;
use crate::replies;
use crate::session::SessionEngine;
use async_trait::async_trait;
use line_client::Message;

pub struct CancelHandler {
    engine: SessionEngine,
}

impl CancelHandler {
    pub fn new(engine: SessionEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl CommandHandler for CancelHandler {
    fn name(&self) -> &str {
        "cancel"
    }

    fn keywords(&self) -> &[&str] {
        &["cancel", "ยกเลิก"]
    }

    async fn execute(&self, ctx: &MessageContext) -> AppResult<Vec<Message>> {
        let had_session = self.engine.cancel(&ctx.user_id).await?;
        Ok(vec![replies::cancelled(had_session)])
    }
}
