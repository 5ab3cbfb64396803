//! Finish command - commits the current selection.

use crate::commands::{CommandHandler, MessageContext};
use crate::error::AppResult;
use crate::replies;
use crate::session::{FinishOutcome, ProfileInfo, SessionEngine};
use async_trait::async_trait;
use line_client::{LineClient, Message};

pub struct FinishHandler {
    engine: SessionEngine,
    line: LineClient,
}

impl FinishHandler {
    pub fn new(engine: SessionEngine, line: LineClient) -> Self {
        Self { engine, line }
    }
}

#[async_trait]
impl CommandHandler for FinishHandler {
    fn name(&self) -> &str {
        "finish"
    }

    fn keywords(&self) -> &[&str] {
        &["finish", "done", "เสร็จสิ้น"]
    }

    async fn execute(&self, ctx: &MessageContext) -> AppResult<Vec<Message>> {
        let profile = ProfileInfo::fetch(&self.line, &ctx.user_id);

        let reply = match self.engine.finish(&ctx.user_id, profile).await? {
            FinishOutcome::Committed(registration) => replies::registered(&registration),
            FinishOutcome::EmptySelection => replies::empty_selection(),
        };

        Ok(vec![reply])
    }
}
