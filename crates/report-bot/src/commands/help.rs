//! Help command - displays available commands.

use crate::commands::{CommandHandler, MessageContext};
use crate::error::AppResult;
use crate::replies;
use async_trait::async_trait;
use line_client::Message;

pub struct HelpHandler;

impl HelpHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HelpHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    fn name(&self) -> &str {
        "help"
    }

    fn keywords(&self) -> &[&str] {
        &["help", "?", "ช่วยเหลือ"]
    }

    async fn execute(&self, _ctx: &MessageContext) -> AppResult<Vec<Message>> {
        Ok(vec![replies::help()])
    }
}
