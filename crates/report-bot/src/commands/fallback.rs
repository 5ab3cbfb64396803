//! Fallback - replies to anything no other handler claims.

use crate::commands::{CommandHandler, MessageContext};
use crate::error::AppResult;
use crate::replies;
use async_trait::async_trait;
use line_client::Message;

pub struct FallbackHandler;

impl FallbackHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FallbackHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for FallbackHandler {
    fn name(&self) -> &str {
        "fallback"
    }

    fn matches(&self, _ctx: &MessageContext) -> bool {
        true
    }

    async fn execute(&self, _ctx: &MessageContext) -> AppResult<Vec<Message>> {
        Ok(vec![replies::fallback()])
    }
}
