//! Register command - starts or resumes a selection session.

use crate::commands::{CommandHandler, MessageContext};
use crate::error::AppResult;
use crate::replies;
use crate::session::SessionEngine;
use async_trait::async_trait;
use line_client::Message;

pub struct RegisterHandler {
    engine: SessionEngine,
}

impl RegisterHandler {
    pub fn new(engine: SessionEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl CommandHandler for RegisterHandler {
    fn name(&self) -> &str {
        "register"
    }

    fn keywords(&self) -> &[&str] {
        &["register", "ลงทะเบียน"]
    }

    async fn execute(&self, ctx: &MessageContext) -> AppResult<Vec<Message>> {
        if ctx.catalog.is_empty() {
            return Ok(vec![replies::catalog_unavailable()]);
        }

        let started = self.engine.start(&ctx.user_id).await?;

        Ok(vec![
            replies::catalog_carousel(&ctx.catalog),
            replies::registration_instructions(&started.session, started.resumed),
        ])
    }
}
