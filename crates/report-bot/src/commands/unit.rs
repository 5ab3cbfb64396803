//! Unit selection - toggles the unit named by the message.

use crate::catalog::UnitMatch;
use crate::commands::{CommandHandler, MessageContext};
use crate::error::AppResult;
use crate::replies;
use crate::session::SessionEngine;
use async_trait::async_trait;
use line_client::Message;

pub struct UnitHandler {
    engine: SessionEngine,
}

impl UnitHandler {
    pub fn new(engine: SessionEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl CommandHandler for UnitHandler {
    fn name(&self) -> &str {
        "unit"
    }

    fn matches(&self, ctx: &MessageContext) -> bool {
        ctx.catalog.resolve(&ctx.text) != UnitMatch::NotFound
    }

    async fn execute(&self, ctx: &MessageContext) -> AppResult<Vec<Message>> {
        let unit = match ctx.catalog.resolve(&ctx.text) {
            UnitMatch::Found(unit) => unit,
            UnitMatch::Ambiguous(candidates) => return Ok(vec![replies::ambiguous(&candidates)]),
            UnitMatch::NotFound => return Ok(vec![replies::fallback()]),
        };

        let (session, toggle) = self.engine.toggle(&ctx.user_id, unit).await?;
        Ok(vec![replies::selection(&session, toggle, unit)])
    }
}
