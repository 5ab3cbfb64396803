//! Preset command - registers a role's unit set in one step.

use crate::commands::{CommandHandler, MessageContext};
use crate::error::AppResult;
use crate::replies;
use crate::session::{PresetOutcome, ProfileInfo, SessionEngine};
use async_trait::async_trait;
use line_client::{LineClient, Message};

pub struct PresetHandler {
    engine: SessionEngine,
    line: LineClient,
}

impl PresetHandler {
    pub fn new(engine: SessionEngine, line: LineClient) -> Self {
        Self { engine, line }
    }
}

#[async_trait]
impl CommandHandler for PresetHandler {
    fn name(&self) -> &str {
        "preset"
    }

    fn matches(&self, ctx: &MessageContext) -> bool {
        ctx.catalog.preset(&ctx.normalized).is_some()
    }

    async fn execute(&self, ctx: &MessageContext) -> AppResult<Vec<Message>> {
        let Some(preset) = ctx.catalog.preset(&ctx.normalized) else {
            return Ok(vec![replies::fallback()]);
        };

        let profile = ProfileInfo::fetch(&self.line, &ctx.user_id);
        let reply = match self
            .engine
            .apply_preset(&ctx.user_id, preset, &ctx.catalog, profile)
            .await?
        {
            PresetOutcome::Committed(registration) => replies::registered(&registration),
            PresetOutcome::NoUnits => replies::preset_unavailable(&preset.label),
        };

        Ok(vec![reply])
    }
}
