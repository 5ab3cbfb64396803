//! Bot command handlers.
//!
//! Handlers are tried in a fixed order and the first one whose `matches`
//! returns true handles the message. Command words come first, then role
//! presets, then unit names, then the fallback.

mod cancel;
mod fallback;
mod finish;
mod help;
mod preset;
mod register;
mod reset;
mod status;
mod unit;

pub use cancel::CancelHandler;
pub use fallback::FallbackHandler;
pub use finish::FinishHandler;
pub use help::HelpHandler;
pub use preset::PresetHandler;
pub use register::RegisterHandler;
pub use reset::ResetHandler;
pub use status::StatusHandler;
pub use unit::UnitHandler;

use crate::catalog::Catalog;
use crate::error::AppResult;
use crate::session::SessionEngine;
use async_trait::async_trait;
use line_client::{LineClient, Message};
use tracing::debug;

/// A text message from one user, with the catalog it is classified against.
#[derive(Debug, Clone)]
pub struct MessageContext {
    pub user_id: String,
    /// Trimmed text.
    pub text: String,
    /// Trimmed, lowercased text used for keyword comparison.
    pub normalized: String,
    pub catalog: Catalog,
}

impl MessageContext {
    pub fn new(user_id: impl Into<String>, text: &str, catalog: Catalog) -> Self {
        let text = text.trim().to_string();
        let normalized = text.to_lowercase();
        Self {
            user_id: user_id.into(),
            text,
            normalized,
            catalog,
        }
    }
}

/// Command handler trait.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command name (e.g., "register", "status").
    fn name(&self) -> &str;

    /// Lowercase words that trigger this command.
    fn keywords(&self) -> &[&str] {
        &[]
    }

    /// Check if this handler matches the message.
    fn matches(&self, ctx: &MessageContext) -> bool {
        self.keywords().contains(&ctx.normalized.as_str())
    }

    /// Execute the command, returning the reply messages.
    async fn execute(&self, ctx: &MessageContext) -> AppResult<Vec<Message>>;
}

/// Ordered list of handlers, first match wins.
pub struct Dispatcher {
    handlers: Vec<Box<dyn CommandHandler>>,
}

impl Dispatcher {
    pub fn new(handlers: Vec<Box<dyn CommandHandler>>) -> Self {
        Self { handlers }
    }

    /// The standard handler order.
    pub fn standard(engine: SessionEngine, line: LineClient) -> Self {
        Self::new(vec![
            Box::new(RegisterHandler::new(engine.clone())),
            Box::new(FinishHandler::new(engine.clone(), line.clone())),
            Box::new(CancelHandler::new(engine.clone())),
            Box::new(ResetHandler::new(engine.clone())),
            Box::new(StatusHandler::new(engine.clone())),
            Box::new(HelpHandler::new()),
            Box::new(PresetHandler::new(engine.clone(), line)),
            Box::new(UnitHandler::new(engine)),
            Box::new(FallbackHandler::new()),
        ])
    }

    fn find(&self, ctx: &MessageContext) -> Option<&dyn CommandHandler> {
        self.handlers
            .iter()
            .find(|h| h.matches(ctx))
            .map(|h| h.as_ref())
    }

    /// Name of the handler that would handle this message.
    pub fn route(&self, ctx: &MessageContext) -> Option<&str> {
        self.find(ctx).map(|h| h.name())
    }

    /// Run the first matching handler. No match yields no replies.
    pub async fn dispatch(&self, ctx: &MessageContext) -> AppResult<Vec<Message>> {
        match self.find(ctx) {
            Some(handler) => {
                debug!("Dispatching {:?} from {} to {}", ctx.text, ctx.user_id, handler.name());
                handler.execute(ctx).await
            }
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_presets, default_units, MatchPolicy};
    use report_store::{ReportStore, Unit};
    use std::time::Duration;

    fn dispatcher() -> Dispatcher {
        let line = LineClient::new("http://localhost:9", "token", Duration::from_secs(1)).unwrap();
        Dispatcher::standard(SessionEngine::new(ReportStore::memory()), line)
    }

    fn ctx(text: &str, units: Vec<Unit>) -> MessageContext {
        MessageContext::new(
            "U1",
            text,
            Catalog::new(units, default_presets(), MatchPolicy::FirstMatch),
        )
    }

    fn route(text: &str) -> String {
        dispatcher()
            .route(&ctx(text, default_units()))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_keywords_are_trimmed_and_case_folded() {
        assert_eq!(route("  REGISTER "), "register");
        assert_eq!(route("ลงทะเบียน"), "register");
        assert_eq!(route("Done"), "finish");
        assert_eq!(route("เสร็จสิ้น"), "finish");
        assert_eq!(route("ยกเลิก"), "cancel");
        assert_eq!(route("รีเซ็ต"), "reset");
        assert_eq!(route("สถานะ"), "status");
        assert_eq!(route("?"), "help");
        assert_eq!(route("ช่วยเหลือ"), "help");
    }

    #[test]
    fn test_commands_beat_unit_names() {
        let units = vec![Unit::new(1, "Status Board"), Unit::new(2, "help desk")];
        let dispatcher = dispatcher();

        assert_eq!(dispatcher.route(&ctx("status", units.clone())), Some("status"));
        assert_eq!(dispatcher.route(&ctx("Help", units)), Some("help"));
    }

    #[test]
    fn test_presets_beat_unit_substrings() {
        // "Warehouse Supervisor" contains the unit name "Warehouse"
        assert_eq!(route("warehouse supervisor"), "preset");
        assert_eq!(route("Warehouse Supervisor"), "preset");
        assert_eq!(route("Warehouse"), "unit");
    }

    #[test]
    fn test_unknown_text_falls_back() {
        assert_eq!(route("hello there"), "fallback");
        assert_eq!(route(""), "fallback");
    }

    #[test]
    fn test_keyword_must_be_whole_message() {
        assert_eq!(route("register me"), "fallback");
    }
}
