//! Unsafe-report LINE bot.
//!
//! Receives LINE webhook deliveries, walks users through choosing the
//! units they are responsible for, and pushes report notifications to
//! everyone registered for a unit.

pub mod api;
pub mod bot;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod notifier;
pub mod replies;
pub mod session;

pub use bot::Bot;
pub use catalog::{Catalog, MatchPolicy, Preset};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use notifier::{NotifyOutcome, Notifier};
pub use session::SessionEngine;
