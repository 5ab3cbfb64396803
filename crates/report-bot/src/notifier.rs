//! Fan-out of report notifications to registered users.

use crate::error::AppResult;
use futures::future::join_all;
use line_client::{LineClient, Message};
use report_store::ReportStore;
use tracing::{info, instrument, warn};

/// Result of a notification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// No active registration covers the unit.
    NoRecipients,
    /// One push was attempted per recipient, whatever its result.
    Sent { attempted: usize },
}

#[derive(Clone)]
pub struct Notifier {
    store: ReportStore,
    line: LineClient,
}

impl Notifier {
    pub fn new(store: ReportStore, line: LineClient) -> Self {
        Self { store, line }
    }

    /// User ids with an active registration that covers `unit_name`.
    pub async fn recipients(&self, unit_name: &str) -> AppResult<Vec<String>> {
        Ok(self
            .store
            .registrations()
            .await?
            .into_iter()
            .filter(|(_, r)| r.is_active() && r.covers_unit(unit_name))
            .map(|(user_id, _)| user_id)
            .collect())
    }

    /// Push `message` to every recipient of `unit_name` concurrently.
    #[instrument(skip(self, message))]
    pub async fn notify(&self, unit_name: &str, message: &str) -> AppResult<NotifyOutcome> {
        let recipients = self.recipients(unit_name).await?;
        if recipients.is_empty() {
            info!("No recipients for unit {}", unit_name);
            return Ok(NotifyOutcome::NoRecipients);
        }

        let messages = [Message::text(message)];
        let results = join_all(
            recipients
                .iter()
                .map(|user_id| self.line.push(user_id, &messages)),
        )
        .await;

        let mut failed = 0;
        for (user_id, result) in recipients.iter().zip(&results) {
            if let Err(e) = result {
                failed += 1;
                warn!("Push to {} failed: {}", user_id, e);
            }
        }

        info!(
            "Notified {} user(s) for unit {} ({} failed)",
            recipients.len(),
            unit_name,
            failed
        );

        Ok(NotifyOutcome::Sent {
            attempted: recipients.len(),
        })
    }
}
