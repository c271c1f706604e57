//! Log-backed notifier
//!
//! The chat transport is an external collaborator; this stands in on its
//! Notifier port and writes deliveries to the structured log. Swapping in
//! a real transport means implementing the same port against its API.

use async_trait::async_trait;
use tickler_core::error::Result;
use tickler_core::port::Notifier;
use tracing::info;

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, owner: &str, message: &str) -> Result<()> {
        info!(owner = %owner, message = %message, "Reminder delivered");
        Ok(())
    }
}
