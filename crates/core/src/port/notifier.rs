// Notification Delivery Port (outbound)

use crate::error::Result;
use async_trait::async_trait;

/// Outbound notification delivery.
///
/// At-least-once semantics: a delivery failure is logged by the caller and
/// never rolls back the store decrement that accompanies a fire.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, owner: &str, message: &str) -> Result<()>;
}
