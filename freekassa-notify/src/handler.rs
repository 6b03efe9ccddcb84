//! Port for acting on verified notifications.

use crate::Notification;

/// Receives notifications that passed verification.
///
/// Implementations typically mark the merchant order as paid. An error makes
/// the endpoint answer 500, so the provider will deliver the notification
/// again.
#[async_trait::async_trait]
pub trait NotificationHandler: Send + Sync + 'static {
    async fn on_payment(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Handler that only logs accepted payments.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHandler;

#[async_trait::async_trait]
impl NotificationHandler for LoggingHandler {
    async fn on_payment(&self, notification: &Notification) -> anyhow::Result<()> {
        tracing::info!(
            payment_id = ?notification.payment_id,
            freekassa_id = ?notification.freekassa_id,
            amount = ?notification.amount,
            "Payment notification accepted"
        );
        Ok(())
    }
}
