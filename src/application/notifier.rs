// Outbound notification channel
use async_trait::async_trait;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a short text message to a phone number. No retries; failures
    /// are reported to the caller, which logs and moves on.
    async fn send(&self, to: &str, message: &str) -> anyhow::Result<()>;
}
