// Repository trait for the watchdog registry
use crate::domain::watchdog::Watchdog;
use async_trait::async_trait;

#[async_trait]
pub trait WatchdogRepository: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Watchdog>>;

    /// Record a check-in. Unknown names are ignored (reported as false);
    /// callers acknowledge the report either way.
    async fn record_checkin(&self, name: &str, timestamp: i64) -> anyhow::Result<bool>;

    /// Clear the last-checkin timestamp after an alert fires, so the next
    /// evaluation reports the watchdog as expired instead of re-alerting.
    async fn mark_fired(&self, name: &str) -> anyhow::Result<()>;
}
