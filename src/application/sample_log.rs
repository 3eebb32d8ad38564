// Repository trait for the append-only sample log
use async_trait::async_trait;

/// Raw access to the uptime log. One line per check-in report; appends are
/// best-effort with no locking, readers tolerate partial or malformed lines.
#[async_trait]
pub trait SampleLog: Send + Sync {
    /// Entire log contents. A missing log reads as empty.
    async fn read_full(&self) -> anyhow::Result<String>;

    /// The trailing `max_bytes` of the log (the whole log when shorter).
    async fn read_tail(&self, max_bytes: u64) -> anyhow::Result<String>;

    /// Append one line (without trailing newline) to the log.
    async fn append(&self, line: &str) -> anyhow::Result<()>;
}
