// JSON-file watchdog registry
use crate::application::watchdog_repository::WatchdogRepository;
use crate::domain::watchdog::Watchdog;
use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Registry persisted as a JSON array in the data directory. The file is
/// edited by hand to register watchdogs; the service only updates
/// `last_timestamp`. Writes go through one mutex, so concurrent requests
/// can't interleave read-modify-write cycles within this process.
pub struct JsonWatchdogStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonWatchdogStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("watchdogs.json"),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> anyhow::Result<Vec<Watchdog>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("malformed registry {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", self.path.display())),
        }
    }

    async fn save(&self, watchdogs: &[Watchdog]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let text = serde_json::to_string_pretty(watchdogs)?;
        tokio::fs::write(&self.path, text)
            .await
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    async fn update<F>(&self, name: &str, apply: F) -> anyhow::Result<bool>
    where
        F: FnOnce(&mut Watchdog),
    {
        let _guard = self.lock.lock().await;
        let mut watchdogs = self.load().await?;
        let Some(watchdog) = watchdogs.iter_mut().find(|w| w.name == name) else {
            return Ok(false);
        };
        apply(watchdog);
        self.save(&watchdogs).await?;
        Ok(true)
    }
}

#[async_trait]
impl WatchdogRepository for JsonWatchdogStore {
    async fn list(&self) -> anyhow::Result<Vec<Watchdog>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    async fn record_checkin(&self, name: &str, timestamp: i64) -> anyhow::Result<bool> {
        self.update(name, |w| w.last_timestamp = timestamp).await
    }

    async fn mark_fired(&self, name: &str) -> anyhow::Result<()> {
        self.update(name, |w| w.last_timestamp = 0).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn watchdog(name: &str) -> Watchdog {
        Watchdog {
            name: name.to_string(),
            frequency_secs: 600,
            last_timestamp: 100,
            sms_number: "+15005550006".to_string(),
            timeout_msg: "down".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_registry() {
        let dir = TempDir::new().unwrap();
        let store = JsonWatchdogStore::new(dir.path());
        assert!(store.list().await.unwrap().is_empty());
        assert!(!store.record_checkin("ghost", 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_checkin_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let store = JsonWatchdogStore::new(dir.path());
        store.save(&[watchdog("boiler")]).await.unwrap();

        assert!(store.record_checkin("boiler", 5000).await.unwrap());

        // a fresh store reads the updated timestamp back from disk
        let reread = JsonWatchdogStore::new(dir.path());
        let dogs = reread.list().await.unwrap();
        assert_eq!(dogs.len(), 1);
        assert_eq!(dogs[0].last_timestamp, 5000);
    }

    #[tokio::test]
    async fn test_mark_fired_clears_timestamp() {
        let dir = TempDir::new().unwrap();
        let store = JsonWatchdogStore::new(dir.path());
        store.save(&[watchdog("boiler")]).await.unwrap();

        store.mark_fired("boiler").await.unwrap();
        assert_eq!(store.list().await.unwrap()[0].last_timestamp, 0);
    }
}
