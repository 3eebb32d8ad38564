// Watchdog service - Use cases for the summary page and check-ins
use crate::application::notifier::Notifier;
use crate::application::watchdog_repository::WatchdogRepository;
use crate::domain::watchdog::WatchdogState;
use std::sync::Arc;

/// One row of the status summary.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryEntry {
    /// Alerted earlier, still silent.
    Expired { name: String },
    /// Went overdue during this evaluation; the alert was sent just now.
    Fired { name: String },
    Ok {
        display_name: String,
        elapsed_secs: i64,
        frequency_secs: i64,
    },
}

#[derive(Clone)]
pub struct WatchdogService {
    repository: Arc<dyn WatchdogRepository>,
    notifier: Arc<dyn Notifier>,
}

impl WatchdogService {
    pub fn new(repository: Arc<dyn WatchdogRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Evaluate every watchdog against `now`. Overdue watchdogs alert once:
    /// the SMS goes out, the timestamp is cleared, and until the process
    /// checks in again the watchdog reports as expired instead of re-firing.
    pub async fn summary(&self, now: i64) -> anyhow::Result<Vec<SummaryEntry>> {
        let mut entries = Vec::new();
        for watchdog in self.repository.list().await? {
            match watchdog.evaluate(now) {
                WatchdogState::Expired => {
                    entries.push(SummaryEntry::Expired {
                        name: watchdog.name.clone(),
                    });
                }
                WatchdogState::Fired => {
                    if let Err(e) = self
                        .notifier
                        .send(&watchdog.sms_number, &watchdog.timeout_msg)
                        .await
                    {
                        // delivery is best-effort, the state change still
                        // records that the watchdog went overdue
                        tracing::error!("alert delivery failed for {}: {e:#}", watchdog.name);
                    }
                    self.repository.mark_fired(&watchdog.name).await?;
                    entries.push(SummaryEntry::Fired {
                        name: watchdog.name.clone(),
                    });
                }
                WatchdogState::Ok { elapsed_secs } => {
                    entries.push(SummaryEntry::Ok {
                        display_name: watchdog.display_name(),
                        elapsed_secs,
                        frequency_secs: watchdog.frequency_secs,
                    });
                }
            }
        }
        Ok(entries)
    }

    /// Record a check-in. Unknown names are acknowledged without effect so
    /// reporters never see an error for a registry mismatch.
    pub async fn checkin(&self, name: &str, now: i64) -> anyhow::Result<bool> {
        let found = self.repository.record_checkin(name, now).await?;
        if !found {
            tracing::debug!("check-in from unregistered watchdog {name}");
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::watchdog::Watchdog;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryRegistry {
        watchdogs: Mutex<Vec<Watchdog>>,
    }

    #[async_trait]
    impl WatchdogRepository for MemoryRegistry {
        async fn list(&self) -> anyhow::Result<Vec<Watchdog>> {
            Ok(self.watchdogs.lock().unwrap().clone())
        }
        async fn record_checkin(&self, name: &str, timestamp: i64) -> anyhow::Result<bool> {
            let mut dogs = self.watchdogs.lock().unwrap();
            match dogs.iter_mut().find(|w| w.name == name) {
                Some(w) => {
                    w.last_timestamp = timestamp;
                    Ok(true)
                }
                None => Ok(false),
            }
        }
        async fn mark_fired(&self, name: &str) -> anyhow::Result<()> {
            let mut dogs = self.watchdogs.lock().unwrap();
            if let Some(w) = dogs.iter_mut().find(|w| w.name == name) {
                w.last_timestamp = 0;
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, to: &str, message: &str) -> anyhow::Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), message.to_string()));
            Ok(())
        }
    }

    fn watchdog(name: &str, last: i64, freq: i64) -> Watchdog {
        Watchdog {
            name: name.to_string(),
            frequency_secs: freq,
            last_timestamp: last,
            sms_number: "+15005550006".to_string(),
            timeout_msg: format!("{name} is down"),
        }
    }

    #[tokio::test]
    async fn test_overdue_watchdog_alerts_once() {
        let registry = Arc::new(MemoryRegistry::default());
        registry
            .watchdogs
            .lock()
            .unwrap()
            .push(watchdog("boiler", 100, 60));
        let notifier = Arc::new(RecordingNotifier::default());
        let service = WatchdogService::new(registry.clone(), notifier.clone());

        let entries = service.summary(1000).await.unwrap();
        assert_eq!(
            entries,
            vec![SummaryEntry::Fired {
                name: "boiler".to_string()
            }]
        );
        assert_eq!(
            notifier.sent.lock().unwrap().as_slice(),
            &[("+15005550006".to_string(), "boiler is down".to_string())]
        );

        // second evaluation: timestamp cleared, no second alert
        let entries = service.summary(1000).await.unwrap();
        assert_eq!(
            entries,
            vec![SummaryEntry::Expired {
                name: "boiler".to_string()
            }]
        );
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_healthy_watchdog_reports_elapsed() {
        let registry = Arc::new(MemoryRegistry::default());
        registry
            .watchdogs
            .lock()
            .unwrap()
            .push(watchdog("pump_house", 900, 600));
        let service = WatchdogService::new(registry, Arc::new(RecordingNotifier::default()));

        let entries = service.summary(1000).await.unwrap();
        assert_eq!(
            entries,
            vec![SummaryEntry::Ok {
                display_name: "pump house".to_string(),
                elapsed_secs: 100,
                frequency_secs: 600,
            }]
        );
    }

    #[tokio::test]
    async fn test_checkin_revives_expired_watchdog() {
        let registry = Arc::new(MemoryRegistry::default());
        registry
            .watchdogs
            .lock()
            .unwrap()
            .push(watchdog("boiler", 0, 60));
        let service = WatchdogService::new(registry.clone(), Arc::new(RecordingNotifier::default()));

        assert!(service.checkin("boiler", 2000).await.unwrap());
        let entries = service.summary(2010).await.unwrap();
        assert!(matches!(entries[0], SummaryEntry::Ok { .. }));
    }

    #[tokio::test]
    async fn test_checkin_unknown_name_is_acknowledged() {
        let registry = Arc::new(MemoryRegistry::default());
        let service = WatchdogService::new(registry, Arc::new(RecordingNotifier::default()));
        assert!(!service.checkin("ghost", 2000).await.unwrap());
    }
}
