// Watchdog registry domain model

use serde::{Deserialize, Serialize};

/// A named timer that expects a check-in at least every `frequency_secs`.
/// `last_timestamp == 0` marks a watchdog whose alert already fired; it stays
/// expired until the next check-in revives it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Watchdog {
    pub name: String,
    pub frequency_secs: i64,
    #[serde(default)]
    pub last_timestamp: i64,
    pub sms_number: String,
    pub timeout_msg: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WatchdogState {
    /// Alert already sent; waiting for the process to come back.
    Expired,
    /// Overdue as of this evaluation; an alert should be sent now.
    Fired,
    /// Checked in within the window; elapsed seconds since last check-in.
    Ok { elapsed_secs: i64 },
}

impl Watchdog {
    pub fn evaluate(&self, now: i64) -> WatchdogState {
        if self.last_timestamp == 0 {
            WatchdogState::Expired
        } else if now > self.last_timestamp + self.frequency_secs {
            WatchdogState::Fired
        } else {
            WatchdogState::Ok {
                elapsed_secs: now - self.last_timestamp,
            }
        }
    }

    /// Human form of the name: separators become spaces.
    pub fn display_name(&self) -> String {
        self.name.replace(['-', '_'], " ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watchdog(last: i64, freq: i64) -> Watchdog {
        Watchdog {
            name: "pump-house_sensor".to_string(),
            frequency_secs: freq,
            last_timestamp: last,
            sms_number: "+15005550006".to_string(),
            timeout_msg: "pump house is down".to_string(),
        }
    }

    #[test]
    fn test_expired_when_timestamp_cleared() {
        assert_eq!(watchdog(0, 600).evaluate(1000), WatchdogState::Expired);
    }

    #[test]
    fn test_fires_when_overdue() {
        assert_eq!(watchdog(100, 600).evaluate(701), WatchdogState::Fired);
    }

    #[test]
    fn test_ok_within_window() {
        assert_eq!(
            watchdog(100, 600).evaluate(700),
            WatchdogState::Ok { elapsed_secs: 600 }
        );
    }

    #[test]
    fn test_display_name_replaces_separators() {
        assert_eq!(watchdog(0, 1).display_name(), "pump house sensor");
    }
}
