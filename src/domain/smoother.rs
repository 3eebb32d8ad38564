// Bounded-window running average for tick-interval smoothing

/// Windowed mean with exponential tail: once `count` saturates at the window
/// size, each new value is folded in with weight 1/window and older values
/// are down-weighted rather than evicted.
#[derive(Debug, Clone)]
pub struct RunningAverage {
    window: u32,
    count: u32,
    pub value: f64,
}

impl RunningAverage {
    pub fn new(window: u32) -> Self {
        Self {
            window,
            count: 0,
            value: 0.0,
        }
    }

    pub fn slide(&mut self, new_value: f64) {
        let prev = if self.count == self.window {
            self.window - 1
        } else {
            self.count
        };
        self.count = prev + 1;
        self.value = (prev as f64 * self.value + new_value) / self.count as f64;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Render an uptime in seconds as a coarse human unit. Durations below
/// 90 seconds stay in raw seconds.
pub fn format_uptime(seconds: f64) -> String {
    if seconds > 86400.0 {
        format!("{}d", (seconds / 86400.0).round() as i64)
    } else if seconds > 1.5 * 3600.0 {
        format!("{}h", (seconds / 3600.0).round() as i64)
    } else if seconds > 1.5 * 60.0 {
        format!("{}m", (seconds / 60.0).round() as i64)
    } else {
        format!("{}", seconds)
    }
}
