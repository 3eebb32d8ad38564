// Series domain model

/// An aligned pair of timestamp/value sequences for one metric, in log order.
/// Observations are derived from log lines on the fly and never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub timestamps: Vec<i64>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, timestamp: i64, value: f64) {
        self.timestamps.push(timestamp);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.timestamps.last().copied()
    }

    /// Iterate (timestamp, value) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter().copied())
    }
}

impl FromIterator<(i64, f64)> for Series {
    fn from_iter<I: IntoIterator<Item = (i64, f64)>>(iter: I) -> Self {
        let mut series = Series::new();
        for (ts, v) in iter {
            series.push(ts, v);
        }
        series
    }
}
