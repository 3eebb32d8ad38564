// Chart service - Use cases for metric and usage charts
use crate::application::sample_log::SampleLog;
use crate::application::series_builder::{self, MetricScan};
use crate::domain::chart::ChartSpec;
use crate::domain::clock::display_offset_secs;
use crate::domain::duty_cycle;
use crate::domain::smoother::format_uptime;
use crate::domain::stats;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Bytes of log tail scanned when listing chartable metric names.
const METRIC_LIST_TAIL_BYTES: u64 = 1000;

/// Synthetic chart derived from the duty-cycle detector rather than a
/// logged metric.
pub const USAGE_CHART: &str = "usage";

#[derive(Clone)]
pub struct ChartService {
    log: Arc<dyn SampleLog>,
    /// Signal scanned for on/off excursions on the usage chart.
    usage_metric: String,
    /// Fixed display offset override; otherwise the server's local zone.
    offset_override: Option<i64>,
}

impl ChartService {
    pub fn new(log: Arc<dyn SampleLog>, usage_metric: String, offset_override: Option<i64>) -> Self {
        Self {
            log,
            usage_metric,
            offset_override,
        }
    }

    /// Render the chart for `metric` over the last `days` days. `Ok(None)`
    /// means no samples survived the window filter.
    pub async fn chart(&self, metric: &str, days: i64) -> anyhow::Result<Option<ChartSpec>> {
        if metric == USAGE_CHART {
            return self.usage_chart(days).await;
        }
        let scan = self.scan(metric, days).await?;
        if scan.primary.is_empty() {
            return Ok(None);
        }

        let median = stats::median(&scan.primary.values);
        let sd = stats::stddev(&scan.primary.values);
        let mut primary = scan.primary;
        let scaled = if stats::compress_outliers(&mut primary.values) {
            "scaled, "
        } else {
            ""
        };

        let title_lines = vec![
            format!("{} over time; [{}..{}]", metric, scan.min, scan.max),
            format!("Uptime: {}", format_uptime(scan.uptime_secs)),
            format!("{}median: {}, stddev: {}", scaled, median, sd),
        ];
        Ok(Some(ChartSpec {
            title_lines,
            x_label: "time".to_string(),
            y_label: metric.to_string(),
            primary,
            secondary: (!scan.average.is_empty()).then_some(scan.average),
        }))
    }

    /// Derived duty-cycle view: the raw usage signal overlaid with the
    /// rectangular on-intervals the detector found.
    async fn usage_chart(&self, days: i64) -> anyhow::Result<Option<ChartSpec>> {
        let scan = self.scan(&self.usage_metric, days).await?;
        if scan.primary.is_empty() {
            return Ok(None);
        }
        let report = duty_cycle::detect(&scan.primary);
        let therms = duty_cycle::therms(report.total_minutes_on);

        let title_lines = vec![
            format!("WH usage over time: last {} days", days),
            format!("{:.2} minutes ({:.3} therms)", report.total_minutes_on, therms),
        ];
        Ok(Some(ChartSpec {
            title_lines,
            x_label: "time".to_string(),
            y_label: self.usage_metric.clone(),
            primary: scan.primary,
            secondary: Some(report.plot),
        }))
    }

    /// Metric names for the chart index, from the newest report line in the
    /// log tail.
    pub async fn list_metrics(&self) -> anyhow::Result<Vec<String>> {
        let tail = self.log.read_tail(METRIC_LIST_TAIL_BYTES).await?;
        Ok(series_builder::list_metric_names(&tail))
    }

    async fn scan(&self, metric: &str, days: i64) -> anyhow::Result<MetricScan> {
        let log = self.log.read_full().await?;
        let now = epoch_now();
        let offset = self
            .offset_override
            .unwrap_or_else(|| display_offset_secs(now));
        Ok(series_builder::scan(&log, metric, days, now, offset))
    }
}

pub fn epoch_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedLog(String);

    #[async_trait]
    impl SampleLog for FixedLog {
        async fn read_full(&self) -> anyhow::Result<String> {
            Ok(self.0.clone())
        }
        async fn read_tail(&self, max_bytes: u64) -> anyhow::Result<String> {
            let start = self.0.len().saturating_sub(max_bytes as usize);
            Ok(self.0[start..].to_string())
        }
        async fn append(&self, _line: &str) -> anyhow::Result<()> {
            unimplemented!("read-only test log")
        }
    }

    fn service(log: &str) -> ChartService {
        ChartService::new(
            Arc::new(FixedLog(log.to_string())),
            "flame_v_ave".to_string(),
            Some(0),
        )
    }

    #[tokio::test]
    async fn test_chart_not_found_on_empty_window() {
        // timestamps far in the past relative to the real clock
        let svc = service("1000: temp=70\n");
        let chart = svc.chart("temp", 1).await.unwrap();
        assert!(chart.is_none());
    }

    #[tokio::test]
    async fn test_chart_includes_secondary_when_average_present() {
        let now = epoch_now();
        let log = format!("{now}: t=5 temp=70 temp_ave=69\n");
        let chart = service(&log).chart("temp", 1).await.unwrap().unwrap();
        assert!(chart.secondary.is_some());
        assert_eq!(chart.primary_color(), "grey");
        assert_eq!(chart.y_label, "temp");
        assert!(chart.title_lines[0].starts_with("temp over time"));
    }

    #[tokio::test]
    async fn test_chart_black_without_average() {
        let now = epoch_now();
        let log = format!("{now}: temp=70\n");
        let chart = service(&log).chart("temp", 1).await.unwrap().unwrap();
        assert!(chart.secondary.is_none());
        assert_eq!(chart.primary_color(), "black");
    }

    #[tokio::test]
    async fn test_usage_chart_reports_minutes_and_therms() {
        let now = epoch_now();
        let log = format!(
            "{}: flame_v_ave=5\n{}: flame_v_ave=11\n{}: flame_v_ave=11\n{}: flame_v_ave=5\n",
            now - 360,
            now - 300,
            now - 240,
            now - 180,
        );
        let chart = service(&log).chart("usage", 1).await.unwrap().unwrap();
        // one closed interval of 2 minutes
        assert!(chart.title_lines[1].starts_with("2.00 minutes"));
        assert!(chart.secondary.is_some());
    }

    #[tokio::test]
    async fn test_list_metrics_reads_tail() {
        let now = epoch_now();
        let log = format!("{now}: t=3 temp=70 hum=40\n");
        let names = service(&log).list_metrics().await.unwrap();
        assert_eq!(names, vec!["usage", "temp", "hum"]);
    }
}
