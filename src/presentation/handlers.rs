// HTTP request handlers
use crate::application::chart_service::epoch_now;
use crate::application::watchdog_service::SummaryEntry;
use crate::infrastructure::svg_chart;
use crate::presentation::app_state::AppState;
use crate::presentation::pages;
use axum::{
    extract::{Path, Query, RawQuery, State},
    response::Response,
};
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RangeQuery {
    /// Day window for charts, defaulting to one day.
    pub d: Option<i64>,
}

impl RangeQuery {
    fn days(&self) -> i64 {
        self.d.unwrap_or(1)
    }
}

/// Watchdog status summary. Rendering the page is also what drives overdue
/// detection: each request re-evaluates every watchdog and fires alerts.
pub async fn summary(State(state): State<Arc<AppState>>) -> Response {
    match state.watchdog_service.summary(epoch_now()).await {
        Ok(entries) => {
            let mut body = String::new();
            for entry in &entries {
                let _ = match entry {
                    SummaryEntry::Expired { name } => {
                        write!(body, "<div>{} expired</div>", pages::html_escape(name))
                    }
                    SummaryEntry::Fired { name } => {
                        write!(body, "<div>{} fired</div>", pages::html_escape(name))
                    }
                    SummaryEntry::Ok {
                        display_name,
                        elapsed_secs,
                        frequency_secs,
                    } => write!(
                        body,
                        "<div>{} OK ({}/{})</div>",
                        pages::html_escape(display_name),
                        elapsed_secs,
                        frequency_secs
                    ),
                };
            }
            if body.is_empty() {
                body = "Nothing to report.".to_string();
            }
            pages::msg_page("Uptime Status", &body, &[])
        }
        Err(e) => {
            tracing::error!("summary failed: {e:#}");
            pages::internal_error(&[format!("summary failed: {e:#}")])
        }
    }
}

/// Append a report line to the sample log. The whole remainder of the URL,
/// query string included, is the message.
pub async fn append_log(
    Path(msg): Path<String>,
    RawQuery(query): RawQuery,
    state: State<Arc<AppState>>,
) -> Response {
    let message = match query {
        Some(q) => format!("{msg}?{q}"),
        None => msg,
    };
    record_log_line(state, message).await
}

/// Same as `append_log` for a bare `/log` hit, where the report rides in
/// the query string alone.
pub async fn append_log_bare(
    RawQuery(query): RawQuery,
    state: State<Arc<AppState>>,
) -> Response {
    record_log_line(state, query.unwrap_or_default()).await
}

async fn record_log_line(State(state): State<Arc<AppState>>, message: String) -> Response {
    let decoded = urlencoding::decode(&message)
        .map(|c| c.into_owned())
        .unwrap_or(message);
    let line = format!("{}: {}", epoch_now(), decoded);
    match state.sample_log.append(&line).await {
        Ok(()) => pages::empty_ok(),
        Err(e) => {
            tracing::error!("log append failed: {e:#}");
            pages::internal_error(&[format!("log append failed: {e:#}")])
        }
    }
}

/// Index page with one chart per known metric.
pub async fn plot_index(
    Query(range): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let days = range.days();
    match state.chart_service.list_metrics().await {
        Ok(metrics) => {
            let mut body = String::new();
            for metric in &metrics {
                let mut path = format!("/plot/{metric}");
                if days != 1 {
                    let _ = write!(path, "?d={days}");
                }
                let name = pages::html_escape(metric);
                let _ = write!(
                    body,
                    "<div><h2>{name}</h2><div><a href=\"{path}\"><img src=\"{path}\" alt=\"{name}\"/></a></div></div>\n"
                );
            }
            pages::msg_page("Uptime Plots", &body, &[])
        }
        Err(e) => {
            tracing::error!("metric listing failed: {e:#}");
            pages::internal_error(&[format!("metric listing failed: {e:#}")])
        }
    }
}

/// Render one metric chart (or the derived usage chart) as SVG.
pub async fn plot_metric(
    Path(metric): Path<String>,
    Query(range): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let days = range.days();
    match state.chart_service.chart(&metric, days).await {
        Ok(Some(spec)) => pages::svg_response(svg_chart::render(&spec)),
        Ok(None) => pages::not_found(&[format!(
            "no samples for {metric} in the last {days} day(s)"
        )]),
        Err(e) => {
            tracing::error!("chart for {metric} failed: {e:#}");
            pages::internal_error(&[format!("chart for {metric} failed: {e:#}")])
        }
    }
}

/// Watchdog check-in. Unregistered names are thanked all the same.
pub async fn checkin(Path(name): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    match state.watchdog_service.checkin(&name, epoch_now()).await {
        Ok(_) => pages::msg_page(
            "Uptime",
            &format!("Thank you for reporting {}", pages::html_escape(&name)),
            &[],
        ),
        Err(e) => {
            tracing::error!("check-in for {name} failed: {e:#}");
            pages::internal_error(&[format!("check-in for {name} failed: {e:#}")])
        }
    }
}

pub async fn fallback() -> Response {
    pages::not_found(&[])
}
