// Two-series line chart rendered as SVG
//
// Layout mirrors the classic uptime plots: 1600x600 canvas, solid vertical
// grid on 30-minute-aligned time ticks, x labels rotated 60 degrees, title
// block across the top.

use crate::domain::chart::ChartSpec;
use crate::domain::sample::Series;
use chrono::DateTime;
use std::fmt::Write;

const WIDTH: f64 = 1600.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 80.0;
const MARGIN_BOTTOM: f64 = 110.0;

/// Time ticks snap to 30-minute boundaries.
const TICK_ALIGN_SECS: i64 = 1800;
const MAX_X_TICKS: i64 = 12;
const Y_DIVISIONS: usize = 6;

pub fn render(spec: &ChartSpec) -> String {
    let (x_min, x_max) = time_range(spec);
    let (y_min, y_max) = value_range(spec);

    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let map_x = |ts: i64| MARGIN_LEFT + (ts - x_min) as f64 / (x_max - x_min) as f64 * plot_w;
    let map_y = |v: f64| MARGIN_TOP + (y_max - v) / (y_max - y_min) * plot_h;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = write!(svg, r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#);

    for (i, line) in spec.title_lines.iter().enumerate() {
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="16" text-anchor="middle">{}</text>"#,
            WIDTH / 2.0,
            24.0 + 18.0 * i as f64,
            xml_escape(line)
        );
    }

    // vertical grid and rotated time labels on aligned ticks
    for tick in x_ticks(x_min, x_max) {
        let x = map_x(tick);
        let _ = write!(
            svg,
            r#"<line x1="{x:.1}" y1="{MARGIN_TOP:.1}" x2="{x:.1}" y2="{:.1}" stroke="lightgrey" stroke-width="1"/>"#,
            MARGIN_TOP + plot_h
        );
        let label = DateTime::from_timestamp(tick, 0)
            .map(|dt| dt.format("%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let y = MARGIN_TOP + plot_h + 14.0;
        let _ = write!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" font-size="12" transform="rotate(60 {x:.1} {y:.1})">{}</text>"#,
            xml_escape(&label)
        );
    }

    // horizontal ticks with value labels
    for i in 0..=Y_DIVISIONS {
        let v = y_min + (y_max - y_min) * i as f64 / Y_DIVISIONS as f64;
        let y = map_y(v);
        let _ = write!(
            svg,
            r#"<line x1="{:.1}" y1="{y:.1}" x2="{MARGIN_LEFT:.1}" y2="{y:.1}" stroke="black" stroke-width="1"/>"#,
            MARGIN_LEFT - 5.0
        );
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 8.0,
            y + 4.0,
            xml_escape(&format_value(v))
        );
    }

    // axes
    let _ = write!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{:.1}" stroke="black" stroke-width="1"/>"#,
        MARGIN_TOP + plot_h
    );
    let _ = write!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black" stroke-width="1"/>"#,
        MARGIN_TOP + plot_h,
        MARGIN_LEFT + plot_w,
        MARGIN_TOP + plot_h
    );

    // axis titles
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="14" text-anchor="middle">{}</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 10.0,
        xml_escape(&spec.x_label)
    );
    let _ = write!(
        svg,
        r#"<text x="20" y="{:.1}" font-size="14" text-anchor="middle" transform="rotate(-90 20 {:.1})">{}</text>"#,
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0,
        xml_escape(&spec.y_label)
    );

    write_polyline(&mut svg, &spec.primary, spec.primary_color(), &map_x, &map_y);
    if let Some(secondary) = &spec.secondary {
        write_polyline(&mut svg, secondary, "black", &map_x, &map_y);
    }

    svg.push_str("</svg>");
    svg
}

fn write_polyline(
    svg: &mut String,
    series: &Series,
    color: &str,
    map_x: &impl Fn(i64) -> f64,
    map_y: &impl Fn(f64) -> f64,
) {
    if series.is_empty() {
        return;
    }
    let mut points = String::new();
    for (ts, v) in series.iter() {
        let _ = write!(points, "{:.1},{:.1} ", map_x(ts), map_y(v));
    }
    let _ = write!(
        svg,
        r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" points="{}"/>"#,
        points.trim_end()
    );
}

fn time_range(spec: &ChartSpec) -> (i64, i64) {
    let mut min = i64::MAX;
    let mut max = i64::MIN;
    for series in std::iter::once(&spec.primary).chain(spec.secondary.as_ref()) {
        for &ts in &series.timestamps {
            min = min.min(ts);
            max = max.max(ts);
        }
    }
    if min > max {
        return (0, 1);
    }
    if min == max {
        // single sample: give the axis something to span
        (min - TICK_ALIGN_SECS, max + TICK_ALIGN_SECS)
    } else {
        (min, max)
    }
}

fn value_range(spec: &ChartSpec) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for series in std::iter::once(&spec.primary).chain(spec.secondary.as_ref()) {
        for &v in &series.values {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min > max {
        return (0.0, 1.0);
    }
    let pad = if min == max { 1.0 } else { (max - min) * 0.05 };
    (min - pad, max + pad)
}

fn x_ticks(x_min: i64, x_max: i64) -> Vec<i64> {
    let range = x_max - x_min;
    let step = TICK_ALIGN_SECS * ((range / (TICK_ALIGN_SECS * MAX_X_TICKS)).max(0) + 1);
    let first = x_min.div_euclid(TICK_ALIGN_SECS) * TICK_ALIGN_SECS;
    let first = if first < x_min { first + TICK_ALIGN_SECS } else { first };
    let mut ticks = Vec::new();
    let mut tick = first;
    while tick <= x_max {
        ticks.push(tick);
        tick += step;
    }
    ticks
}

fn format_value(v: f64) -> String {
    let text = format!("{v:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
