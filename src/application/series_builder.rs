// Log-line parsing and per-metric series building
//
// The log is semi-structured: one line per report, a decimal timestamp
// followed by name=value tokens in arbitrary order. A scan walks the log
// once, in file order, collecting the requested metric, its server-side
// rolling average if present, and the tick counter used to estimate the real
// sampling interval.

use crate::domain::sample::Series;
use crate::domain::smoother::RunningAverage;

/// Window for smoothing the observed seconds-per-tick ratio.
const TICK_WINDOW: u32 = 10;

/// Result of one pass over the log for a single metric.
#[derive(Debug, Clone)]
pub struct MetricScan {
    pub primary: Series,
    pub average: Series,
    pub min: f64,
    pub max: f64,
    /// Estimated process uptime from the tick counter, 0 without ticks.
    pub uptime_secs: f64,
}

/// Scan the log for `metric`, keeping samples newer than `now - days*86400`.
/// Timestamps are shifted by `offset_secs` into the display zone as they are
/// collected. Lines are processed in file order so the series stay
/// time-ascending and tick deltas stay causally ordered.
pub fn scan(log: &str, metric: &str, days: i64, now: i64, offset_secs: i64) -> MetricScan {
    let average_name = format!("{metric}_ave");
    // the day window comes from an unauthenticated query parameter, so the
    // cutoff arithmetic must not overflow on absurd values
    let cutoff = now.saturating_sub(days.saturating_mul(86400));

    let mut primary = Series::new();
    let mut average = Series::new();
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut smoother = RunningAverage::new(TICK_WINDOW);
    let mut last_ts: i64 = 0;
    let mut last_tick: i64 = 0;

    for line in log.lines() {
        // Loose pre-filter: the strict token match below is the real gate,
        // this just skips the bulk of non-matching lines cheaply.
        if !line.contains(metric) {
            continue;
        }
        let mut tokens = tokenize(line);
        let ts = match tokens.next() {
            Some(first) => parse_i64_prefix(first),
            None => continue,
        };
        if ts < cutoff {
            continue;
        }
        let mut tick: i64 = 0;
        for token in tokens {
            let Some((name, value)) = match_pair(token, true) else {
                continue;
            };
            if name == "t" {
                tick = parse_i64_prefix(value);
                // tick counters only move forward; a stalled or rewound
                // counter would make the interval ratio meaningless
                if last_ts != 0 && tick > last_tick {
                    smoother.slide((ts - last_ts) as f64 / (tick - last_tick) as f64);
                }
            } else if name == metric {
                let v = parse_f64_prefix(value);
                if v < min {
                    min = v;
                }
                if v > max {
                    max = v;
                }
                primary.push(ts + offset_secs, v);
            } else if name == average_name {
                average.push(ts + offset_secs, parse_f64_prefix(value));
            }
        }
        if tick != 0 {
            last_ts = ts;
            last_tick = tick;
        }
    }

    MetricScan {
        primary,
        average,
        min,
        max,
        uptime_secs: last_tick as f64 * smoother.value,
    }
}

/// Metric names advertised on the chart index, taken from the newest tail
/// line that carries a tick token. Single-letter names and `*_ave`
/// companions are internal; a synthetic `usage` entry leads the list. An
/// empty result means the tail held no parseable report line.
pub fn list_metric_names(tail: &str) -> Vec<String> {
    let lines: Vec<&str> = tail.lines().collect();
    let line = lines
        .iter()
        .rev()
        .find(|l| l.contains(": t="))
        .or_else(|| lines.first())
        .copied()
        .unwrap_or("");

    let mut names = vec!["usage".to_string()];
    let mut found = false;
    for token in tokenize(line) {
        let Some((name, _)) = match_pair(token, false) else {
            continue;
        };
        found = true;
        if name.len() == 1 || name.ends_with("_ave") {
            continue;
        }
        names.push(name.to_string());
    }
    if !found {
        return Vec::new();
    }
    names
}

fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c.is_whitespace() || matches!(c, '&' | ',' | ';' | ':'))
        .filter(|t| !t.is_empty())
}

fn is_word(b: u8, allow_dot: bool) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || (allow_dot && b == b'.')
}

/// Leftmost `name=value` match inside a token, both sides restricted to
/// `[_.a-z0-9]` (`[_a-z0-9]` when `allow_dot` is false). Tokens with
/// unexpected leading or trailing characters still match on their inner run.
fn match_pair(token: &str, allow_dot: bool) -> Option<(&str, &str)> {
    let bytes = token.as_bytes();
    for i in 1..bytes.len().saturating_sub(1) {
        if bytes[i] != b'=' {
            continue;
        }
        if !is_word(bytes[i - 1], allow_dot) || !is_word(bytes[i + 1], allow_dot) {
            continue;
        }
        let mut start = i - 1;
        while start > 0 && is_word(bytes[start - 1], allow_dot) {
            start -= 1;
        }
        let mut end = i + 2;
        while end < bytes.len() && is_word(bytes[end], allow_dot) {
            end += 1;
        }
        return Some((&token[start..i], &token[i + 1..end]));
    }
    None
}

/// Longest numeric prefix as an integer, 0 when none. Matches the lenient
/// semantics log writers have always relied on.
fn parse_i64_prefix(s: &str) -> i64 {
    let end = s
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(s.len());
    s[..end].parse().unwrap_or(0)
}

/// Longest prefix parseable as a finite float, 0 when none. Rust's float
/// parser accepts `nan` and `inf` spellings, which fit the token character
/// class; those must not leak into a series and reorder median/stddev.
fn parse_f64_prefix(s: &str) -> f64 {
    for end in (1..=s.len()).rev() {
        if !s.is_char_boundary(end) {
            continue;
        }
        if let Ok(v) = s[..end].parse::<f64>() {
            if v.is_finite() {
                return v;
            }
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_collects_primary_and_average() {
        let log = "1000: t=5 temp=72.5 temp_ave=70.0\n";
        let result = scan(log, "temp", 1, 1000, 0);
        let primary: Vec<(i64, f64)> = result.primary.iter().collect();
        let average: Vec<(i64, f64)> = result.average.iter().collect();
        assert_eq!(primary, vec![(1000, 72.5)]);
        assert_eq!(average, vec![(1000, 70.0)]);
        assert_eq!(result.min, 72.5);
        assert_eq!(result.max, 72.5);
    }

    #[test]
    fn test_scan_applies_display_offset() {
        let log = "1000: temp=72.5\n";
        let result = scan(log, "temp", 1, 1000, -25200);
        assert_eq!(result.primary.timestamps, vec![1000 - 25200]);
    }

    #[test]
    fn test_scan_drops_lines_before_cutoff() {
        let now = 10 * 86400;
        let log = format!("{}: temp=1.0\n{}: temp=2.0\n", now - 2 * 86400, now - 3600);
        let result = scan(&log, "temp", 1, now, 0);
        assert_eq!(result.primary.values, vec![2.0]);
    }

    #[test]
    fn test_scan_empty_log_is_empty_series() {
        let result = scan("", "temp", 1, 1000, 0);
        assert!(result.primary.is_empty());
        assert!(result.average.is_empty());
        assert_eq!(result.uptime_secs, 0.0);
    }

    #[test]
    fn test_substring_metric_names_do_not_cross_match() {
        // "t" passes the loose line filter for any line containing the
        // letter, but the strict token match keeps temp out of t's series
        let log = "1000: t=5 temp=72.5\n";
        let result = scan(log, "temp", 1, 1000, 0);
        assert_eq!(result.primary.values, vec![72.5]);
        let result = scan(log, "emp", 1, 1000, 0);
        assert!(result.primary.is_empty());
    }

    #[test]
    fn test_scan_smooths_tick_interval() {
        // 60 seconds per 2 ticks -> 30 s/tick, last tick 9
        let log = "1000: t=5 temp=1.0\n1060: t=7 temp=2.0\n1120: t=9 temp=3.0\n";
        let result = scan(log, "temp", 1, 1200, 0);
        assert!((result.uptime_secs - 9.0 * 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_scan_skips_stalled_tick() {
        let log = "1000: t=5 temp=1.0\n1060: t=5 temp=2.0\n";
        let result = scan(log, "temp", 1, 1200, 0);
        // no slide happened, smoother still at zero
        assert_eq!(result.uptime_secs, 0.0);
    }

    #[test]
    fn test_scan_tolerates_mixed_delimiters_and_junk() {
        let log = "1000: a&temp=3.5,other=1;x\n";
        let result = scan(log, "temp", 1, 1000, 0);
        assert_eq!(result.primary.values, vec![3.5]);
    }

    #[test]
    fn test_match_pair_inner_run() {
        assert_eq!(match_pair("temp=72.5", true), Some(("temp", "72.5")));
        assert_eq!(match_pair("#temp=5", true), Some(("temp", "5")));
        assert_eq!(match_pair("noequals", true), None);
        assert_eq!(match_pair("=5", true), None);
        // dots only count as word characters when allowed
        assert_eq!(match_pair("a.b=1.5", false), Some(("b", "1")));
    }

    #[test]
    fn test_scan_survives_huge_day_window() {
        // the window multiplication saturates instead of overflowing on a
        // hostile ?d= value, and the cutoff still admits old samples
        let result = scan("1000: temp=70\n", "temp", i64::MAX, 1_700_000_000, 0);
        assert_eq!(result.primary.values, vec![70.0]);
        let result = scan("1000: temp=70\n", "temp", i64::MIN, 1_700_000_000, 0);
        assert!(result.primary.is_empty());
    }

    #[test]
    fn test_prefix_parsers_are_lenient() {
        assert_eq!(parse_i64_prefix("1234x"), 1234);
        assert_eq!(parse_i64_prefix("junk"), 0);
        assert_eq!(parse_f64_prefix("10.5.3"), 10.5);
        assert_eq!(parse_f64_prefix("nope"), 0.0);
        assert_eq!(parse_f64_prefix(".5"), 0.5);
    }

    #[test]
    fn test_non_finite_spellings_parse_to_zero() {
        assert_eq!(parse_f64_prefix("nan"), 0.0);
        assert_eq!(parse_f64_prefix("inf"), 0.0);
        // a poisoned token contributes 0 instead of NaN, so ordering-based
        // statistics over the series stay meaningful
        let result = scan("1000: temp=nan\n", "temp", 1, 1000, 0);
        assert_eq!(result.primary.values, vec![0.0]);
    }

    #[test]
    fn test_list_metric_names_filters_and_prefixes_usage() {
        let tail = "900: t=1 temp=70 flame_v=12 flame_v_ave=11\n1000: garbage\n";
        let names = list_metric_names(tail);
        assert_eq!(names, vec!["usage", "temp", "flame_v"]);
    }

    #[test]
    fn test_list_metric_names_empty_without_report_line() {
        assert!(list_metric_names("no reports here\n").is_empty());
        assert!(list_metric_names("").is_empty());
    }

    #[test]
    fn test_list_metric_names_uses_newest_tick_line() {
        let tail = "900: t=1 old_metric=1\n1000: t=2 new_metric=2\n";
        let names = list_metric_names(tail);
        assert_eq!(names, vec!["usage", "new_metric"]);
    }
}
