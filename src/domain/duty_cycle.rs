// On/off duty-cycle detection over a thresholded signal

use crate::domain::sample::Series;

/// Values above this are "on". The source signal is a binary device sense
/// line, so the exact level between its two plateaus is not sensitive.
pub const ON_THRESHOLD: f64 = 10.5;

/// Seconds of zero-padding drawn around each transition so the interval
/// renders as a rectangular pulse.
const EDGE_PAD_SECS: i64 = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct DutyInterval {
    pub on_ts: i64,
    pub off_ts: i64,
    pub minutes: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DutyCycleReport {
    /// Plot points tracing rectangular pulses, one rectangle per closed
    /// interval. A trailing open interval contributes a single point.
    pub plot: Series,
    pub intervals: Vec<DutyInterval>,
    pub total_minutes_on: f64,
}

/// Scan a time-ascending signal for excursions above the threshold.
///
/// Each closed excursion emits four plot points: zero pads 120 s outside the
/// transitions and the interval duration (in minutes) at both edges. An
/// excursion still open at the end of the series is closed against the last
/// timestamp plus 120 s and emits only its opening point; the missing closing
/// rectangle matches long-standing rendering behavior.
pub fn detect(signal: &Series) -> DutyCycleReport {
    let mut report = DutyCycleReport::default();
    let mut on_ts: Option<i64> = None;

    for (ts, value) in signal.iter() {
        if value > ON_THRESHOLD {
            if on_ts.is_none() {
                on_ts = Some(ts);
            }
        } else if let Some(on) = on_ts.take() {
            let minutes = (ts - on) as f64 / 60.0;
            report.total_minutes_on += minutes;
            report.plot.push(on - EDGE_PAD_SECS, 0.0);
            report.plot.push(on, minutes);
            report.plot.push(ts, minutes);
            report.plot.push(ts + EDGE_PAD_SECS, 0.0);
            report.intervals.push(DutyInterval {
                on_ts: on,
                off_ts: ts,
                minutes,
            });
        }
    }

    if let Some(on) = on_ts {
        if let Some(last) = signal.last_timestamp() {
            let off = last + EDGE_PAD_SECS;
            let minutes = (off - on) as f64 / 60.0;
            report.total_minutes_on += minutes;
            report.plot.push(on, minutes);
            report.intervals.push(DutyInterval {
                on_ts: on,
                off_ts: off,
                minutes,
            });
        }
    }

    report
}

/// Gas burned while on, in therms, assuming a 65 kBTU/h burner.
pub fn therms(total_minutes_on: f64) -> f64 {
    (total_minutes_on / 60.0) * 65000.0 / 100000.0
}
