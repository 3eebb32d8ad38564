// Display-timezone adjustment for chart timestamps

use chrono::{DateTime, Local, Offset, TimeZone};

/// Seconds to add to a UTC timestamp so chart labels read in the display
/// zone. Computed from the local zone's offset at the given instant, so
/// daylight-saving transitions are picked up on the next request.
pub fn display_offset_secs(now: i64) -> i64 {
    match Local.timestamp_opt(now, 0) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
            offset_of(&dt)
        }
        chrono::LocalResult::None => 0,
    }
}

fn offset_of(dt: &DateTime<Local>) -> i64 {
    dt.offset().fix().local_minus_utc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_whole_minutes_and_sane() {
        let offset = display_offset_secs(1_700_000_000);
        assert_eq!(offset % 60, 0);
        // no real zone is more than 14h from UTC
        assert!(offset.abs() <= 14 * 3600);
    }
}
