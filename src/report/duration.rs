const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const WEEK: i64 = 604_800;
/// Average Gregorian month (30.44 days).
const MONTH: i64 = 2_629_743;

/// Render a duration in its largest fitting unit, truncating the remainder.
///
/// Each threshold is an exclusive upper bound, so exactly 60 seconds is
/// "1 minutes". Unit names are always plural. Negative durations fall into
/// the seconds bucket.
pub fn convert_seconds_to_readable(seconds: i64) -> String {
    if seconds < MINUTE {
        format!("{} seconds", seconds)
    } else if seconds < HOUR {
        format!("{} minutes", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{} hours", seconds / HOUR)
    } else if seconds < WEEK {
        format!("{} days", seconds / DAY)
    } else if seconds < MONTH {
        format!("{} weeks", seconds / WEEK)
    } else {
        format!("{} months", seconds / MONTH)
    }
}
