//! Coarse human-readable "time ago" formatting.
//!
//! The bucket boundaries are deliberately uneven ("90 seconds ago" is still
//! seconds, a month is 30 days) and perform no timezone or leap-year
//! correction. Keep them as-is: downstream output is compared against these
//! exact phrases.

use chrono::{DateTime, Duration, Utc};

/// Formats the time elapsed since `t` as a short English phrase.
pub fn since(t: DateTime<Utc>) -> String {
    format_duration(Utc::now() - t)
}

/// Formats an elapsed duration as a short English phrase.
///
/// Negative durations (a timestamp ahead of our clock) render as
/// `"in the future"`.
pub fn format_duration(elapsed: Duration) -> String {
    if elapsed < Duration::zero() {
        return "in the future".to_string();
    }
    if elapsed < Duration::minutes(2) {
        return format!("{} seconds ago", elapsed.num_seconds());
    }
    if elapsed < Duration::hours(2) {
        return format!("{} minutes ago", elapsed.num_minutes());
    }
    if elapsed < Duration::hours(49) {
        return format!("{} hours ago", elapsed.num_hours());
    }

    let days = elapsed.num_hours() / 24;
    if days < 22 {
        format!("{days} days ago")
    } else if days < 62 {
        format!("{} weeks ago", days / 7)
    } else if days < 730 {
        format!("{} months ago", days / 30)
    } else {
        format!("{} years ago", days / 365)
    }
}
