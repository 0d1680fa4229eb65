//! Human-readable time labels for dashboards.
//!
//! Both helpers take "now" explicitly so callers (and tests) decide the clock.

use chrono::{Duration, NaiveDateTime};

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {} ago", count, unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

/// Relative label for an elapsed duration: "2 years ago", "1 month ago",
/// "3 days ago", "5 hours ago", "1 minute ago" or "just now".
///
/// Months are 30 days and years 365 days.
pub fn format_time_ago(elapsed: Duration) -> String {
    let days = elapsed.num_days();

    if days >= 365 {
        return plural(days / 365, "year");
    }
    if days >= 30 {
        return plural(days / 30, "month");
    }
    if days >= 1 {
        return plural(days, "day");
    }
    if elapsed.num_hours() >= 1 {
        return plural(elapsed.num_hours(), "hour");
    }
    if elapsed.num_minutes() >= 1 {
        return plural(elapsed.num_minutes(), "minute");
    }
    "just now".to_string()
}

/// Label for an activity feed entry.
pub fn format_activity_time(time: NaiveDateTime, now: NaiveDateTime) -> String {
    let elapsed = now - time;

    if elapsed < Duration::minutes(1) {
        return "Just now".to_string();
    }
    if elapsed < Duration::hours(1) {
        return format!("{} minutes ago", elapsed.num_minutes());
    }
    if elapsed < Duration::days(1) {
        return format!("Today, {}", time.format("%I:%M %p"));
    }
    if elapsed < Duration::days(2) {
        return format!("Yesterday, {}", time.format("%I:%M %p"));
    }
    if elapsed < Duration::days(7) {
        return format!("{} days ago", elapsed.num_days());
    }
    time.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_format_time_ago() {
        assert_eq!(format_time_ago(Duration::seconds(30)), "just now");
        assert_eq!(format_time_ago(Duration::minutes(1)), "1 minute ago");
        assert_eq!(format_time_ago(Duration::minutes(45)), "45 minutes ago");
        assert_eq!(format_time_ago(Duration::hours(1)), "1 hour ago");
        assert_eq!(format_time_ago(Duration::hours(23)), "23 hours ago");
        assert_eq!(format_time_ago(Duration::days(1)), "1 day ago");
        assert_eq!(format_time_ago(Duration::days(29)), "29 days ago");
        assert_eq!(format_time_ago(Duration::days(30)), "1 month ago");
        assert_eq!(format_time_ago(Duration::days(95)), "3 months ago");
        assert_eq!(format_time_ago(Duration::days(365)), "1 year ago");
        assert_eq!(format_time_ago(Duration::days(800)), "2 years ago");
    }

    #[test]
    fn test_format_activity_time() {
        let now = at(10, 15, 30);

        assert_eq!(format_activity_time(at(10, 15, 30), now), "Just now");
        assert_eq!(format_activity_time(at(10, 15, 0), now), "30 minutes ago");
        assert_eq!(format_activity_time(at(10, 9, 5), now), "Today, 09:05 AM");
        assert_eq!(format_activity_time(at(9, 14, 0), now), "Yesterday, 02:00 PM");
        assert_eq!(format_activity_time(at(6, 12, 0), now), "4 days ago");
        assert_eq!(format_activity_time(at(1, 8, 0), now), "May 1, 2024");
    }
}
