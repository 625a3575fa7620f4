use chrono::{DateTime, Datelike, Duration, Utc};

/// Returns a human-readable label for the time elapsed since `t`.
///
/// Recent: "a second ago", "32 seconds ago", "an hour ago", "14 hours ago".
/// Yesterday: "yesterday at 5:22pm". This week: "Tuesday at 12:48am".
/// This year: "on Nov 17". Older: "on Jan 31, 2012".
pub fn humanize(t: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(t);

    // Creation times should never be in the future, but handle it gracefully.
    if diff < Duration::zero() {
        return "in the future".to_string();
    }

    if diff < Duration::hours(24) {
        if diff < Duration::seconds(1) {
            return "just now".to_string();
        }
        if diff < Duration::seconds(2) {
            return "a second ago".to_string();
        }
        if diff < Duration::minutes(1) {
            return format!("{} seconds ago", diff.num_seconds());
        }
        if diff < Duration::minutes(2) {
            return "a minute ago".to_string();
        }
        if diff < Duration::hours(1) {
            return format!("{} minutes ago", diff.num_minutes());
        }
        if diff < Duration::hours(2) {
            return "an hour ago".to_string();
        }
        return format!("{} hours ago", diff.num_hours());
    }

    let yesterday = (now - Duration::days(1)).date_naive();
    if t.date_naive() == yesterday {
        return format!("yesterday at {}", t.format("%-I:%M%P"));
    }

    if diff < Duration::days(7) {
        return format!("{} at {}", t.format("%A"), t.format("%-I:%M%P"));
    }

    if t.year() == now.year() {
        return format!("on {}", t.format("%b %d"));
    }

    format!("on {}", t.format("%b %d, %Y"))
}
