use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// A recognized version filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionFilter {
    /// Versions created strictly before `now - N days`.
    OlderThanDays(u32),
    /// Versions created strictly before the given instant (UTC).
    Before(NaiveDateTime),
}

impl VersionFilter {
    /// Resolves the filter to a concrete cutoff instant.
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::OlderThanDays(days) => now - Duration::days(i64::from(days)),
            Self::Before(instant) => instant.and_utc(),
        }
    }

    pub fn matches(self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        created_at < self.cutoff(now)
    }
}

/// Parses the filter DSL: `older <N>` or `before <YYYY-MM-DD>[THH:MM]`.
/// A leading `:` (the key that opened filter entry) is stripped first.
/// Returns `None` for empty or unrecognized input.
pub fn parse(raw: &str) -> Option<VersionFilter> {
    let text = raw.trim();
    let text = text.strip_prefix(':').unwrap_or(text);

    let mut parts = text.split_whitespace();
    let keyword = parts.next()?;
    let arg = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    match keyword {
        "older" => {
            if !arg.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            arg.parse().ok().map(VersionFilter::OlderThanDays)
        }
        "before" => parse_instant(arg).map(VersionFilter::Before),
        _ => None,
    }
}

fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_older_days() {
        assert_eq!(parse("older 10"), Some(VersionFilter::OlderThanDays(10)));
    }

    #[test]
    fn parse_older_with_marker_prefix() {
        assert_eq!(parse(":older 10"), Some(VersionFilter::OlderThanDays(10)));
    }

    #[test]
    fn parse_older_zero_days() {
        assert_eq!(parse("older 0"), Some(VersionFilter::OlderThanDays(0)));
    }

    #[test]
    fn parse_older_rejects_negative() {
        assert_eq!(parse("older -5"), None);
    }

    #[test]
    fn parse_older_rejects_non_numeric() {
        assert_eq!(parse("older ten"), None);
    }

    #[test]
    fn parse_older_rejects_trailing_tokens() {
        assert_eq!(parse("older 10 days"), None);
    }

    #[test]
    fn parse_before_date_only() {
        let expected = NaiveDate::from_ymd_opt(2024, 4, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(parse("before 2024-04-01"), Some(VersionFilter::Before(expected)));
    }

    #[test]
    fn parse_before_date_time() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(
            parse("before 2024-01-15T12:00"),
            Some(VersionFilter::Before(expected))
        );
    }

    #[test]
    fn parse_before_rejects_garbage_date() {
        assert_eq!(parse("before soon"), None);
    }

    #[test]
    fn parse_empty_is_none() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn parse_unrecognized_is_none() {
        assert_eq!(parse("invalid filter"), None);
        assert_eq!(parse("OLDER 10"), None);
        assert_eq!(parse("older"), None);
        assert_eq!(parse("before"), None);
    }

    #[test]
    fn cutoff_older_subtracts_days() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let cutoff = VersionFilter::OlderThanDays(10).cutoff(now);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).unwrap());
    }

    #[test]
    fn matches_is_strictly_before() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let filter = VersionFilter::OlderThanDays(10);
        let at_cutoff = Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).unwrap();
        let just_before = Utc.with_ymd_and_hms(2024, 6, 5, 11, 59, 59).unwrap();
        assert!(!filter.matches(at_cutoff, now));
        assert!(filter.matches(just_before, now));
    }

    #[test]
    fn before_date_only_means_midnight_utc() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let filter = parse("before 2024-03-01").unwrap();
        let last_of_feb = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 0).unwrap();
        let first_of_mar = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert!(filter.matches(last_of_feb, now));
        assert!(!filter.matches(first_of_mar, now));
    }
}
