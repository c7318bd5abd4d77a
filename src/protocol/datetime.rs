//! Date and time formats used by DATE, NEWGROUPS and NEWNEWS (RFC 3977 §7)

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Format a timestamp the way DATE reports it: `yyyymmddhhmmss`
#[must_use]
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%d%H%M%S").to_string()
}

/// Parse the `date time [GMT]` arguments of NEWGROUPS / NEWNEWS
///
/// `date` is `yymmdd` or `yyyymmdd`; `time` is `hhmmss`. Without the `GMT`
/// flag the time is "server local", and this server runs on UTC, so both
/// forms resolve to the same instant. Two-digit years pick the century
/// that puts the year closest to `now` (RFC 3977 §7.3.2).
pub fn parse_date_time(date: &str, time: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if !date.bytes().all(|b| b.is_ascii_digit()) || !time.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if time.len() != 6 {
        return None;
    }

    let (year, rest) = match date.len() {
        8 => (date[..4].parse::<i32>().ok()?, &date[4..]),
        6 => (expand_two_digit_year(date[..2].parse().ok()?, now.year()), &date[2..]),
        _ => return None,
    };
    let month: u32 = rest[..2].parse().ok()?;
    let day: u32 = rest[2..].parse().ok()?;

    let hour: u32 = time[..2].parse().ok()?;
    let minute: u32 = time[2..4].parse().ok()?;
    let second: u32 = time[4..].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(Utc.from_utc_datetime(&NaiveDateTime::new(date, time)))
}

/// Pick the century for `yy` closest to `current_year`
fn expand_two_digit_year(yy: i32, current_year: i32) -> i32 {
    let century = current_year - current_year.rem_euclid(100);
    [century - 100, century, century + 100]
        .into_iter()
        .map(|c| c + yy)
        .min_by_key(|candidate| (candidate - current_year).abs())
        .unwrap_or(century + yy)
}

/// Parse an RFC 2822 `Date:` header, tolerating a trailing comment
#[must_use]
pub fn parse_header_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc2822(value) {
        return Some(ts.with_timezone(&Utc));
    }
    // "Tue, 1 Jul 2003 10:52:37 +0200 (CEST)"
    let stripped = value.split(" (").next()?.trim();
    DateTime::parse_from_rfc2822(stripped)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_date(ts), "20240309070501");
    }

    #[test]
    fn test_parse_four_digit_year() {
        let ts = parse_date_time("20200102", "030405", now()).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn test_parse_two_digit_year_closest_century() {
        let recent = parse_date_time("200102", "000000", now()).unwrap();
        assert_eq!(recent.year(), 2020);

        let past = parse_date_time("990102", "000000", now()).unwrap();
        assert_eq!(past.year(), 1999);

        // 2076 is exactly 50 years away; min_by_key keeps the earlier candidate
        let tie = parse_date_time("760102", "000000", now()).unwrap();
        assert_eq!(tie.year(), 1976);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_date_time("2020010", "000000", now()).is_none());
        assert!(parse_date_time("20201301", "000000", now()).is_none());
        assert!(parse_date_time("20200101", "250000", now()).is_none());
        assert!(parse_date_time("20200101", "0000", now()).is_none());
        assert!(parse_date_time("2020-1-1", "000000", now()).is_none());
    }

    #[test]
    fn test_parse_header_date() {
        let ts = parse_header_date("Tue, 1 Jul 2003 10:52:37 +0200").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2003, 7, 1, 8, 52, 37).unwrap());

        let with_comment = parse_header_date("Tue, 1 Jul 2003 10:52:37 +0200 (CEST)").unwrap();
        assert_eq!(with_comment, ts);

        assert!(parse_header_date("yesterday").is_none());
    }
}
