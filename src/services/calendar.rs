use chrono::{Datelike, Duration, Months, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` literal. Anything else (including other shapes chrono
/// would accept, like 5-digit years) is treated as "no date".
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let text = value.trim();
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

pub fn parse_date_opt(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(parse_date)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Saturates at the calendar bounds instead of overflowing.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Calendar-aware year offset: Feb 29 lands on Feb 28 when the target year is
/// not a leap year.
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    let months = Months::new(years.unsigned_abs().saturating_mul(12));
    let shifted = if years >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(if years < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first = start_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    end_of_month(date).day()
}

/// `end - start + 1`; zero or negative when the range is inverted.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Whole days from `origin` to `date`; negative when `date` is earlier.
pub fn day_offset(date: NaiveDate, origin: NaiveDate) -> i64 {
    (date - origin).num_days()
}

/// Earlier of `date` and an optional limit.
pub fn clip_to(date: NaiveDate, limit: Option<NaiveDate>) -> NaiveDate {
    match limit {
        Some(limit) => date.min(limit),
        None => date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> NaiveDate {
        parse_date(text).expect("valid date")
    }

    #[test]
    fn parses_only_calendar_date_shape() {
        assert_eq!(d("2024-03-15"), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(parse_date(" 2024-03-15 "), Some(d("2024-03-15")));
        assert_eq!(parse_date("2024-3-15"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("2024-03-15T00:00:00Z"), None);
        assert_eq!(parse_date("12024-03-15"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date_opt(None), None);
    }

    #[test]
    fn formats_round_trip_literal() {
        assert_eq!(format_date(d("2024-01-05")), "2024-01-05");
    }

    #[test]
    fn adds_days_across_month_and_leap_boundaries() {
        assert_eq!(add_days(d("2024-01-01"), 74), d("2024-03-15"));
        assert_eq!(add_days(d("2024-02-28"), 1), d("2024-02-29"));
        assert_eq!(add_days(d("2023-02-28"), 1), d("2023-03-01"));
        assert_eq!(add_days(d("2024-03-01"), -1), d("2024-02-29"));
        assert_eq!(add_days(NaiveDate::MAX, 5), NaiveDate::MAX);
    }

    #[test]
    fn adds_years_clamping_leap_day() {
        assert_eq!(add_years(d("2024-02-29"), 1), d("2025-02-28"));
        assert_eq!(add_years(d("2024-02-29"), 4), d("2028-02-29"));
        assert_eq!(add_years(d("2024-06-01"), 1), d("2025-06-01"));
        assert_eq!(add_years(d("2025-06-01"), -1), d("2024-06-01"));
    }

    #[test]
    fn month_bounds_and_lengths() {
        assert_eq!(end_of_month(d("2024-02-10")), d("2024-02-29"));
        assert_eq!(end_of_month(d("2023-02-10")), d("2023-02-28"));
        assert_eq!(end_of_month(d("2024-12-31")), d("2024-12-31"));
        assert_eq!(start_of_month(d("2024-12-31")), d("2024-12-01"));
        assert_eq!(days_in_month(d("2024-04-30")), 30);
        assert_eq!(days_in_month(d("2024-01-01")), 31);
        assert_eq!(days_in_month(d("2100-02-01")), 28);
    }

    #[test]
    fn counts_inclusive_days() {
        assert_eq!(inclusive_days(d("2024-06-01"), d("2024-08-31")), 92);
        assert_eq!(inclusive_days(d("2024-06-01"), d("2024-06-01")), 1);
        assert_eq!(inclusive_days(d("2024-06-02"), d("2024-06-01")), 0);
        assert_eq!(day_offset(d("2024-03-01"), d("2024-01-01")), 60);
    }

    #[test]
    fn clips_to_optional_limit() {
        assert_eq!(clip_to(d("2024-12-31"), Some(d("2024-08-31"))), d("2024-08-31"));
        assert_eq!(clip_to(d("2024-12-31"), Some(d("2025-08-31"))), d("2024-12-31"));
        assert_eq!(clip_to(d("2024-12-31"), None), d("2024-12-31"));
    }
}
