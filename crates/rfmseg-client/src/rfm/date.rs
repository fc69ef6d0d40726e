use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Calendar month key, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn label(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

// `%.f` also matches a missing fraction.
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Parses a sales date leniently; anything unrecognised becomes `None`.
///
/// Time-of-day components are accepted and dropped.
pub fn parse_transaction_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }

    None
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `DD-MM-YY`, the display form for last-sale dates.
pub fn format_sale_date(date: &NaiveDate) -> String {
    date.format("%d-%m-%y").to_string()
}

pub fn next_day(date: NaiveDate) -> NaiveDate {
    date + Duration::days(1)
}

pub fn add_months_clamped(date: NaiveDate, months: i32) -> NaiveDate {
    let current_month = i32::try_from(date.month()).unwrap_or(1);
    let mut raw_month = current_month + months;
    let mut year = date.year();

    while raw_month > 12 {
        raw_month -= 12;
        year += 1;
    }
    while raw_month < 1 {
        raw_month += 12;
        year -= 1;
    }

    let month_u32 = u32::try_from(raw_month).unwrap_or(1);
    let day = date.day().min(days_in_month(year, month_u32));
    if let Some(result) = NaiveDate::from_ymd_opt(year, month_u32, day) {
        return result;
    }
    date
}

/// The `count` calendar months ending with the month of `anchor`, oldest first.
pub fn trailing_months(anchor: NaiveDate, count: usize) -> Vec<MonthKey> {
    let Some(first_of_anchor) = MonthKey::of(anchor).first_day() else {
        return Vec::new();
    };
    let span = i32::try_from(count).unwrap_or(0);

    (0..span)
        .rev()
        .map(|offset| MonthKey::of(add_months_clamped(first_of_anchor, -offset)))
        .collect()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{
        MonthKey, add_months_clamped, format_iso_date, format_sale_date, next_day,
        parse_transaction_date, trailing_months,
    };

    #[test]
    fn month_clamping_handles_end_of_month_transitions() {
        let jan_31 = NaiveDate::from_ymd_opt(2026, 1, 31);
        assert!(jan_31.is_some());
        if let Some(value) = jan_31 {
            let feb = add_months_clamped(value, 1);
            assert_eq!(format_iso_date(&feb), "2026-02-28");
            let back = add_months_clamped(value, -2);
            assert_eq!(format_iso_date(&back), "2025-11-30");
        }
    }

    #[test]
    fn parses_iso_datetime_and_day_first_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 7);
        assert_eq!(parse_transaction_date("2024-03-07"), expected);
        assert_eq!(parse_transaction_date("2024-03-07 13:45:00"), expected);
        assert_eq!(parse_transaction_date("2024-03-07T13:45:00"), expected);
        assert_eq!(parse_transaction_date("07/03/2024"), expected);
        assert_eq!(parse_transaction_date("2024-03-07 13:45:30.123456"), expected);
        assert_eq!(parse_transaction_date("2024-03-07T13:45:30.5"), expected);
        assert_eq!(parse_transaction_date("2024-03-07 13:45"), expected);
    }

    #[test]
    fn unparsable_dates_become_none() {
        assert_eq!(parse_transaction_date(""), None);
        assert_eq!(parse_transaction_date("not a date"), None);
        assert_eq!(parse_transaction_date("2024-02-31"), None);
    }

    #[test]
    fn sale_date_uses_two_digit_year() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert!(date.is_some());
        if let Some(value) = date {
            assert_eq!(format_sale_date(&value), "05-01-24");
            assert_eq!(format_iso_date(&next_day(value)), "2024-01-06");
        }
    }

    #[test]
    fn trailing_months_cross_year_boundary_oldest_first() {
        let anchor = NaiveDate::from_ymd_opt(2024, 2, 29);
        assert!(anchor.is_some());
        if let Some(value) = anchor {
            let months = trailing_months(value, 12);
            assert_eq!(months.len(), 12);
            assert_eq!(months[0], MonthKey { year: 2023, month: 3 });
            assert_eq!(months[11], MonthKey { year: 2024, month: 2 });
            assert!(months.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
