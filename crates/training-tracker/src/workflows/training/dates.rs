use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// Shown wherever a topic has no date to display.
pub const PLACEHOLDER: &str = "—";

const DISPLAY_FORMAT: &str = "%d/%m/%Y";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

// 9999-12-31 as a spreadsheet serial.
const MAX_SERIAL: f64 = 2_958_465.0;

/// Parses the date spellings that show up in hand-maintained rosters.
pub fn parse_date_text(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|dt| dt.date())
        })
}

/// Converts a spreadsheet day serial (1900 system, origin 1899-12-30).
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 || serial > MAX_SERIAL {
        return None;
    }

    let origin = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    origin.checked_add_signed(Duration::days(serial.trunc() as i64))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Integers print without a fractional part, everything else round-trips.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_common_roster_spellings() {
        assert_eq!(parse_date_text("2023-05-01"), Some(ymd(2023, 5, 1)));
        assert_eq!(parse_date_text("01/05/2023"), Some(ymd(2023, 5, 1)));
        assert_eq!(parse_date_text("1-5-2023"), Some(ymd(2023, 5, 1)));
        assert_eq!(parse_date_text("2023-05-01 08:30:00"), Some(ymd(2023, 5, 1)));
        assert_eq!(parse_date_text("2023-05-01T10:00:00Z"), Some(ymd(2023, 5, 1)));
        assert_eq!(parse_date_text("S/N"), None);
        assert_eq!(parse_date_text("31/02/2023"), None);
        assert_eq!(parse_date_text(""), None);
    }

    #[test]
    fn serials_use_spreadsheet_origin() {
        assert_eq!(serial_to_date(45047.0), Some(ymd(2023, 5, 1)));
        assert_eq!(serial_to_date(45047.75), Some(ymd(2023, 5, 1)));
        assert_eq!(serial_to_date(f64::NAN), None);
        assert_eq!(serial_to_date(-1.0), None);
    }

    #[test]
    fn numbers_drop_trailing_zero_fraction() {
        assert_eq!(format_number(29999.0), "29999");
        assert_eq!(format_number(12.5), "12.5");
    }
}
