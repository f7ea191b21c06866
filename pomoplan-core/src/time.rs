//! Calendar-date helpers: parsing, formatting and resolving "today".

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::ValidationError;

/// Textual form used for every persisted or exchanged date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        input: trimmed.to_string(),
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Resolve the current calendar date in an IANA timezone like "Europe/Berlin".
///
/// `None` means the machine's local zone.
pub fn today_in(tz: Option<&str>) -> Result<NaiveDate, String> {
    match tz {
        None => Ok(Local::now().date_naive()),
        Some(name) => {
            let tz: Tz = name
                .parse()
                .map_err(|_| format!("invalid timezone: {name}"))?;
            Ok(Utc::now().with_timezone(&tz).date_naive())
        }
    }
}

/// Signed number of whole days from `today` until `due`.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_and_rejects_others() {
        let d = parse_date(" 2026-02-20 ").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 2, 20).unwrap());
        assert_eq!(format_date(d), "2026-02-20");

        let err = parse_date("20/02/2026").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDate {
                input: "20/02/2026".into()
            }
        );
    }

    #[test]
    fn days_until_is_signed() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(days_until(NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(), today), 3);
        assert_eq!(days_until(NaiveDate::from_ymd_opt(2026, 2, 27).unwrap(), today), -2);
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        assert!(today_in(Some("Mars/Olympus")).is_err());
        assert!(today_in(Some("America/Chicago")).is_ok());
    }
}
