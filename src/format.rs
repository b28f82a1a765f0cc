use chrono::{Locale, NaiveDate, NaiveDateTime, NaiveTime, ParseError, TimeZone, Utc};
use lazy_static::lazy_static;

const DATE_PATTERN: &str = "%B %-d, %Y";
const TIME_PATTERN: &str = "%-I:%M %p";

lazy_static! {
    /// Calendar date a time of day is attached to before rendering.
    static ref REFERENCE_DATE: NaiveDate = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
}

/// Renders dates and times of day for display, independent of the host's
/// locale and timezone.
#[derive(Debug, Clone, Copy)]
pub struct DisplayFormat {
    locale: Locale,
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self::new(Locale::en_US)
    }
}

impl DisplayFormat {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// `2024-03-05` becomes `March 5, 2024`.
    pub fn format_date(&self, date: NaiveDate) -> String {
        let instant = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        instant.format_localized(DATE_PATTERN, self.locale).to_string()
    }

    /// `14:30` becomes `2:30 PM`.
    ///
    /// The time of day is treated as wall-clock time on a fixed calendar
    /// date, so no timezone or daylight saving rules apply.
    pub fn format_time(&self, time: &str) -> Result<String, ParseError> {
        let time = parse_time_of_day(time)?;
        let instant = Utc.from_utc_datetime(&NaiveDateTime::new(*REFERENCE_DATE, time));
        Ok(instant.format_localized(TIME_PATTERN, self.locale).to_string())
    }
}

pub fn format_date(date: NaiveDate) -> String {
    DisplayFormat::default().format_date(date)
}

pub fn format_time(time: &str) -> Result<String, ParseError> {
    DisplayFormat::default().format_time(time)
}

/// Accepts `HH:MM` and the `HH:MM:SS` form Postgres returns for `time` columns.
pub fn parse_time_of_day(time: &str) -> Result<NaiveTime, ParseError> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_case::test_case(2024, 3, 5, "March 5, 2024")]
    #[test_case::test_case(2023, 12, 31, "December 31, 2023")]
    #[test_case::test_case(2000, 1, 1, "January 1, 2000")]
    #[test_case::test_case(2024, 2, 29, "February 29, 2024")]
    fn test_format_date(year: i32, month: u32, day: u32, expected: &str) {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        assert_eq!(format_date(date), expected);
    }

    #[test_case::test_case("14:30", "2:30 PM")]
    #[test_case::test_case("09:05", "9:05 AM")]
    #[test_case::test_case("00:00", "12:00 AM")]
    #[test_case::test_case("12:00", "12:00 PM")]
    #[test_case::test_case("23:59", "11:59 PM")]
    #[test_case::test_case("08:15:00", "8:15 AM")]
    fn test_format_time(input: &str, expected: &str) {
        assert_eq!(format_time(input).unwrap(), expected);
    }

    #[test_case::test_case("")]
    #[test_case::test_case("25:00")]
    #[test_case::test_case("12:60")]
    #[test_case::test_case("noon")]
    #[test_case::test_case("2:30 PM")]
    fn test_format_time_rejects_malformed_input(input: &str) {
        format_time(input).unwrap_err();
    }

    #[test]
    fn test_formatting_is_repeatable() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let time = String::from("14:30");

        assert_eq!(format_date(date), format_date(date));
        assert_eq!(format_time(&time).unwrap(), format_time(&time).unwrap());
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(time, "14:30");
    }

    #[test]
    fn test_reference_date() {
        assert_eq!(*REFERENCE_DATE, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    }

    #[test]
    fn test_injected_locale() {
        let german = DisplayFormat::new(Locale::de_DE);
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        assert_eq!(german.format_date(date), "März 5, 2024");
    }
}
