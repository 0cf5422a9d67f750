// Calendar helpers - parse and format the DD-MM-YYYY / HH:MM record format
use super::error::DomainError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Parse a `DD-MM-YYYY` date. Two-digit day and month, four-digit year,
/// and the result must be a real calendar day.
pub fn parse_date(text: &str) -> Result<NaiveDate, DomainError> {
    let invalid = || DomainError::InvalidDate(text.to_string());

    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[2] != b'-' || bytes[5] != b'-' {
        return Err(invalid());
    }

    let day = parse_digits(&text[0..2]).ok_or_else(invalid)?;
    let month = parse_digits(&text[3..5]).ok_or_else(invalid)?;
    let year = parse_digits(&text[6..10]).ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)
}

/// Parse a 24-hour `HH:MM` time. The hour may be written with one digit.
pub fn parse_time(text: &str) -> Result<NaiveTime, DomainError> {
    let invalid = || DomainError::InvalidTime(text.to_string());

    let (hour, minute) = text.split_once(':').ok_or_else(invalid)?;
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return Err(invalid());
    }

    let hour = parse_digits(hour).ok_or_else(invalid)?;
    let minute = parse_digits(minute).ok_or_else(invalid)?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

pub fn parse_date_time(date: &str, time: &str) -> Result<NaiveDateTime, DomainError> {
    Ok(parse_date(date)?.and_time(parse_time(time)?))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_digits(text: &str) -> Option<u32> {
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
