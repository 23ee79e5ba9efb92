//! Legacy spreadsheet date serialization for `DD/MM/YYYY[ time]` cell text.
//!
//! Serial 1 falls on 1899-12-31, putting 01/01/1900 at serial 2, one higher
//! than the usual 1900 date system for January/February 1900. The trackers
//! these exports feed were built against that numbering, so the epoch math
//! here is a fixed constant, not something to correct.

use chrono::NaiveDate;

/// Parses the leading date token of `value` and returns its serial day
/// number, or `0` when the token is not a valid `DD/MM/YYYY` date.
pub fn to_serial(value: &str) -> i64 {
    match parse_token(value) {
        Some(date) => serial_for(date),
        None => 0,
    }
}

/// Returns the serial day number as a decimal string, or the input unchanged
/// when it does not parse. Empty input stays empty.
pub fn to_display(value: &str) -> String {
    match parse_token(value) {
        Some(date) => serial_for(date).to_string(),
        None => value.to_string(),
    }
}

/// Only the text before the first space is considered; anything after it
/// (usually a time-of-day) is ignored.
fn parse_token(value: &str) -> Option<NaiveDate> {
    let token = value.split(' ').next().unwrap_or("");
    let mut parts = token.split('/');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn serial_for(date: NaiveDate) -> i64 {
    let epoch = NaiveDate::from_ymd_opt(1900, 1, 1).expect("fixed epoch date is valid");
    date.signed_duration_since(epoch).num_days() + 2
}
