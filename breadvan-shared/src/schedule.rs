//! Drive scheduling rules
//!
//! Dates come in as `YYYY-MM-DD` and times as `HH:MM`. A drive must be in
//! the future and no more than [`SCHEDULING_WINDOW_DAYS`] ahead. `now` is a
//! parameter so the rules can be tested without a clock.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// How far ahead a drive may be scheduled
pub const SCHEDULING_WINDOW_DAYS: i64 = 60;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Invalid date or time format. Use YYYY-MM-DD and HH:MM.")]
    InvalidFormat,

    #[error("Cannot schedule a drive in the past.")]
    InPast,

    #[error("Cannot schedule a drive more than 60 days in advance.")]
    TooFarAhead,
}

/// Parses a date and time pair
pub fn parse(date: &str, time: &str) -> Result<(NaiveDate, NaiveTime), ScheduleError> {
    let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|_| ScheduleError::InvalidFormat)?;
    let time = NaiveTime::parse_from_str(time.trim(), TIME_FORMAT)
        .map_err(|_| ScheduleError::InvalidFormat)?;
    Ok((date, time))
}

/// Checks that a slot lies strictly after `now` and inside the window
pub fn validate_window(
    date: NaiveDate,
    time: NaiveTime,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, ScheduleError> {
    let at = date.and_time(time);
    if at < now {
        return Err(ScheduleError::InPast);
    }
    if at > now + Duration::days(SCHEDULING_WINDOW_DAYS) {
        return Err(ScheduleError::TooFarAhead);
    }
    Ok(at)
}

/// Parses and validates in one step
pub fn parse_and_validate(
    date: &str,
    time: &str,
    now: NaiveDateTime,
) -> Result<(NaiveDate, NaiveTime), ScheduleError> {
    let (date, time) = parse(date, time)?;
    validate_window(date, time, now)?;
    Ok((date, time))
}

/// Local wall-clock time, the reference point for scheduling
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// `HH:MM` rendering used in notifications
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}
