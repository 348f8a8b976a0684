//! Pure date arithmetic over wall-clock instants.
//!
//! Day steps are a fixed 86 400 000 ms; nothing here knows about DST.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::core::types::ChartDate;
use crate::errors::Result;
use crate::extensions::chrono::WeekdayExt;

pub const DAY_MS: i64 = 86_400_000;
pub const MINUTE_MS: i64 = 60_000;

const UNSET_START_YEAR: i32 = 1901;
const UNSET_END_YEAR: i32 = 8099;

pub fn add_days(date: NaiveDateTime, n: i64) -> NaiveDateTime {
    date + Duration::milliseconds(n * DAY_MS)
}

/// [`add_days`] for a date that still needs parsing.
pub fn add_days_str(date: &str, n: i64) -> Result<NaiveDateTime> {
    Ok(add_days(parse_date(date)?, n))
}

pub fn add_minutes(date: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    date + Duration::milliseconds(minutes * MINUTE_MS)
}

fn is_unset_pair(start: NaiveDateTime, end: NaiveDateTime) -> bool {
    start.year() == UNSET_START_YEAR || end.year() == UNSET_END_YEAR
}

/// Number of one-day steps from `start` until the cursor reaches `end`.
///
/// A partial trailing day counts as a step. With `exclude_end_day` the
/// count drops by one when positive.
pub fn days_between(start: NaiveDateTime, end: NaiveDateTime, exclude_end_day: bool) -> i64 {
    if is_unset_pair(start, end) {
        return 0;
    }
    let diff = (end - start).num_milliseconds();
    if diff <= 0 {
        return 0;
    }
    let count = (diff + DAY_MS - 1) / DAY_MS;
    if exclude_end_day { count - 1 } else { count }
}

/// Calendar days from the day holding `from` to the day holding `to`;
/// times of day are ignored, negative when `to` falls on an earlier day.
pub fn calendar_days_elapsed(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to.date() - from.date()).num_days()
}

pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    if is_unset_pair(start, end) {
        return 0.0;
    }
    (end - start).num_milliseconds() as f64 / MINUTE_MS as f64
}

pub fn is_weekend(date: NaiveDateTime) -> bool {
    date.weekday().is_weekend()
}

pub fn is_saturday(date: NaiveDateTime) -> bool {
    date.weekday() == Weekday::Sat
}

pub fn is_sunday(date: NaiveDateTime) -> bool {
    date.weekday() == Weekday::Sun
}

pub fn is_show_day_line(date: NaiveDateTime, now: NaiveDateTime) -> bool {
    date.date() == now.date()
}

pub fn is_show_hour_line(date: NaiveDateTime, hour: u32, now: NaiveDateTime) -> bool {
    is_show_day_line(date, now) && now.hour() == hour
}

/// First and last day of the week holding `date`.
pub fn week_bounds(date: NaiveDate, week_start: Weekday) -> (NaiveDate, NaiveDate) {
    let back = (date.weekday().num_days_from_sunday() + 7 - week_start.num_days_from_sunday()) % 7;
    let first = date - Duration::days(i64::from(back));
    (first, first + Duration::days(6))
}

pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let last = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date);
    (first, last)
}

/// Quarter number, 1 through 4.
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

pub fn quarter_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_month = (quarter_of(date) - 1) * 3 + 1;
    let first = NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date);
    let last_month_day = NaiveDate::from_ymd_opt(date.year(), first_month + 2, 1).unwrap_or(date);
    let (_, last) = month_bounds(last_month_day);
    (first, last)
}

/// Short duration label used on hour-mode bars.
pub fn duration_tag(minutes: f64) -> String {
    if minutes < 60.0 {
        format!("{minutes:.1} min")
    } else if minutes < 24.0 * 60.0 {
        format!("{:.1} h", minutes / 60.0)
    } else {
        format!("{:.1} d", minutes / (24.0 * 60.0))
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDateTime> {
    ChartDate::try_from_str(input).map(|d| d.0)
}

/// Midnight of the same day.
pub fn start_of_day(date: NaiveDateTime) -> NaiveDateTime {
    date.date().and_time(chrono::NaiveTime::MIN)
}

/// 23:59:59.999 of the same day.
pub fn end_of_day(date: NaiveDateTime) -> NaiveDateTime {
    start_of_day(date) + Duration::milliseconds(DAY_MS - 1)
}
