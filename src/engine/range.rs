use chrono::NaiveDateTime;
use std::fmt;

use crate::core::schedule::Schedule;
use crate::core::types::Granularity;
use crate::engine::ChartOptions;
use crate::engine::date_math::{add_days, days_between, end_of_day, start_of_day};

/// Extra day cells past the viewport in day mode.
const DAY_MODE_EXTRA_DAYS: u32 = 15;
const HOUR_MODE_LOOKBACK_DAYS: i64 = 1;
const DAY_MODE_LOOKBACK_DAYS: i64 = 15;

/// The `[start, end)` range the chart displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    pub fn day_span(&self) -> i64 {
        days_between(self.start, self.end, false)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Minimum number of days the window must cover so the grid fills the
/// viewport. An explicit `minimum_days` wins.
pub fn minimum_bucket_count(options: &ChartOptions) -> u32 {
    if let Some(days) = options.minimum_days {
        return days;
    }
    let usable = options.viewport_width.saturating_sub(options.header_width);
    let cell = options.cell_width.max(1);
    match options.granularity {
        Granularity::Hour => usable / (cell * 24) + 1,
        Granularity::Day => usable / cell + DAY_MODE_EXTRA_DAYS,
    }
}

/// Bounds every scheduled task, widened to `minimum` days.
pub fn resolve(
    schedule: &Schedule,
    minimum: u32,
    granularity: Granularity,
    anchor_today: bool,
    now: NaiveDateTime,
) -> Window {
    let mut bounds: Option<(NaiveDateTime, NaiveDateTime)> = if anchor_today {
        let lookback = match granularity {
            Granularity::Hour => HOUR_MODE_LOOKBACK_DAYS,
            Granularity::Day => DAY_MODE_LOOKBACK_DAYS,
        };
        Some((add_days(now, -lookback), now))
    } else {
        None
    };

    for interval in schedule.tasks().filter_map(|t| t.interval()) {
        bounds = Some(match bounds {
            None => (interval.start, interval.end),
            Some((start, end)) => (start.min(interval.start), end.max(interval.end)),
        });
    }

    let (start, mut end) = bounds.unwrap_or((now, now));
    // A single degenerate task can seed end before start.
    if end < start {
        end = start;
    }
    if days_between(start, end, false) < i64::from(minimum) {
        end = add_days(start, i64::from(minimum));
    }

    match granularity {
        Granularity::Hour => Window {
            start: start_of_day(start),
            end: end_of_day(end),
        },
        Granularity::Day => Window { start, end },
    }
}
