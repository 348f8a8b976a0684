use chrono::{NaiveDateTime, Timelike};
use std::time::Duration;

use crate::core::types::Granularity;
use crate::engine::calendar::CalendarGrid;
use crate::engine::date_math::{is_show_day_line, is_show_hour_line};

pub const DEFAULT_REFRESH: Duration = Duration::from_millis(15_000);

/// Where "now" falls on the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NowMarker {
    pub at: NaiveDateTime,
    pub leaf_index: usize,
    /// Position inside the leaf cell, 0.0 up to 1.0.
    pub fraction: f64,
}

impl NowMarker {
    /// Left offset inside the cell; never less than one pixel.
    pub fn pixel_left(&self, cell_width: u32) -> i64 {
        ((self.fraction * f64::from(cell_width)).floor() as i64).max(1)
    }

    /// Left offset from the start of the grid.
    pub fn grid_left(&self, cell_width: u32) -> i64 {
        self.leaf_index as i64 * i64::from(cell_width) + self.pixel_left(cell_width)
    }
}

/// Finds the leaf holding `now` by scanning the grid; `None` when no leaf
/// matches. The grid's trailing day counts, so a window that ends at `now`
/// still shows the marker.
pub fn locate_now(grid: &CalendarGrid, now: NaiveDateTime) -> Option<NowMarker> {
    let (leaf_index, fraction) = match grid.granularity {
        Granularity::Hour => {
            let index = grid
                .leaves()
                .iter()
                .position(|leaf| leaf.hour.is_some_and(|h| is_show_hour_line(leaf.day, h, now)))?;
            (index, f64::from(now.minute()) / 60.0)
        }
        Granularity::Day => {
            let index = grid
                .leaves()
                .iter()
                .position(|leaf| is_show_day_line(leaf.day, now))?;
            (index, f64::from(now.hour()) / 24.0)
        }
    };
    Some(NowMarker {
        at: now,
        leaf_index,
        fraction,
    })
}

/// Fixed-interval refresh polled by the host.
///
/// Nothing runs in the background: the host calls [`NowTimer::due`] with
/// the current time and refreshes the marker when it returns true.
#[derive(Debug, Clone)]
pub struct NowTimer {
    interval: Duration,
    next_due: Option<NaiveDateTime>,
}

impl Default for NowTimer {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH)
    }
}

impl NowTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    fn step(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.interval)
            .unwrap_or_else(|_| chrono::Duration::milliseconds(DEFAULT_REFRESH.as_millis() as i64))
    }

    /// Starts ticking from `now`. Arming an armed timer is a bug in the
    /// caller; reload paths cancel first.
    pub fn arm(&mut self, now: NaiveDateTime) {
        debug_assert!(!self.is_armed(), "now timer armed twice without cancel");
        self.next_due = now.checked_add_signed(self.step());
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// True once per elapsed interval; skipped intervals collapse into one.
    pub fn due(&mut self, now: NaiveDateTime) -> bool {
        let Some(next) = self.next_due else {
            return false;
        };
        if now < next {
            return false;
        }
        let step = self.step();
        let mut following = next;
        while following <= now {
            match following.checked_add_signed(step) {
                Some(t) if t > following => following = t,
                _ => break,
            }
        }
        self.next_due = Some(following);
        true
    }
}
