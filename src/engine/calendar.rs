use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

use crate::core::types::Granularity;
use crate::engine::date_math::{self, add_days};
use crate::engine::range::Window;
use crate::extensions::chrono::WeekdayExt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    /// The cursor instant; keeps the window start's time of day.
    pub at: NaiveDateTime,
}

impl DayBucket {
    pub fn date(&self) -> NaiveDate {
        self.at.date()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
    pub year: i32,
    /// 1 through 12.
    pub month: u32,
    pub days: Vec<DayBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearBucket {
    pub year: i32,
    pub months: Vec<MonthBucket>,
}

/// One grid cell: a day, or an hour of a day in hour mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf {
    pub day: NaiveDateTime,
    pub hour: Option<u32>,
}

impl Leaf {
    /// Instant at the left edge of the cell.
    pub fn start(&self) -> NaiveDateTime {
        match self.hour {
            Some(h) => date_math::start_of_day(self.day) + Duration::hours(i64::from(h)),
            None => self.day,
        }
    }
}

/// A header cell spanning `span` leaf cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub label: String,
    pub span: u32,
    pub weekday: Option<Weekday>,
    pub saturday: bool,
    pub sunday: bool,
    pub now: bool,
}

impl HeaderCell {
    fn plain(label: String, span: u32) -> Self {
        Self {
            label,
            span,
            weekday: None,
            saturday: false,
            sunday: false,
            now: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekSpan {
    pub first: NaiveDate,
    pub last: NaiveDate,
    /// Leaf cells of this week that fall inside the grid.
    pub cells: u32,
}

/// Year → month → day buckets covering a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub granularity: Granularity,
    pub years: Vec<YearBucket>,
}

impl CalendarGrid {
    /// Starts at the window start and steps one day at a time while the
    /// cursor is before the window end; the last step may land past it.
    pub fn build(window: &Window, granularity: Granularity) -> Self {
        let mut grid = Self {
            granularity,
            years: Vec::new(),
        };
        let mut cursor = window.start;
        grid.insert(cursor);
        while cursor < window.end {
            cursor = add_days(cursor, 1);
            grid.insert(cursor);
        }
        grid
    }

    fn insert(&mut self, at: NaiveDateTime) {
        let (year, month) = (at.year(), at.month());
        if self.years.last().map(|y| y.year) != Some(year) {
            self.years.push(YearBucket {
                year,
                months: Vec::new(),
            });
        }
        let Some(year_bucket) = self.years.last_mut() else {
            return;
        };
        if year_bucket.months.last().map(|m| m.month) != Some(month) {
            year_bucket.months.push(MonthBucket {
                year,
                month,
                days: Vec::new(),
            });
        }
        if let Some(month_bucket) = year_bucket.months.last_mut() {
            month_bucket.days.push(DayBucket { at });
        }
    }

    pub fn months(&self) -> impl Iterator<Item = &MonthBucket> {
        self.years.iter().flat_map(|y| y.months.iter())
    }

    pub fn days(&self) -> impl Iterator<Item = &DayBucket> {
        self.months().flat_map(|m| m.days.iter())
    }

    pub fn day_count(&self) -> usize {
        self.days().count()
    }

    pub fn leaves(&self) -> Vec<Leaf> {
        let hours = match self.granularity {
            Granularity::Hour => 24,
            Granularity::Day => 0,
        };
        self.days()
            .flat_map(|d| {
                let day = d.at;
                let hourly = (0..hours).map(move |h| Leaf { day, hour: Some(h) });
                let daily = (hours == 0).then_some(Leaf { day, hour: None });
                hourly.chain(daily)
            })
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.day_count() * self.granularity.cells_per_day() as usize
    }

    /// Groups the grid's days into weeks starting on `week_start`.
    pub fn weeks(&self, week_start: Weekday) -> Vec<WeekSpan> {
        let per_day = self.granularity.cells_per_day();
        let mut weeks: Vec<WeekSpan> = Vec::new();
        for day in self.days() {
            let (first, last) = date_math::week_bounds(day.date(), week_start);
            match weeks.last_mut() {
                Some(week) if week.first == first => week.cells += per_day,
                _ => weeks.push(WeekSpan {
                    first,
                    last,
                    cells: per_day,
                }),
            }
        }
        weeks
    }

    pub fn month_headers(&self) -> Vec<HeaderCell> {
        let per_day = self.granularity.cells_per_day();
        self.months()
            .map(|m| {
                HeaderCell::plain(
                    format!("{}-{:02}", m.year, m.month),
                    m.days.len() as u32 * per_day,
                )
            })
            .collect()
    }

    /// Day row: the day of month in day mode, a full date in hour mode.
    pub fn day_headers(&self, show_weekends: bool, now: NaiveDateTime) -> Vec<HeaderCell> {
        let per_day = self.granularity.cells_per_day();
        self.days()
            .map(|d| {
                let weekday = d.at.weekday();
                let label = match self.granularity {
                    Granularity::Day => d.at.day().to_string(),
                    Granularity::Hour => {
                        format!("{} {}", d.at.format("%Y-%m-%d"), weekday.short_name())
                    }
                };
                HeaderCell {
                    label,
                    span: per_day,
                    weekday: Some(weekday),
                    saturday: show_weekends && date_math::is_saturday(d.at),
                    sunday: show_weekends && date_math::is_sunday(d.at),
                    now: date_math::is_show_day_line(d.at, now),
                }
            })
            .collect()
    }

    /// Hour row; empty in day mode.
    pub fn hour_headers(&self, now: NaiveDateTime) -> Vec<HeaderCell> {
        if self.granularity != Granularity::Hour {
            return Vec::new();
        }
        self.leaves()
            .into_iter()
            .filter_map(|leaf| {
                let hour = leaf.hour?;
                let mut cell = HeaderCell::plain(format!("{hour:02}:00"), 1);
                cell.now = date_math::is_show_hour_line(leaf.day, hour, now);
                Some(cell)
            })
            .collect()
    }
}
