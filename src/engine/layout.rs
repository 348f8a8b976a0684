use chrono::NaiveDateTime;

use crate::core::ids::{CategoryId, SeriesId, TaskRef};
use crate::core::models::{Interval, Task};
use crate::core::schedule::Schedule;
use crate::core::types::Granularity;
use crate::engine::ChartOptions;
use crate::engine::date_math::{
    add_days, add_minutes, calendar_days_elapsed, days_between, duration_tag, minutes_between,
};
use crate::engine::range::Window;

/// Inset of a day-mode bar inside its first cell, in pixels.
pub const DAY_BAR_LEFT_MARGIN: i64 = 4;
/// Total horizontal inset of a day-mode bar, in pixels.
pub const DAY_BAR_RESERVED: i64 = 8;
/// Border pixel in front of hour-mode bars.
pub const HOUR_BAR_BORDER: i64 = 1;

/// Position and size of a bar. Day mode counts cells; hour mode counts
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub offset: i64,
    pub length: i64,
    pub degenerate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub left: i64,
    pub width: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub task: TaskRef,
    pub name: String,
    pub tip: String,
    pub interval: Interval,
    pub offset: i64,
    pub length: i64,
    pub conflict: bool,
    pub degenerate: bool,
    pub label: String,
    pub color: Option<String>,
    pub is_task: bool,
    pub clickable: bool,
    pub draggable: bool,
    pub resizable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub category: CategoryId,
    pub series: SeriesId,
    pub category_name: String,
    pub name: String,
    pub tip: String,
    pub empty: bool,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub granularity: Granularity,
    pub cell_width: u32,
    pub rows: Vec<Row>,
}

fn pixels_per_minute(cell_width: u32) -> f64 {
    f64::from(cell_width) / 60.0
}

pub fn geometry(
    window_start: NaiveDateTime,
    granularity: Granularity,
    cell_width: u32,
    interval: &Interval,
) -> Geometry {
    let degenerate = interval.is_degenerate();
    match granularity {
        Granularity::Day => Geometry {
            offset: calendar_days_elapsed(window_start, interval.start),
            length: if degenerate {
                0
            } else {
                days_between(interval.start, interval.end, false) + 1
            },
            degenerate,
        },
        Granularity::Hour => {
            let ppm = pixels_per_minute(cell_width);
            let length = (minutes_between(interval.start, interval.end) * ppm).ceil() as i64;
            Geometry {
                offset: (minutes_between(window_start, interval.start) * ppm).floor() as i64,
                length: length.max(0),
                degenerate,
            }
        }
    }
}

pub fn pixel_box(granularity: Granularity, cell_width: u32, offset: i64, length: i64) -> PixelBox {
    match granularity {
        Granularity::Day => {
            let cw = i64::from(cell_width);
            PixelBox {
                left: offset * cw + DAY_BAR_LEFT_MARGIN,
                width: (length * cw - DAY_BAR_RESERVED).max(0),
            }
        }
        Granularity::Hour => PixelBox {
            left: offset + HOUR_BAR_BORDER,
            width: length + HOUR_BAR_BORDER,
        },
    }
}

/// Inverse of [`pixel_box`]: the span a bar's left edge and width stand for.
///
/// Both modes drop the one-pixel border before dividing and round down, so
/// a box produced by [`pixel_box`] maps back to its task's cells.
pub fn span_from_pixels(
    window_start: NaiveDateTime,
    granularity: Granularity,
    cell_width: u32,
    pixel_offset: i64,
    pixel_width: i64,
) -> Interval {
    let left = (pixel_offset - HOUR_BAR_BORDER).max(0);
    match granularity {
        Granularity::Day => {
            let cw = i64::from(cell_width.max(1));
            let start = add_days(window_start, left.div_euclid(cw));
            let end = add_days(start, pixel_width.div_euclid(cw));
            Interval::new(start, end)
        }
        Granularity::Hour => {
            let ppm = pixels_per_minute(cell_width.max(1));
            let start = add_minutes(window_start, (left as f64 / ppm).floor() as i64);
            let width = (pixel_width - HOUR_BAR_BORDER) as f64;
            let end = add_minutes(start, (width / ppm).floor() as i64);
            Interval::new(start, end)
        }
    }
}

/// Flags every bar that overlaps another bar of the same row.
pub fn mark_conflicts(bars: &mut [Bar]) {
    let n = bars.len();
    let mut flags = vec![false; n];
    for i in 0..n {
        for j in (i + 1)..n {
            if bars[i].interval.overlaps(&bars[j].interval) {
                flags[i] = true;
                flags[j] = true;
            }
        }
    }
    for (bar, flag) in bars.iter_mut().zip(flags) {
        bar.conflict = flag;
    }
}

fn bar_for(task: &Task, interval: Interval, window: &Window, options: &ChartOptions) -> Bar {
    let geo = geometry(window.start, options.granularity, options.cell_width, &interval);
    let label = match options.granularity {
        Granularity::Day => format!("{} d", geo.length),
        Granularity::Hour => duration_tag(minutes_between(interval.start, interval.end).max(0.0)),
    };
    Bar {
        task: task.task_ref(),
        name: task.name.clone(),
        tip: task.tip.clone(),
        interval,
        offset: geo.offset,
        length: geo.length,
        conflict: false,
        degenerate: geo.degenerate,
        label,
        color: task.options.color.clone(),
        is_task: task.is_task,
        clickable: options.behavior.clickable,
        draggable: options.behavior.draggable && task.options.draggable,
        resizable: options.behavior.resizable && task.options.resizable,
    }
}

impl Layout {
    /// One row per series in schedule order.
    ///
    /// Without `stack_tasks_per_row` only the first task of a series gets
    /// a bar. Unscheduled tasks are skipped.
    pub fn build(schedule: &Schedule, window: &Window, options: &ChartOptions) -> Self {
        let mut rows = Vec::with_capacity(schedule.series_count());
        for category in schedule.categories() {
            for series in &category.series {
                let take = if options.stack_tasks_per_row {
                    usize::MAX
                } else {
                    1
                };
                let mut bars: Vec<Bar> = series
                    .tasks()
                    .iter()
                    .take(take)
                    .filter_map(|t| t.interval().map(|iv| bar_for(t, iv, window, options)))
                    .collect();
                mark_conflicts(&mut bars);
                rows.push(Row {
                    category: category.id.clone(),
                    series: series.id.clone(),
                    category_name: category.name.clone(),
                    name: series.name.clone(),
                    tip: series.tip.clone(),
                    empty: series.is_empty(),
                    bars,
                });
            }
        }
        Self {
            granularity: options.granularity,
            cell_width: options.cell_width,
            rows,
        }
    }

    pub fn bars(&self) -> impl Iterator<Item = &Bar> {
        self.rows.iter().flat_map(|r| r.bars.iter())
    }

    pub fn bar(&self, task: &TaskRef) -> Option<&Bar> {
        self.bars().find(|b| &b.task == task)
    }

    pub fn row_index(&self, category: &CategoryId, series: &SeriesId) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| &r.category == category && &r.series == series)
    }

    pub fn pixel_box(&self, bar: &Bar) -> PixelBox {
        pixel_box(self.granularity, self.cell_width, bar.offset, bar.length)
    }

    pub fn degenerate_bars(&self) -> impl Iterator<Item = &Bar> {
        self.bars().filter(|b| b.degenerate)
    }

    pub fn conflict_count(&self) -> usize {
        self.bars().filter(|b| b.conflict).count()
    }
}
