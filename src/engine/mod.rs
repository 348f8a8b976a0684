pub mod calendar;
pub mod date_math;
pub mod events;
pub mod layout;
pub mod mutator;
pub mod now;
pub mod range;

use std::fmt;
use std::time::Duration;

use chrono::{NaiveDateTime, Weekday};

use crate::core::clock::Clock;
use crate::core::ids::{CategoryId, SeriesId, TaskRef};
use crate::core::models::{Category, Task};
use crate::core::schedule::Schedule;
use crate::core::types::Granularity;
use crate::engine::calendar::CalendarGrid;
use crate::engine::events::{Capability, ChartEvent, EventOutcome, IgnoreReason};
use crate::engine::layout::{Bar, Layout, span_from_pixels};
use crate::engine::mutator::{MoveOutcome, NewTask, ScheduleMutator};
use crate::engine::now::{DEFAULT_REFRESH, NowMarker, NowTimer, locate_now};
use crate::engine::range::{Window, minimum_bucket_count, resolve};
use crate::logging::{LogTarget, Logger};

/// Global capability switches. A `false` here wins over any per-task option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Behavior {
    pub clickable: bool,
    pub draggable: bool,
    pub resizable: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            clickable: true,
            draggable: true,
            resizable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub granularity: Granularity,
    pub stack_tasks_per_row: bool,
    pub show_weekends: bool,
    pub show_now_marker: bool,
    pub anchor_today: bool,
    pub cell_width: u32,
    pub cell_height: u32,
    pub week_start: Weekday,
    pub behavior: Behavior,
    pub viewport_width: u32,
    pub header_width: u32,
    pub minimum_days: Option<u32>,
    pub now_refresh: Duration,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::Day,
            stack_tasks_per_row: true,
            show_weekends: true,
            show_now_marker: true,
            anchor_today: false,
            cell_width: 30,
            cell_height: 20,
            week_start: Weekday::Sun,
            behavior: Behavior::default(),
            viewport_width: 1200,
            header_width: 240,
            minimum_days: None,
            now_refresh: DEFAULT_REFRESH,
        }
    }
}

impl ChartOptions {
    pub fn minimum_bucket_count(&self) -> u32 {
        minimum_bucket_count(self)
    }
}

pub type TaskCallback = Box<dyn FnMut(&Task)>;

#[derive(Default)]
struct Callbacks {
    on_click: Option<TaskCallback>,
    on_drag: Option<TaskCallback>,
    on_resize: Option<TaskCallback>,
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub window: Window,
    pub grid: CalendarGrid,
    pub layout: Layout,
}

impl ChartView {
    fn compute(schedule: &Schedule, options: &ChartOptions, now: NaiveDateTime) -> Self {
        let window = resolve(
            schedule,
            options.minimum_bucket_count(),
            options.granularity,
            options.anchor_today,
            now,
        );
        let grid = CalendarGrid::build(&window, options.granularity);
        let layout = Layout::build(schedule, &window, options);
        Self {
            window,
            grid,
            layout,
        }
    }
}

/// One chart instance: data, options, computed view and now timer.
///
/// Every change to the data or options reruns the whole pipeline before
/// returning, so the view is always consistent with the schedule.
pub struct GanttChart {
    schedule: Schedule,
    options: ChartOptions,
    callbacks: Callbacks,
    clock: Box<dyn Clock>,
    logger: Logger,
    view: ChartView,
    now_marker: Option<NowMarker>,
    timer: NowTimer,
    selected: Option<TaskRef>,
}

impl fmt::Debug for GanttChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GanttChart")
            .field("options", &self.options)
            .field("window", &self.view.window)
            .field("rows", &self.view.layout.rows.len())
            .field("now_marker", &self.now_marker)
            .finish()
    }
}

impl GanttChart {
    pub fn new(
        schedule: Schedule,
        options: ChartOptions,
        clock: impl Clock + 'static,
        logger: Logger,
    ) -> Self {
        let now = clock.now();
        let view = ChartView::compute(&schedule, &options, now);
        let timer = NowTimer::new(options.now_refresh);
        let mut chart = Self {
            schedule,
            options,
            callbacks: Callbacks::default(),
            clock: Box::new(clock),
            logger,
            view,
            now_marker: None,
            timer,
            selected: None,
        };
        chart.after_rebuild(now);
        chart
    }

    /// Cancels the timer, drops the computed view and runs the pipeline
    /// again.
    pub fn reload(&mut self) {
        self.timer.cancel();
        self.now_marker = None;
        let now = self.clock.now();
        self.view = ChartView::compute(&self.schedule, &self.options, now);
        self.after_rebuild(now);
    }

    fn after_rebuild(&mut self, now: NaiveDateTime) {
        let view = &self.view;
        self.logger.debug(
            format!(
                "Window {} covers {} days in {} cells over {} rows.",
                view.window,
                view.grid.day_count(),
                view.grid.leaf_count(),
                view.layout.rows.len()
            ),
            LogTarget::FileOnly,
        );
        for bar in view.layout.degenerate_bars() {
            self.logger.warn(
                format!(
                    "Task {} ends before it starts ({}); drawn with zero length.",
                    bar.task, bar.interval
                ),
                LogTarget::FileOnly,
            );
        }
        let conflicts = view.layout.conflict_count();
        if conflicts > 0 {
            self.logger.debug(
                format!("{conflicts} bars overlap another bar in their row."),
                LogTarget::FileOnly,
            );
        }

        if self
            .selected
            .as_ref()
            .is_some_and(|s| self.schedule.task(s).is_none())
        {
            self.selected = None;
        }

        if self.options.show_now_marker {
            self.now_marker = locate_now(&self.view.grid, now);
            self.timer.set_interval(self.options.now_refresh);
            self.timer.arm(now);
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn view(&self) -> &ChartView {
        &self.view
    }

    pub fn window(&self) -> &Window {
        &self.view.window
    }

    pub fn grid(&self) -> &CalendarGrid {
        &self.view.grid
    }

    pub fn layout(&self) -> &Layout {
        &self.view.layout
    }

    pub fn now_marker(&self) -> Option<&NowMarker> {
        self.now_marker.as_ref()
    }

    pub fn selected(&self) -> Option<&TaskRef> {
        self.selected.as_ref()
    }

    pub fn timer(&self) -> &NowTimer {
        &self.timer
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn on_click(&mut self, f: impl FnMut(&Task) + 'static) {
        self.callbacks.on_click = Some(Box::new(f));
    }

    pub fn on_drag(&mut self, f: impl FnMut(&Task) + 'static) {
        self.callbacks.on_drag = Some(Box::new(f));
    }

    pub fn on_resize(&mut self, f: impl FnMut(&Task) + 'static) {
        self.callbacks.on_resize = Some(Box::new(f));
    }

    pub fn set_options(&mut self, options: ChartOptions) {
        self.options = options;
        self.reload();
    }

    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.schedule = schedule;
        self.reload();
    }

    /// Refreshes the now marker when the timer interval has elapsed.
    /// Returns whether a refresh happened.
    pub fn tick(&mut self, now: NaiveDateTime) -> bool {
        if !self.options.show_now_marker || !self.timer.due(now) {
            return false;
        }
        self.now_marker = locate_now(&self.view.grid, now);
        self.logger.debug(
            match &self.now_marker {
                Some(m) => format!("Now marker at cell {} (+{:.2}).", m.leaf_index, m.fraction),
                None => "Now is outside the window.".to_string(),
            },
            LogTarget::FileOnly,
        );
        true
    }

    /// Leaf index of the cell holding the current time, for scrolling.
    pub fn goto_now(&self) -> Option<usize> {
        locate_now(&self.view.grid, self.clock.now()).map(|m| m.leaf_index)
    }

    /// Stops the timer; the chart stays readable.
    pub fn teardown(&mut self) {
        self.timer.cancel();
        self.selected = None;
    }

    // ---- Mutations ----------------------------------------------------------

    pub fn add_task(
        &mut self,
        category: &CategoryId,
        series: &SeriesId,
        task: NewTask,
    ) -> Option<TaskRef> {
        let added = ScheduleMutator::new(&mut self.schedule).add_task(category, series, task);
        if let Some(r) = &added {
            self.logger.info(format!("Added task {r}."), LogTarget::FileOnly);
            self.reload();
        }
        added
    }

    pub fn delete_task(&mut self, task: &TaskRef) -> Option<Task> {
        let removed = ScheduleMutator::new(&mut self.schedule).delete_task(task);
        if removed.is_some() {
            self.logger.info(format!("Deleted task {task}."), LogTarget::FileOnly);
            self.reload();
        }
        removed
    }

    /// Deletes a bar, dropping its row in single-task mode when other rows
    /// remain.
    pub fn delete_block(&mut self, task: &TaskRef) -> Option<Task> {
        let stack = self.options.stack_tasks_per_row;
        let removed = ScheduleMutator::new(&mut self.schedule).delete_block(task, stack);
        if removed.is_some() {
            self.logger.info(format!("Deleted block {task}."), LogTarget::FileOnly);
            self.reload();
        }
        removed
    }

    pub fn move_task(
        &mut self,
        task: &TaskRef,
        target_category: &CategoryId,
        target_series: &SeriesId,
    ) -> MoveOutcome {
        let outcome =
            ScheduleMutator::new(&mut self.schedule).move_task(task, target_category, target_series);
        if outcome == MoveOutcome::Moved {
            self.logger.info(
                format!("Moved task {task} to {target_category}/{target_series}."),
                LogTarget::FileOnly,
            );
            self.reload();
        }
        outcome
    }

    pub fn retime_task(&mut self, task: &TaskRef, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let done = ScheduleMutator::new(&mut self.schedule).retime_task(task, start, end);
        if done {
            self.logger.info(
                format!(
                    "Retimed task {task} to {} .. {}.",
                    start.format("%Y-%m-%d %H:%M"),
                    end.format("%Y-%m-%d %H:%M")
                ),
                LogTarget::FileOnly,
            );
            self.reload();
        }
        done
    }

    pub fn add_category(
        &mut self,
        id: Option<CategoryId>,
        name: Option<String>,
        tip: Option<String>,
    ) -> CategoryId {
        let id = ScheduleMutator::new(&mut self.schedule).add_category(id, name, tip);
        self.logger.info(format!("Upserted category {id}."), LogTarget::FileOnly);
        self.reload();
        id
    }

    pub fn delete_category(&mut self, id: &CategoryId) -> Option<Category> {
        let removed = ScheduleMutator::new(&mut self.schedule).delete_category(id);
        if removed.is_some() {
            self.logger.info(format!("Deleted category {id}."), LogTarget::FileOnly);
            self.reload();
        }
        removed
    }

    pub fn add_series(
        &mut self,
        category: &CategoryId,
        id: Option<SeriesId>,
        name: Option<String>,
    ) -> Option<SeriesId> {
        let added = ScheduleMutator::new(&mut self.schedule).add_series(category, id, name);
        if let Some(id) = &added {
            self.logger.info(format!("Added series {category}/{id}."), LogTarget::FileOnly);
            self.reload();
        }
        added
    }

    pub fn delete_series(&mut self, category: &CategoryId, series: &SeriesId) -> bool {
        let done = ScheduleMutator::new(&mut self.schedule).delete_series(category, series);
        if done {
            self.logger.info(format!("Deleted series {category}/{series}."), LogTarget::FileOnly);
            self.reload();
        }
        done
    }

    pub fn clear_all(&mut self) {
        ScheduleMutator::new(&mut self.schedule).clear_all();
        self.logger.info("Cleared every row.", LogTarget::FileOnly);
        self.reload();
    }

    // ---- Events -------------------------------------------------------------

    pub fn handle(&mut self, event: ChartEvent) -> EventOutcome {
        let outcome = match &event {
            ChartEvent::BlockClicked { task } => self.click(task),
            ChartEvent::DragStopped { task, pixel_offset } => self.drag(task, *pixel_offset),
            ChartEvent::ResizeStopped {
                task,
                pixel_offset,
                pixel_width,
            } => self.resize(task, *pixel_offset, *pixel_width),
            ChartEvent::DroppedOnRow {
                task,
                target_category,
                target_series,
            } => self.drop_on_row(task, target_category, target_series),
        };
        if let EventOutcome::Ignored(reason) = outcome {
            self.logger.debug(
                format!("Ignored {event:?}: {reason:?}."),
                LogTarget::FileOnly,
            );
        }
        outcome
    }

    fn check_bar(&self, task: &TaskRef, capability: Capability) -> Result<&Bar, IgnoreReason> {
        if self.schedule.task(task).is_none() {
            return Err(IgnoreReason::UnknownTask);
        }
        let bar = self
            .view
            .layout
            .bar(task)
            .ok_or(IgnoreReason::NotLaidOut)?;
        let allowed = match capability {
            Capability::Click => bar.clickable,
            Capability::Drag => bar.draggable,
            Capability::Resize => bar.resizable,
        };
        if allowed {
            Ok(bar)
        } else {
            Err(IgnoreReason::Disabled(capability))
        }
    }

    fn fire(&mut self, capability: Capability, task: &TaskRef) {
        let callback = match capability {
            Capability::Click => self.callbacks.on_click.as_mut(),
            Capability::Drag => self.callbacks.on_drag.as_mut(),
            Capability::Resize => self.callbacks.on_resize.as_mut(),
        };
        if let (Some(callback), Some(task)) = (callback, self.schedule.task(task)) {
            callback(task);
        }
    }

    fn click(&mut self, task: &TaskRef) -> EventOutcome {
        if self.schedule.task(task).is_none() {
            return EventOutcome::Ignored(IgnoreReason::UnknownTask);
        }
        if !self.options.behavior.clickable {
            return EventOutcome::Ignored(IgnoreReason::Disabled(Capability::Click));
        }
        self.selected = Some(task.clone());
        self.fire(Capability::Click, task);
        EventOutcome::Applied
    }

    fn drag(&mut self, task: &TaskRef, pixel_offset: i64) -> EventOutcome {
        let interval = match self.check_bar(task, Capability::Drag) {
            Ok(bar) => bar.interval,
            Err(reason) => return EventOutcome::Ignored(reason),
        };
        let landed = span_from_pixels(
            self.view.window.start,
            self.options.granularity,
            self.options.cell_width,
            pixel_offset,
            0,
        );
        let duration = interval.end - interval.start;
        self.retime_task(task, landed.start, landed.start + duration);
        self.fire(Capability::Drag, task);
        EventOutcome::Applied
    }

    fn resize(&mut self, task: &TaskRef, pixel_offset: i64, pixel_width: i64) -> EventOutcome {
        if let Err(reason) = self.check_bar(task, Capability::Resize) {
            return EventOutcome::Ignored(reason);
        }
        let span = span_from_pixels(
            self.view.window.start,
            self.options.granularity,
            self.options.cell_width,
            pixel_offset,
            pixel_width,
        );
        self.retime_task(task, span.start, span.end);
        self.fire(Capability::Resize, task);
        EventOutcome::Applied
    }

    fn drop_on_row(
        &mut self,
        task: &TaskRef,
        target_category: &CategoryId,
        target_series: &SeriesId,
    ) -> EventOutcome {
        if let Err(reason) = self.check_bar(task, Capability::Drag) {
            return EventOutcome::Ignored(reason);
        }
        match self.move_task(task, target_category, target_series) {
            MoveOutcome::Moved => {
                let moved = self
                    .schedule
                    .series(target_category, target_series)
                    .and_then(|s| s.tasks().last())
                    .map(Task::task_ref);
                if let Some(moved) = moved {
                    self.fire(Capability::Drag, &moved);
                }
                EventOutcome::Applied
            }
            MoveOutcome::SameRow => EventOutcome::Ignored(IgnoreReason::SameRow),
            MoveOutcome::NotFound => EventOutcome::Ignored(IgnoreReason::UnknownTarget),
        }
    }
}
