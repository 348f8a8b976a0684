use crate::core::ids::{CategoryId, SeriesId, TaskId, TaskRef};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const EMPTY_SERIES_NAME: &str = "No tasks";
pub const EMPTY_SERIES_TIP: &str = "Empty Tasks";
pub const UNNAMED: &str = "No Name";

/// A closed pair of instants. `end < start` is representable on purpose;
/// layout flags it instead of rejecting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn is_degenerate(&self) -> bool {
        self.end < self.start
    }

    /// Strict overlap: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }

    pub fn union(&self, other: &Interval) -> Interval {
        Interval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Partial options as they appear on a series or task in the source data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resizable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl OptionOverrides {
    /// Fields set on `self` win over `base`.
    pub fn over(&self, base: &OptionOverrides) -> OptionOverrides {
        OptionOverrides {
            draggable: self.draggable.or(base.draggable),
            resizable: self.resizable.or(base.resizable),
            color: self.color.clone().or_else(|| base.color.clone()),
        }
    }
}

/// Effective per-task options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOptions {
    pub draggable: bool,
    pub resizable: bool,
    pub color: Option<String>,
}

impl Default for BlockOptions {
    fn default() -> Self {
        Self {
            draggable: true,
            resizable: true,
            color: None,
        }
    }
}

impl BlockOptions {
    /// Defaults, then series overrides, then task overrides.
    pub fn merged(series: &OptionOverrides, task: &OptionOverrides) -> Self {
        let merged = task.over(series);
        let defaults = BlockOptions::default();
        Self {
            draggable: merged.draggable.unwrap_or(defaults.draggable),
            resizable: merged.resizable.unwrap_or(defaults.resizable),
            color: merged.color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub series_id: SeriesId,
    pub category_id: CategoryId,
    pub name: String,
    pub tip: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub is_task: bool,
    pub options: BlockOptions,
}

impl Task {
    /// Both endpoints set; tasks without one are unscheduled and get no bar.
    pub fn interval(&self) -> Option<Interval> {
        Some(Interval::new(self.start?, self.end?))
    }

    pub fn task_ref(&self) -> TaskRef {
        TaskRef {
            category: self.category_id.clone(),
            series: self.series_id.clone(),
            task: self.id.clone(),
        }
    }
}

/// What a series row holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SeriesBody {
    #[default]
    Empty,
    /// The series acts as its own bar; the task id equals the series id.
    SingleTask(Box<Task>),
    MultiTask(Vec<Task>),
}

impl SeriesBody {
    pub fn tasks(&self) -> &[Task] {
        match self {
            SeriesBody::Empty => &[],
            SeriesBody::SingleTask(task) => std::slice::from_ref(task.as_ref()),
            SeriesBody::MultiTask(tasks) => tasks,
        }
    }

    pub fn tasks_mut(&mut self) -> &mut [Task] {
        match self {
            SeriesBody::Empty => &mut [],
            SeriesBody::SingleTask(task) => std::slice::from_mut(task.as_mut()),
            SeriesBody::MultiTask(tasks) => tasks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks().is_empty()
    }

    pub fn push(&mut self, task: Task) {
        *self = match std::mem::take(self) {
            SeriesBody::Empty => SeriesBody::MultiTask(vec![task]),
            SeriesBody::SingleTask(existing) => SeriesBody::MultiTask(vec![*existing, task]),
            SeriesBody::MultiTask(mut tasks) => {
                tasks.push(task);
                SeriesBody::MultiTask(tasks)
            }
        };
    }

    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        match std::mem::take(self) {
            SeriesBody::Empty => None,
            SeriesBody::SingleTask(task) if &task.id == id => Some(*task),
            SeriesBody::SingleTask(task) => {
                *self = SeriesBody::SingleTask(task);
                None
            }
            SeriesBody::MultiTask(mut tasks) => {
                let removed = tasks
                    .iter()
                    .position(|t| &t.id == id)
                    .map(|pos| tasks.remove(pos));
                if !tasks.is_empty() {
                    *self = SeriesBody::MultiTask(tasks);
                }
                removed
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub id: SeriesId,
    pub category_id: CategoryId,
    pub name: String,
    pub tip: String,
    /// Union of the scheduled task spans; `None` when empty.
    pub span: Option<Interval>,
    /// Defaults applied to tasks added to this row later.
    pub defaults: OptionOverrides,
    pub body: SeriesBody,
}

impl Series {
    pub fn placeholder(id: SeriesId, category_id: CategoryId) -> Self {
        let mut series = Self {
            id,
            category_id,
            name: String::new(),
            tip: String::new(),
            span: None,
            defaults: OptionOverrides::default(),
            body: SeriesBody::Empty,
        };
        series.reset_to_placeholder();
        series
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        self.body.tasks()
    }

    pub fn is_placeholder_named(&self) -> bool {
        self.name == EMPTY_SERIES_NAME || self.name == UNNAMED || self.name.is_empty()
    }

    pub fn reset_to_placeholder(&mut self) {
        self.body = SeriesBody::Empty;
        self.name = EMPTY_SERIES_NAME.to_string();
        self.tip = EMPTY_SERIES_TIP.to_string();
        self.span = None;
    }

    pub fn refresh_span(&mut self) {
        self.span = self
            .tasks()
            .iter()
            .filter_map(Task::interval)
            .reduce(|acc, iv| acc.union(&iv));
    }

    /// Re-stamps parent ids on every task after a move or rename.
    pub fn restamp(&mut self) {
        let (series_id, category_id) = (self.id.clone(), self.category_id.clone());
        for task in self.body.tasks_mut() {
            task.series_id = series_id.clone();
            task.category_id = category_id.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub tip: String,
    pub series: Vec<Series>,
}

impl Category {
    pub fn task_count(&self) -> usize {
        self.series.iter().map(|s| s.tasks().len()).sum()
    }
}
