use chrono::NaiveDateTime;

use crate::core::ids::{CategoryId, SeriesId, TaskRef};
use crate::core::models::{
    BlockOptions, Category, OptionOverrides, Series, Task, UNNAMED,
};
use crate::core::schedule::Schedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Source and target are the same row; nothing changes.
    SameRow,
    NotFound,
}

/// A task to add; `None` fields take the placeholder or series defaults.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub tip: Option<String>,
    pub options: OptionOverrides,
}

/// Structural edits on a [`Schedule`].
///
/// Every method keeps the lookup maps in sync before returning. Failures
/// are reported through the return value.
pub struct ScheduleMutator<'a> {
    schedule: &'a mut Schedule,
}

impl<'a> ScheduleMutator<'a> {
    pub fn new(schedule: &'a mut Schedule) -> Self {
        Self { schedule }
    }

    pub fn find_category(&self, id: &CategoryId) -> Option<&Category> {
        self.schedule.category(id)
    }

    pub fn find_series(&self, category: &CategoryId, series: &SeriesId) -> Option<&Series> {
        self.schedule.series(category, series)
    }

    pub fn find_task(&self, task: &TaskRef) -> Option<&Task> {
        self.schedule.task(task)
    }

    /// Appends a task under `category`/`series`, creating a "No Name" series
    /// when the series id is unknown. `None` when the category is unknown.
    pub fn add_task(
        &mut self,
        category: &CategoryId,
        series: &SeriesId,
        task: NewTask,
    ) -> Option<TaskRef> {
        self.schedule.category(category)?;
        if self.schedule.series(category, series).is_none() {
            let mut created = Series::placeholder(series.clone(), category.clone());
            created.name = UNNAMED.to_string();
            self.schedule.category_mut(category)?.series.push(created);
            self.schedule.reindex();
        }

        let id = self.schedule.fresh_task_id(category, series);
        let target = self.schedule.series_mut(category, series)?;
        let was_empty = target.is_empty();
        let title = task.title.unwrap_or_else(|| UNNAMED.to_string());
        let new_task = Task {
            id: id.clone(),
            series_id: series.clone(),
            category_id: category.clone(),
            name: title.clone(),
            tip: task.tip.unwrap_or_default(),
            start: task.start,
            end: task.end,
            is_task: true,
            options: BlockOptions::merged(&target.defaults, &task.options),
        };
        if was_empty {
            target.name = title;
            target.tip = new_task.tip.clone();
        }
        target.body.push(new_task);
        target.refresh_span();
        self.schedule.reindex();
        Some(TaskRef::new(category.clone(), series.clone(), id))
    }

    /// Removes a task; an emptied series becomes a placeholder row.
    pub fn delete_task(&mut self, task: &TaskRef) -> Option<Task> {
        let series = self.schedule.series_mut(&task.category, &task.series)?;
        let removed = series.body.remove(&task.task)?;
        if series.is_empty() {
            series.reset_to_placeholder();
        } else {
            series.refresh_span();
        }
        self.schedule.reindex();
        Some(removed)
    }

    /// Deletes the bar behind `task`. In single-task mode the emptied row
    /// goes away too, unless it is the category's last one.
    pub fn delete_block(&mut self, task: &TaskRef, stack_tasks_per_row: bool) -> Option<Task> {
        let removed = self.delete_task(task)?;
        if !stack_tasks_per_row {
            let emptied = self
                .schedule
                .series(&task.category, &task.series)
                .is_some_and(Series::is_empty);
            let rows = self
                .schedule
                .category(&task.category)
                .map_or(0, |c| c.series.len());
            if emptied && rows > 1 {
                self.delete_series(&task.category, &task.series);
            }
        }
        Some(removed)
    }

    pub fn move_task(
        &mut self,
        task: &TaskRef,
        target_category: &CategoryId,
        target_series: &SeriesId,
    ) -> MoveOutcome {
        if &task.category == target_category && &task.series == target_series {
            return MoveOutcome::SameRow;
        }
        if self.schedule.task(task).is_none()
            || self.schedule.series(target_category, target_series).is_none()
        {
            return MoveOutcome::NotFound;
        }
        let Some(mut moved) = self.delete_task(task) else {
            return MoveOutcome::NotFound;
        };

        let taken = self
            .schedule
            .task(&TaskRef::new(
                target_category.clone(),
                target_series.clone(),
                moved.id.clone(),
            ))
            .is_some();
        if taken {
            moved.id = self.schedule.fresh_task_id(target_category, target_series);
        }

        let Some(target) = self.schedule.series_mut(target_category, target_series) else {
            return MoveOutcome::NotFound;
        };
        if target.is_empty() && target.is_placeholder_named() && !moved.name.is_empty() {
            target.name = moved.name.clone();
            target.tip = moved.tip.clone();
        }
        target.body.push(moved);
        target.restamp();
        target.refresh_span();
        self.schedule.reindex();
        MoveOutcome::Moved
    }

    /// Overwrites start and end. No ordering check.
    pub fn retime_task(
        &mut self,
        task: &TaskRef,
        new_start: NaiveDateTime,
        new_end: NaiveDateTime,
    ) -> bool {
        let Some(found) = self.schedule.task_mut(task) else {
            return false;
        };
        found.start = Some(new_start);
        found.end = Some(new_end);
        if let Some(series) = self.schedule.series_mut(&task.category, &task.series) {
            series.refresh_span();
        }
        true
    }

    /// Creates a category, or renames it when `id` already exists. A new
    /// category gets one empty row.
    pub fn add_category(
        &mut self,
        id: Option<CategoryId>,
        name: Option<String>,
        tip: Option<String>,
    ) -> CategoryId {
        let id = id.unwrap_or_else(|| self.schedule.fresh_category_id());
        if let Some(existing) = self.schedule.category_mut(&id) {
            if let Some(name) = name {
                existing.name = name;
            }
            if let Some(tip) = tip {
                existing.tip = tip;
            }
            return id;
        }

        let series_id = self.schedule.fresh_series_id(&id);
        self.schedule.categories.push(Category {
            id: id.clone(),
            name: name.unwrap_or_else(|| UNNAMED.to_string()),
            tip: tip.unwrap_or_default(),
            series: vec![Series::placeholder(series_id, id.clone())],
        });
        self.schedule.reindex();
        id
    }

    pub fn delete_category(&mut self, id: &CategoryId) -> Option<Category> {
        let pos = self.schedule.categories.iter().position(|c| &c.id == id)?;
        let removed = self.schedule.categories.remove(pos);
        self.schedule.reindex();
        Some(removed)
    }

    /// Adds an empty row under `category`. `None` when the category is
    /// unknown or the series id is taken.
    pub fn add_series(
        &mut self,
        category: &CategoryId,
        id: Option<SeriesId>,
        name: Option<String>,
    ) -> Option<SeriesId> {
        self.schedule.category(category)?;
        let id = match id {
            Some(id) if self.schedule.series(category, &id).is_some() => return None,
            Some(id) => id,
            None => self.schedule.fresh_series_id(category),
        };
        let mut series = Series::placeholder(id.clone(), category.clone());
        if let Some(name) = name {
            series.name = name;
        }
        self.schedule.category_mut(category)?.series.push(series);
        self.schedule.reindex();
        Some(id)
    }

    /// Removes a row. The last row of a category is reset instead, since
    /// a category always keeps one.
    pub fn delete_series(&mut self, category: &CategoryId, series: &SeriesId) -> bool {
        let Some(owner) = self.schedule.category_mut(category) else {
            return false;
        };
        let Some(pos) = owner.series.iter().position(|s| &s.id == series) else {
            return false;
        };
        if owner.series.len() == 1 {
            owner.series[pos].reset_to_placeholder();
        } else {
            owner.series.remove(pos);
        }
        self.schedule.reindex();
        true
    }

    /// Empties every row but keeps the rows themselves.
    pub fn clear_all(&mut self) {
        for series in self
            .schedule
            .categories
            .iter_mut()
            .flat_map(|c| c.series.iter_mut())
        {
            series.reset_to_placeholder();
        }
        self.schedule.reindex();
    }
}
