use std::collections::HashMap;

use crate::core::ids::{CategoryId, IdGenerator, SeriesId, TaskId, TaskRef};
use crate::core::models::{Category, Series, Task};

type SeriesKey = (CategoryId, SeriesId);

#[derive(Debug, Clone, Default)]
struct ScheduleIndex {
    categories: HashMap<CategoryId, usize>,
    series: HashMap<SeriesKey, (usize, usize)>,
    tasks: HashMap<TaskRef, (usize, usize, usize)>,
}

impl ScheduleIndex {
    fn build(categories: &[Category]) -> Self {
        let mut index = Self::default();
        for (ci, category) in categories.iter().enumerate() {
            index.categories.insert(category.id.clone(), ci);
            for (si, series) in category.series.iter().enumerate() {
                index
                    .series
                    .insert((category.id.clone(), series.id.clone()), (ci, si));
                for (ti, task) in series.tasks().iter().enumerate() {
                    let key = TaskRef::new(category.id.clone(), series.id.clone(), task.id.clone());
                    index.tasks.insert(key, (ci, si, ti));
                }
            }
        }
        index
    }
}

/// The normalized category → series → task tree plus lookup maps.
///
/// The maps hold positions, so every structural change goes through
/// [`Schedule::reindex`] before the next lookup.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pub(crate) categories: Vec<Category>,
    index: ScheduleIndex,
    pub(crate) ids: IdGenerator,
}

impl Schedule {
    pub fn new(categories: Vec<Category>) -> Self {
        Self::with_ids(categories, IdGenerator::default())
    }

    pub(crate) fn with_ids(categories: Vec<Category>, ids: IdGenerator) -> Self {
        let index = ScheduleIndex::build(&categories);
        Self {
            categories,
            index,
            ids,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        let ci = *self.index.categories.get(id)?;
        self.categories.get(ci)
    }

    pub(crate) fn category_mut(&mut self, id: &CategoryId) -> Option<&mut Category> {
        let ci = *self.index.categories.get(id)?;
        self.categories.get_mut(ci)
    }

    pub fn series(&self, category: &CategoryId, series: &SeriesId) -> Option<&Series> {
        let (ci, si) = *self
            .index
            .series
            .get(&(category.clone(), series.clone()))?;
        self.categories.get(ci)?.series.get(si)
    }

    pub(crate) fn series_mut(
        &mut self,
        category: &CategoryId,
        series: &SeriesId,
    ) -> Option<&mut Series> {
        let (ci, si) = *self
            .index
            .series
            .get(&(category.clone(), series.clone()))?;
        self.categories.get_mut(ci)?.series.get_mut(si)
    }

    pub fn task(&self, task: &TaskRef) -> Option<&Task> {
        let (ci, si, ti) = *self.index.tasks.get(task)?;
        self.categories.get(ci)?.series.get(si)?.tasks().get(ti)
    }

    pub(crate) fn task_mut(&mut self, task: &TaskRef) -> Option<&mut Task> {
        let (ci, si, ti) = *self.index.tasks.get(task)?;
        self.categories
            .get_mut(ci)?
            .series
            .get_mut(si)?
            .body
            .tasks_mut()
            .get_mut(ti)
    }

    /// Every task in category, series, task order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.categories
            .iter()
            .flat_map(|c| c.series.iter())
            .flat_map(|s| s.tasks().iter())
    }

    pub fn task_count(&self) -> usize {
        self.index.tasks.len()
    }

    pub fn series_count(&self) -> usize {
        self.index.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub(crate) fn reindex(&mut self) {
        self.index = ScheduleIndex::build(&self.categories);
    }

    pub(crate) fn fresh_category_id(&mut self) -> CategoryId {
        let index = &self.index;
        CategoryId::new(self.ids.fresh("c", |id| {
            index.categories.contains_key(&CategoryId::from(id))
        }))
    }

    pub(crate) fn fresh_series_id(&mut self, category: &CategoryId) -> SeriesId {
        let index = &self.index;
        SeriesId::new(self.ids.fresh("s", |id| {
            index
                .series
                .contains_key(&(category.clone(), SeriesId::from(id)))
        }))
    }

    pub(crate) fn fresh_task_id(
        &mut self,
        category: &CategoryId,
        series: &SeriesId,
    ) -> TaskId {
        let index = &self.index;
        TaskId::new(self.ids.fresh("t", |id| {
            index
                .tasks
                .contains_key(&TaskRef::new(category.clone(), series.clone(), id))
        }))
    }
}
