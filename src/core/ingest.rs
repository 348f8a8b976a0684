use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::core::ids::{CategoryId, IdGenerator, SeriesId, TaskId};
use crate::core::models::{
    BlockOptions, Category, OptionOverrides, Series, SeriesBody, Task, UNNAMED,
};
use crate::core::schedule::Schedule;
use crate::core::types::ChartDate;
use crate::errors::{Error, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCategory {
    #[serde(rename = "cId", default)]
    pub id: Option<Value>,
    #[serde(rename = "cName", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tip: Option<String>,
    #[serde(default)]
    pub series: Vec<RawSeries>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSeries {
    #[serde(rename = "sId", default)]
    pub id: Option<Value>,
    #[serde(rename = "sName", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tip: Option<String>,
    #[serde(default)]
    pub start: Option<Value>,
    #[serde(default)]
    pub end: Option<Value>,
    #[serde(rename = "isTask", default)]
    pub is_task: Option<bool>,
    #[serde(default)]
    pub options: Option<OptionOverrides>,
    #[serde(default)]
    pub tasks: Option<Vec<RawTask>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTask {
    #[serde(rename = "tId", default)]
    pub id: Option<Value>,
    #[serde(rename = "tName", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tip: Option<String>,
    #[serde(default)]
    pub start: Option<Value>,
    #[serde(default)]
    pub end: Option<Value>,
    #[serde(rename = "isTask", default)]
    pub is_task: Option<bool>,
    #[serde(default)]
    pub options: Option<OptionOverrides>,
}

pub fn load_schedule_file<P: AsRef<Path>>(path: P) -> Result<Schedule> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::Parse(format!(
            "Schedule file '{}' not found.",
            path.display()
        )));
    }
    let text = fs::read_to_string(path)?;
    parse_schedule(&text)
}

pub fn parse_schedule(json: &str) -> Result<Schedule> {
    let raw: Vec<RawCategory> = serde_json::from_str(json)?;
    normalize(raw)
}

/// Turns source-shaped categories into a [`Schedule`].
///
/// Ids become canonical strings and missing ones are generated; dates are
/// parsed (sentinel years become unset); every category ends up with at
/// least one series, and each series is resolved into its [`SeriesBody`].
pub fn normalize(raw: Vec<RawCategory>) -> Result<Schedule> {
    let mut ids = IdGenerator::default();

    let supplied = raw
        .iter()
        .map(|c| canonical_id(c.id.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    let category_ids = assign_ids(supplied, &mut ids, "c", "category", "schedule")?;

    let mut categories = Vec::with_capacity(raw.len());
    for (raw_category, id) in raw.into_iter().zip(category_ids) {
        categories.push(normalize_category(raw_category, CategoryId::new(id), &mut ids)?);
    }

    Ok(Schedule::with_ids(categories, ids))
}

fn normalize_category(raw: RawCategory, id: CategoryId, ids: &mut IdGenerator) -> Result<Category> {
    let supplied = raw
        .series
        .iter()
        .map(|s| canonical_id(s.id.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    let scope = format!("category '{id}'");
    let series_ids = assign_ids(supplied, ids, "s", "series", &scope)?;

    let mut series = Vec::with_capacity(raw.series.len().max(1));
    for (raw_series, sid) in raw.series.into_iter().zip(series_ids) {
        series.push(normalize_series(raw_series, SeriesId::new(sid), &id, ids)?);
    }
    if series.is_empty() {
        series.push(Series::placeholder(
            SeriesId::new(ids.fresh("s", |_| false)),
            id.clone(),
        ));
    }

    Ok(Category {
        name: raw.name.unwrap_or_else(|| UNNAMED.to_string()),
        tip: raw.tip.unwrap_or_default(),
        id,
        series,
    })
}

fn normalize_series(
    raw: RawSeries,
    id: SeriesId,
    category_id: &CategoryId,
    ids: &mut IdGenerator,
) -> Result<Series> {
    let defaults = raw.options.unwrap_or_default();
    let owner = format!("series '{id}' in category '{category_id}'");
    let mut series = Series {
        id: id.clone(),
        category_id: category_id.clone(),
        name: raw.name.clone().unwrap_or_else(|| UNNAMED.to_string()),
        tip: raw.tip.clone().unwrap_or_default(),
        span: None,
        defaults,
        body: SeriesBody::Empty,
    };

    let raw_tasks = raw.tasks.unwrap_or_default();
    if !raw_tasks.is_empty() {
        let supplied = raw_tasks
            .iter()
            .map(|t| canonical_id(t.id.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let scope = format!("series '{id}'");
        let task_ids = assign_ids(supplied, ids, "t", "task", &scope)?;

        let mut tasks = Vec::with_capacity(raw_tasks.len());
        for (raw_task, tid) in raw_tasks.into_iter().zip(task_ids) {
            let owner = format!("task '{tid}' in series '{id}'");
            tasks.push(Task {
                id: TaskId::new(tid),
                series_id: id.clone(),
                category_id: category_id.clone(),
                name: raw_task.name.unwrap_or_else(|| UNNAMED.to_string()),
                tip: raw_task.tip.unwrap_or_default(),
                start: parse_date_value(raw_task.start.as_ref(), &owner, "start")?,
                end: parse_date_value(raw_task.end.as_ref(), &owner, "end")?,
                is_task: raw_task.is_task.unwrap_or(true),
                options: BlockOptions::merged(
                    &series.defaults,
                    &raw_task.options.unwrap_or_default(),
                ),
            });
        }
        series.body = SeriesBody::MultiTask(tasks);
    } else {
        let start = parse_date_value(raw.start.as_ref(), &owner, "start")?;
        let end = parse_date_value(raw.end.as_ref(), &owner, "end")?;
        let own_span = start.is_some() || end.is_some();
        if raw.is_task.unwrap_or(false) && own_span {
            series.body = SeriesBody::SingleTask(Box::new(Task {
                id: TaskId::new(id.as_str()),
                series_id: id.clone(),
                category_id: category_id.clone(),
                name: series.name.clone(),
                tip: series.tip.clone(),
                start,
                end,
                is_task: true,
                options: BlockOptions::merged(&series.defaults, &OptionOverrides::default()),
            }));
        }
    }

    if series.is_empty() {
        series.reset_to_placeholder();
    } else {
        series.refresh_span();
    }
    Ok(series)
}

/// Keeps supplied ids (rejecting duplicates) and fills the gaps from `ids`.
fn assign_ids(
    supplied: Vec<Option<String>>,
    ids: &mut IdGenerator,
    prefix: &str,
    kind: &'static str,
    scope: &str,
) -> Result<Vec<String>> {
    let mut taken = HashSet::new();
    for id in supplied.iter().flatten() {
        if !taken.insert(id.clone()) {
            return Err(Error::DuplicateId {
                kind,
                id: id.clone(),
                scope: scope.to_string(),
            });
        }
    }

    let mut out = Vec::with_capacity(supplied.len());
    for id in supplied {
        match id {
            Some(id) => out.push(id),
            None => {
                let fresh = ids.fresh(prefix, |candidate| taken.contains(candidate));
                taken.insert(fresh.clone());
                out.push(fresh);
            }
        }
    }
    Ok(out)
}

/// Strings are trimmed, integral numbers are printed without a fraction.
pub fn canonical_id(value: Option<&Value>) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i.to_string()))
            } else if let Some(u) = n.as_u64() {
                Ok(Some(u.to_string()))
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Ok(Some((f as i64).to_string()))
                    }
                    _ => Ok(Some(n.to_string())),
                }
            }
        }
        Some(other) => Err(Error::Parse(format!("Unsupported id value: {other}"))),
    }
}

/// Accepts date strings and epoch milliseconds; sentinel years mean unset.
pub fn parse_date_value(
    value: Option<&Value>,
    owner: &str,
    field: &'static str,
) -> Result<Option<NaiveDateTime>> {
    let date = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => {
            ChartDate::try_from_str(s).map_err(|_| Error::invalid_date(owner, field, s.as_str()))?
        }
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(ChartDate::from_epoch_millis)
            .ok_or_else(|| Error::invalid_date(owner, field, n.to_string()))?,
        Some(other) => return Err(Error::invalid_date(owner, field, other.to_string())),
    };

    if date.is_unset_sentinel() {
        Ok(None)
    } else {
        Ok(Some(date.0))
    }
}
