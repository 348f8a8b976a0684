pub mod models;
#[cfg(test)]
mod tests;

use std::fs;
use std::ops::Index;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter as EnumIterDerive, EnumString};

use crate::config::models::{
    BoolConfigItem, ConfigEntry, ConfigItem, CountConfigItem, GranularityConfigItem,
    MinimumDaysConfigItem, WeekStartConfigItem,
};
use crate::core::types::Granularity;
use crate::engine::{Behavior, ChartOptions};
use crate::errors::{Error, Result};
use crate::extensions::enums::valid_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIterDerive, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigKey {
    Granularity,
    StackTasksPerRow,
    ShowWeekends,
    ShowNowMarker,
    AnchorToday,
    CellWidth,
    CellHeight,
    WeekStartDay,
    Clickable,
    Draggable,
    Resizable,
    ViewportWidth,
    HeaderWidth,
    MinimumDays,
    NowRefreshMs,
    FileLoggingEnabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub granularity: GranularityConfigItem,
    #[serde(default = "BoolConfigItem::stack_tasks_per_row")]
    pub stack_tasks_per_row: BoolConfigItem,
    #[serde(default = "BoolConfigItem::show_weekends")]
    pub show_weekends: BoolConfigItem,
    #[serde(default = "BoolConfigItem::show_now_marker")]
    pub show_now_marker: BoolConfigItem,
    #[serde(default = "BoolConfigItem::anchor_today")]
    pub anchor_today: BoolConfigItem,
    pub cell_width: CountConfigItem,
    #[serde(default = "CountConfigItem::cell_height")]
    pub cell_height: CountConfigItem,
    #[serde(default)]
    pub week_start_day: WeekStartConfigItem,
    #[serde(default = "BoolConfigItem::clickable")]
    pub clickable: BoolConfigItem,
    #[serde(default = "BoolConfigItem::draggable")]
    pub draggable: BoolConfigItem,
    #[serde(default = "BoolConfigItem::resizable")]
    pub resizable: BoolConfigItem,
    #[serde(default = "CountConfigItem::viewport_width")]
    pub viewport_width: CountConfigItem,
    #[serde(default = "CountConfigItem::header_width")]
    pub header_width: CountConfigItem,
    #[serde(default)]
    pub minimum_days: MinimumDaysConfigItem,
    #[serde(default = "CountConfigItem::now_refresh_ms")]
    pub now_refresh_ms: CountConfigItem,
    #[serde(default = "BoolConfigItem::file_logging_enabled")]
    pub file_logging_enabled: BoolConfigItem,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            granularity: GranularityConfigItem::default(),
            stack_tasks_per_row: BoolConfigItem::stack_tasks_per_row(),
            show_weekends: BoolConfigItem::show_weekends(),
            show_now_marker: BoolConfigItem::show_now_marker(),
            anchor_today: BoolConfigItem::anchor_today(),
            cell_width: CountConfigItem::cell_width(),
            cell_height: CountConfigItem::cell_height(),
            week_start_day: WeekStartConfigItem::default(),
            clickable: BoolConfigItem::clickable(),
            draggable: BoolConfigItem::draggable(),
            resizable: BoolConfigItem::resizable(),
            viewport_width: CountConfigItem::viewport_width(),
            header_width: CountConfigItem::header_width(),
            minimum_days: MinimumDaysConfigItem::default(),
            now_refresh_ms: CountConfigItem::now_refresh_ms(),
            file_logging_enabled: BoolConfigItem::file_logging_enabled(),
        }
    }
}

impl ConfigFile {
    fn entry(&self, key: ConfigKey) -> &dyn ConfigEntry {
        match key {
            ConfigKey::Granularity => &self.granularity,
            ConfigKey::StackTasksPerRow => &self.stack_tasks_per_row,
            ConfigKey::ShowWeekends => &self.show_weekends,
            ConfigKey::ShowNowMarker => &self.show_now_marker,
            ConfigKey::AnchorToday => &self.anchor_today,
            ConfigKey::CellWidth => &self.cell_width,
            ConfigKey::CellHeight => &self.cell_height,
            ConfigKey::WeekStartDay => &self.week_start_day,
            ConfigKey::Clickable => &self.clickable,
            ConfigKey::Draggable => &self.draggable,
            ConfigKey::Resizable => &self.resizable,
            ConfigKey::ViewportWidth => &self.viewport_width,
            ConfigKey::HeaderWidth => &self.header_width,
            ConfigKey::MinimumDays => &self.minimum_days,
            ConfigKey::NowRefreshMs => &self.now_refresh_ms,
            ConfigKey::FileLoggingEnabled => &self.file_logging_enabled,
        }
    }

    fn entry_mut(&mut self, key: ConfigKey) -> &mut dyn ConfigEntry {
        match key {
            ConfigKey::Granularity => &mut self.granularity,
            ConfigKey::StackTasksPerRow => &mut self.stack_tasks_per_row,
            ConfigKey::ShowWeekends => &mut self.show_weekends,
            ConfigKey::ShowNowMarker => &mut self.show_now_marker,
            ConfigKey::AnchorToday => &mut self.anchor_today,
            ConfigKey::CellWidth => &mut self.cell_width,
            ConfigKey::CellHeight => &mut self.cell_height,
            ConfigKey::WeekStartDay => &mut self.week_start_day,
            ConfigKey::Clickable => &mut self.clickable,
            ConfigKey::Draggable => &mut self.draggable,
            ConfigKey::Resizable => &mut self.resizable,
            ConfigKey::ViewportWidth => &mut self.viewport_width,
            ConfigKey::HeaderWidth => &mut self.header_width,
            ConfigKey::MinimumDays => &mut self.minimum_days,
            ConfigKey::NowRefreshMs => &mut self.now_refresh_ms,
            ConfigKey::FileLoggingEnabled => &mut self.file_logging_enabled,
        }
    }

    /// Numbers arrive from JSON unchecked; the setters reject zero, so the
    /// loader has to as well.
    fn validate(&self) -> Result<()> {
        let counts = [
            (ConfigKey::CellWidth, &self.cell_width),
            (ConfigKey::CellHeight, &self.cell_height),
            (ConfigKey::ViewportWidth, &self.viewport_width),
            (ConfigKey::HeaderWidth, &self.header_width),
            (ConfigKey::NowRefreshMs, &self.now_refresh_ms),
        ];
        for (key, item) in counts {
            if *item.get_value() == 0 {
                return Err(Error::Config(format!("{key} must be a positive whole number.")));
            }
        }
        if self.minimum_days.get_value() == &Some(0) {
            return Err(Error::Config(format!(
                "{} must be empty or a positive whole number.",
                ConfigKey::MinimumDays
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    data: ConfigFile,
    pub last_change: Option<(String, String, String)>,
}

#[derive(Debug, Clone)]
pub struct ConfigRows(Vec<(String, String, String)>);

impl ConfigRows {
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &(String, String, String)> {
        self.0.iter()
    }
    pub fn get(&self, index: usize) -> Option<&(String, String, String)> {
        self.0.get(index)
    }
}
impl Index<usize> for ConfigRows {
    type Output = (String, String, String);
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Config {
    pub fn load_default() -> Result<Self> {
        Self::load_from("config.json")
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file '{}' not found.",
                path.display()
            )));
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let data: ConfigFile = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("Invalid JSON in '{}': {}", path.display(), e)))?;
        data.validate()?;
        Ok(Self {
            path,
            data,
            last_change: None,
        })
    }

    /// Defaults bound to `path`; nothing is written until a setter runs.
    pub fn with_defaults<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            data: ConfigFile::default(),
            last_change: None,
        }
    }

    pub fn view(&self) -> &ConfigFile {
        &self.data
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn granularity(&self) -> Granularity {
        *self.data.granularity.get_value()
    }
    pub fn cell_width(&self) -> u32 {
        *self.data.cell_width.get_value()
    }
    pub fn minimum_days(&self) -> Option<u32> {
        *self.data.minimum_days.get_value()
    }
    pub fn file_logging_enabled(&self) -> bool {
        self.data.file_logging_enabled.get_value().0
    }

    pub fn chart_options(&self) -> ChartOptions {
        let d = &self.data;
        ChartOptions {
            granularity: *d.granularity.get_value(),
            stack_tasks_per_row: d.stack_tasks_per_row.get_value().0,
            show_weekends: d.show_weekends.get_value().0,
            show_now_marker: d.show_now_marker.get_value().0,
            anchor_today: d.anchor_today.get_value().0,
            cell_width: *d.cell_width.get_value(),
            cell_height: *d.cell_height.get_value(),
            week_start: d.week_start_day.get_value().0,
            behavior: Behavior {
                clickable: d.clickable.get_value().0,
                draggable: d.draggable.get_value().0,
                resizable: d.resizable.get_value().0,
            },
            viewport_width: *d.viewport_width.get_value(),
            header_width: *d.header_width.get_value(),
            minimum_days: *d.minimum_days.get_value(),
            now_refresh: Duration::from_millis(u64::from(*d.now_refresh_ms.get_value())),
        }
    }

    pub fn rows(&self) -> ConfigRows {
        let rows = ConfigKey::iter()
            .map(|key| {
                let entry = self.data.entry(key);
                (
                    key.to_string(),
                    entry.description().to_string(),
                    entry.value_string(),
                )
            })
            .collect();
        ConfigRows(rows)
    }

    pub fn set_by_index(&mut self, index: usize, new_value: &str) -> Result<()> {
        let key = ConfigKey::iter()
            .nth(index)
            .ok_or_else(|| Error::Parse(format!("Invalid ID: {index}")))?;
        self.set_key(key, new_value)
    }

    pub fn set_key(&mut self, key: ConfigKey, new_value: &str) -> Result<()> {
        let old = self.data.entry(key).value_string();
        self.edit(|cfg| cfg.entry_mut(key).set_value(new_value))?;
        let new_val = self.data.entry(key).value_string();
        self.last_change = Some((key.to_string(), old, new_val));
        Ok(())
    }

    pub fn take_last_change(&mut self) -> Option<(String, String, String)> {
        self.last_change.take()
    }

    pub fn set(&mut self, key_str: &str, new_value: &str) -> Result<()> {
        let key = Self::parse_key(key_str)?;
        self.set_key(key, new_value)
    }

    /// All pairs are applied to a scratch copy first, so one bad value
    /// leaves the config untouched.
    pub fn set_many<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut scratch = self.data.clone();
        for (k, v) in pairs {
            let key = Self::parse_key(k.as_ref())?;
            scratch.entry_mut(key).set_value(v.as_ref())?;
        }
        self.edit(|cfg| {
            *cfg = scratch;
            Ok(())
        })
    }

    fn parse_key(key_str: &str) -> Result<ConfigKey> {
        ConfigKey::from_str(key_str.trim()).map_err(|_| {
            Error::Parse(format!(
                "Unknown configuration key '{}'. Valid keys: {}",
                key_str,
                valid_csv::<ConfigKey>()
            ))
        })
    }

    fn edit<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ConfigFile) -> Result<()>,
    {
        let mut next = self.data.clone();
        f(&mut next)?;
        self.data = next;
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| Error::Config(format!("Failed to encode config: {}", e)))?;
        fs::write(&self.path, json)
            .map_err(|e| Error::Config(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}
