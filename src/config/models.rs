use crate::core::types::{Bool, Granularity, WeekStartDay};
use crate::errors::Error;
use serde::{Deserialize, Serialize};

/// Object-safe view of a config item, used for listing and editing by key.
pub trait ConfigEntry {
    fn set_value(&mut self, new_value: &str) -> Result<(), Error>;
    fn description(&self) -> &str;
    fn value_string(&self) -> String;
}

pub trait ConfigItem<T>: ConfigEntry {
    fn get_value(&self) -> &T;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GranularityConfigItem {
    pub value: Granularity,
    pub description: String,
}
impl Default for GranularityConfigItem {
    fn default() -> Self {
        Self {
            value: Granularity::Day,
            description: "Grid resolution: one cell per day or per hour.".into(),
        }
    }
}
impl ConfigEntry for GranularityConfigItem {
    fn set_value(&mut self, new_value: &str) -> Result<(), Error> {
        self.value = Granularity::try_from(new_value)?;
        Ok(())
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn value_string(&self) -> String {
        self.value.to_string()
    }
}
impl ConfigItem<Granularity> for GranularityConfigItem {
    fn get_value(&self) -> &Granularity {
        &self.value
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoolConfigItem {
    pub value: Bool,
    pub description: String,
}
impl BoolConfigItem {
    fn with(value: bool, description: &str) -> Self {
        Self {
            value: Bool(value),
            description: description.into(),
        }
    }

    pub fn stack_tasks_per_row() -> Self {
        Self::with(true, "Lay out every task of a series in its row.")
    }
    pub fn show_weekends() -> Self {
        Self::with(true, "Flag Saturday and Sunday columns in day headers.")
    }
    pub fn show_now_marker() -> Self {
        Self::with(true, "Place a marker at the current time.")
    }
    pub fn anchor_today() -> Self {
        Self::with(false, "Always include today in the visible window.")
    }
    pub fn clickable() -> Self {
        Self::with(true, "Allow bars to be clicked.")
    }
    pub fn draggable() -> Self {
        Self::with(true, "Allow bars to be dragged in time or onto another row.")
    }
    pub fn resizable() -> Self {
        Self::with(true, "Allow bars to be resized.")
    }
    pub fn file_logging_enabled() -> Self {
        Self::with(true, "Enable writing log messages to file.")
    }
}
impl ConfigEntry for BoolConfigItem {
    fn set_value(&mut self, new_value: &str) -> Result<(), Error> {
        self.value = Bool::try_from_str(new_value)?;
        Ok(())
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn value_string(&self) -> String {
        self.value.to_string()
    }
}
impl ConfigItem<Bool> for BoolConfigItem {
    fn get_value(&self) -> &Bool {
        &self.value
    }
}

/// A strictly positive whole number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountConfigItem {
    pub value: u32,
    pub description: String,
}
impl CountConfigItem {
    fn with(value: u32, description: &str) -> Self {
        Self {
            value,
            description: description.into(),
        }
    }

    pub fn cell_width() -> Self {
        Self::with(30, "Width of one grid cell in pixels.")
    }
    pub fn cell_height() -> Self {
        Self::with(20, "Minimum height of a row in pixels.")
    }
    pub fn viewport_width() -> Self {
        Self::with(1200, "Width available to the chart in pixels.")
    }
    pub fn header_width() -> Self {
        Self::with(240, "Width of the row header column in pixels.")
    }
    pub fn now_refresh_ms() -> Self {
        Self::with(15_000, "Interval between now marker refreshes in milliseconds.")
    }

    pub fn parse(new_value: &str) -> Result<u32, Error> {
        match new_value.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(Error::Parse(format!(
                "Invalid value: '{}'. Expected a positive whole number.",
                new_value.trim()
            ))),
        }
    }
}
impl ConfigEntry for CountConfigItem {
    fn set_value(&mut self, new_value: &str) -> Result<(), Error> {
        self.value = Self::parse(new_value)?;
        Ok(())
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn value_string(&self) -> String {
        self.value.to_string()
    }
}
impl ConfigItem<u32> for CountConfigItem {
    fn get_value(&self) -> &u32 {
        &self.value
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekStartConfigItem {
    pub value: WeekStartDay,
    pub description: String,
}
impl Default for WeekStartConfigItem {
    fn default() -> Self {
        Self {
            value: WeekStartDay::default(),
            description: "First day of the week, 0 (Sunday) through 6 (Saturday).".into(),
        }
    }
}
impl ConfigEntry for WeekStartConfigItem {
    fn set_value(&mut self, new_value: &str) -> Result<(), Error> {
        self.value = WeekStartDay::try_from_str(new_value)?;
        Ok(())
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn value_string(&self) -> String {
        self.value.to_string()
    }
}
impl ConfigItem<WeekStartDay> for WeekStartConfigItem {
    fn get_value(&self) -> &WeekStartDay {
        &self.value
    }
}

/// Empty means "derive from the viewport".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimumDaysConfigItem {
    pub value: Option<u32>,
    pub description: String,
}
impl Default for MinimumDaysConfigItem {
    fn default() -> Self {
        Self {
            value: None,
            description: "Minimum number of days shown; empty derives it from the viewport."
                .into(),
        }
    }
}
impl ConfigEntry for MinimumDaysConfigItem {
    fn set_value(&mut self, new_value: &str) -> Result<(), Error> {
        let trimmed = new_value.trim();
        self.value = if trimmed.is_empty() || trimmed == "-" {
            None
        } else {
            Some(CountConfigItem::parse(trimmed)?)
        };
        Ok(())
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn value_string(&self) -> String {
        self.value
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}
impl ConfigItem<Option<u32>> for MinimumDaysConfigItem {
    fn get_value(&self) -> &Option<u32> {
        &self.value
    }
}
