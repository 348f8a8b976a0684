use crate::errors::{Error, Result};
use crate::extensions::chrono::{WeekdayExt, weekday_from_sunday_index};
use crate::extensions::enums::valid_csv;
use crate::extensions::string::ToDashSeparators;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter as EnumIterDerive, EnumString};

/// Cell resolution of the chart.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumString,
    Display,
    AsRefStr,
    EnumIterDerive,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[strum(serialize = "hour", to_string = "hour")]
    Hour,
    #[default]
    #[strum(serialize = "day", to_string = "day")]
    Day,
}

impl Granularity {
    pub fn try_from(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| {
            Error::Parse(format!(
                "Invalid granularity: '{}'. Valid values: {}",
                s.trim(),
                valid_csv::<Granularity>()
            ))
        })
    }

    /// Leaf cells per calendar day.
    pub fn cells_per_day(self) -> u32 {
        match self {
            Granularity::Hour => 24,
            Granularity::Day => 1,
        }
    }
}

/// First day of the week, stored as a Sunday-based index (0 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekStartDay(pub Weekday);

impl Default for WeekStartDay {
    fn default() -> Self {
        WeekStartDay(Weekday::Sun)
    }
}

impl WeekStartDay {
    pub fn try_from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_index)
            .ok_or_else(|| {
                Error::Parse(format!(
                    "Invalid week start day: '{}'. Expected 0 (Sunday) through 6 (Saturday).",
                    s.trim()
                ))
            })
    }

    pub fn from_index(index: u8) -> Option<Self> {
        weekday_from_sunday_index(index).map(WeekStartDay)
    }

    pub fn index(self) -> u8 {
        self.0.sunday_index()
    }
}

impl fmt::Display for WeekStartDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.index(), self.0)
    }
}

impl Serialize for WeekStartDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index())
    }
}

impl<'de> Deserialize<'de> for WeekStartDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let index = u8::deserialize(deserializer)?;
        WeekStartDay::from_index(index).ok_or_else(|| {
            serde::de::Error::custom(format!("week start day {index} is outside 0..=6"))
        })
    }
}

/// A chart date: a wall-clock instant without an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChartDate(pub NaiveDateTime);

#[derive(Copy, Clone, Debug, EnumIterDerive, AsRefStr)]
pub enum DateTimeFormat {
    #[strum(serialize = "%Y-%m-%d %H:%M:%S")]
    YmdHms,
    #[strum(serialize = "%Y-%m-%d %H:%M:%S%.f")]
    YmdHmsFrac,
    #[strum(serialize = "%Y-%m-%d %H:%M")]
    YmdHm,
    #[strum(serialize = "%Y-%m-%d")]
    Ymd,
}

impl DateTimeFormat {
    fn parse(self, input: &str) -> Option<NaiveDateTime> {
        match self {
            DateTimeFormat::Ymd => NaiveDate::parse_from_str(input, self.as_ref())
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
            _ => NaiveDateTime::parse_from_str(input, self.as_ref()).ok(),
        }
    }
}

impl ChartDate {
    pub fn usage() -> String {
        let now = Local::now().naive_local();
        let formats = DateTimeFormat::iter()
            .filter(|f| !matches!(f, DateTimeFormat::YmdHmsFrac))
            .map(|f| now.format(f.as_ref()).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Supported formats: {formats}, RFC 3339")
    }

    fn error_message(input: &str) -> String {
        format!("Invalid date format: '{}'. {}", input, Self::usage())
    }

    pub fn try_from_str(input: &str) -> Result<Self> {
        let raw = input.trim();
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Ok(ChartDate(dt.with_timezone(&Local).naive_local()));
        }

        let normalized = raw.to_dash_separators();
        DateTimeFormat::iter()
            .find_map(|f| f.parse(&normalized))
            .map(ChartDate)
            .ok_or_else(|| Error::Parse(Self::error_message(raw)))
    }

    /// Interprets epoch milliseconds in the local zone.
    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        Local
            .timestamp_millis_opt(millis)
            .single()
            .map(|dt| ChartDate(dt.naive_local()))
    }

    /// Years the data source uses to say "no date".
    pub fn is_unset_sentinel(&self) -> bool {
        matches!(self.0.year(), 1901 | 8099)
    }
}

impl fmt::Display for ChartDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIterDerive)]
#[strum(ascii_case_insensitive)]
pub enum BoolFormat {
    #[strum(serialize = "true", serialize = "True", to_string = "True")]
    TextTrue,

    #[strum(serialize = "false", serialize = "False", to_string = "False")]
    TextFalse,
}

impl BoolFormat {
    #[inline]
    fn to_bool(self) -> bool {
        matches!(self, BoolFormat::TextTrue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bool(pub bool);

impl Bool {
    pub fn try_from_str(s: &str) -> Result<Self> {
        match BoolFormat::from_str(s.trim()) {
            Ok(fmt) => Ok(Bool(fmt.to_bool())),
            Err(_) => Err(Error::Parse(format!(
                "Invalid string value for boolean: '{}'. Valid values: {}",
                s,
                valid_csv::<BoolFormat>()
            ))),
        }
    }
}

impl fmt::Display for Bool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if self.0 { "True" } else { "False" })
    }
}

impl Serialize for Bool {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Bool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Bool, D::Error> {
        let b = String::deserialize(deserializer)?;
        Bool::try_from_str(&b).map_err(serde::de::Error::custom)
    }
}

/// Terminal palette used when a bar's color option names one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIterDerive)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum BarColor {
    #[strum(serialize = "red", to_string = "RED")]
    Red,
    #[strum(serialize = "orange", to_string = "ORANGE")]
    Orange,
    #[strum(serialize = "yellow", to_string = "YELLOW")]
    Yellow,
    #[strum(serialize = "green", to_string = "GREEN")]
    Green,
    #[strum(serialize = "cyan", serialize = "light_blue", to_string = "CYAN")]
    Cyan,
    #[strum(serialize = "blue", to_string = "BLUE")]
    Blue,
    #[strum(serialize = "magenta", serialize = "violet", to_string = "MAGENTA")]
    Magenta,
    #[strum(serialize = "black", to_string = "BLACK")]
    Black,
}

impl BarColor {
    pub const RESET: &'static str = crate::csi!("0m");

    pub fn ansi_fg(self) -> &'static str {
        match self {
            BarColor::Red => crate::csi!("31m"),
            BarColor::Orange | BarColor::Yellow => crate::csi!("33m"),
            BarColor::Green => crate::csi!("32m"),
            BarColor::Cyan => crate::csi!("36m"),
            BarColor::Blue => crate::csi!("34m"),
            BarColor::Magenta => crate::csi!("35m"),
            BarColor::Black => crate::csi!("30m"),
        }
    }

    pub fn paint<S: AsRef<str>>(self, s: S) -> String {
        format!("{}{}{}", self.ansi_fg(), s.as_ref(), Self::RESET)
    }

    /// Colors that are not in the palette (CSS hex values and the like) are
    /// kept on the bar but painted with the default foreground.
    pub fn lookup(s: &str) -> Option<Self> {
        Self::from_str(s.trim()).ok()
    }
}
