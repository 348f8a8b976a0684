use super::{Config, ConfigKey, models::*};
use crate::core::types::{Bool, Granularity, WeekStartDay};
use crate::errors::Error;
use crate::extensions::enums::valid_csv;
use chrono::Weekday;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

static TEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let uniq = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("ganttview-config-test-{nanos}-{uniq}.json"))
}

fn sample_config_file(path: &std::path::Path) {
    let json = r#"{
  "granularity": { "value": "hour", "description": "grid" },
  "stack_tasks_per_row": { "value": "False", "description": "stack" },
  "cell_width": { "value": 60, "description": "width" },
  "week_start_day": { "value": 1, "description": "week" },
  "minimum_days": { "value": 3, "description": "min" },
  "draggable": { "value": "False", "description": "drag" },
  "file_logging_enabled": { "value": "True", "description": "file logging" }
}"#;
    fs::write(path, json).unwrap();
}

#[test]
fn load_from_reads_config_and_rows() {
    let path = temp_path();
    sample_config_file(&path);
    let cfg = Config::load_from(&path).expect("config should load");

    assert_eq!(cfg.granularity(), Granularity::Hour);
    assert_eq!(cfg.cell_width(), 60);
    assert_eq!(cfg.minimum_days(), Some(3));
    assert!(cfg.file_logging_enabled());

    let rows = cfg.rows();
    assert_eq!(rows.len(), 16);
    assert_eq!(rows[0].0, "GRANULARITY");
    assert_eq!(rows[0].2, "hour");
    assert!(rows.iter().any(|(k, _, v)| k == "MINIMUM_DAYS" && v == "3"));
}

#[test]
fn missing_optional_items_fall_back_to_defaults() {
    let path = temp_path();
    sample_config_file(&path);
    let cfg = Config::load_from(&path).unwrap();
    let view = cfg.view();

    assert_eq!(view.cell_height.value, 20);
    assert_eq!(view.now_refresh_ms.value, 15_000);
    assert_eq!(view.show_weekends.value, Bool(true));
    assert_eq!(view.anchor_today.value, Bool(false));
    assert_eq!(view.header_width.description(), "Width of the row header column in pixels.");
}

#[test]
fn chart_options_mirror_config_values() {
    let path = temp_path();
    sample_config_file(&path);
    let opts = Config::load_from(&path).unwrap().chart_options();

    assert_eq!(opts.granularity, Granularity::Hour);
    assert!(!opts.stack_tasks_per_row);
    assert_eq!(opts.cell_width, 60);
    assert_eq!(opts.week_start, Weekday::Mon);
    assert!(opts.behavior.clickable);
    assert!(!opts.behavior.draggable);
    assert!(opts.behavior.resizable);
    assert_eq!(opts.minimum_days, Some(3));
    assert_eq!(opts.now_refresh, Duration::from_millis(15_000));
}

#[test]
fn load_from_reports_missing_file() {
    let path = temp_path();
    let err = Config::load_from(&path).unwrap_err();
    match err {
        Error::Config(msg) => {
            let expected = format!("Configuration file '{}' not found.", path.display());
            assert_eq!(msg, expected);
        }
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn load_from_reports_invalid_json() {
    let path = temp_path();
    fs::write(&path, "{").unwrap();
    let err = Config::load_from(&path).unwrap_err();
    match err {
        Error::Config(msg) => {
            let prefix = format!("Invalid JSON in '{}':", path.display());
            assert!(msg.starts_with(&prefix));
        }
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn load_from_requires_granularity_and_cell_width() {
    let path = temp_path();
    fs::write(
        &path,
        r#"{ "granularity": { "value": "day", "description": "grid" } }"#,
    )
    .unwrap();
    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("cell_width"));
}

#[test]
fn load_from_rejects_zero_cell_width() {
    let path = temp_path();
    fs::write(
        &path,
        r#"{
  "granularity": { "value": "day", "description": "grid" },
  "cell_width": { "value": 0, "description": "width" }
}"#,
    )
    .unwrap();
    let err = Config::load_from(&path).unwrap_err();
    match err {
        Error::Config(msg) => assert_eq!(msg, "CELL_WIDTH must be a positive whole number."),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn load_from_rejects_out_of_range_week_start() {
    let path = temp_path();
    fs::write(
        &path,
        r#"{
  "granularity": { "value": "day", "description": "grid" },
  "cell_width": { "value": 30, "description": "width" },
  "week_start_day": { "value": 9, "description": "week" }
}"#,
    )
    .unwrap();
    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("outside 0..=6"));
}

#[test]
fn set_key_updates_value_records_change_and_saves() {
    let path = temp_path();
    sample_config_file(&path);
    let mut cfg = Config::load_from(&path).unwrap();

    cfg.set_key(ConfigKey::Granularity, "day").unwrap();
    assert_eq!(cfg.granularity(), Granularity::Day);
    assert_eq!(
        cfg.take_last_change(),
        Some(("GRANULARITY".to_string(), "hour".to_string(), "day".to_string()))
    );
    assert!(cfg.take_last_change().is_none());

    let reloaded = Config::load_from(&path).unwrap();
    assert_eq!(reloaded.granularity(), Granularity::Day);
}

#[test]
fn set_parses_key_names_and_rejects_unknown_keys() {
    let path = temp_path();
    sample_config_file(&path);
    let mut cfg = Config::load_from(&path).unwrap();

    cfg.set("WEEK_START_DAY", "6").unwrap();
    assert_eq!(cfg.view().week_start_day.value, WeekStartDay(Weekday::Sat));

    let err = cfg.set("NOPE", "1").unwrap_err();
    match err {
        Error::Parse(msg) => {
            assert!(msg.starts_with("Unknown configuration key 'NOPE'."));
            assert!(msg.contains(&valid_csv::<ConfigKey>()));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn set_rejects_invalid_values_without_changing_state() {
    let path = temp_path();
    sample_config_file(&path);
    let mut cfg = Config::load_from(&path).unwrap();

    assert!(cfg.set("CELL_WIDTH", "0").is_err());
    assert!(cfg.set("CELL_WIDTH", "wide").is_err());
    assert!(cfg.set("GRANULARITY", "week").is_err());
    assert!(cfg.set("DRAGGABLE", "maybe").is_err());
    assert_eq!(cfg.cell_width(), 60);
    assert_eq!(cfg.granularity(), Granularity::Hour);
    assert!(cfg.take_last_change().is_none());
}

#[test]
fn minimum_days_accepts_empty_to_clear() {
    let path = temp_path();
    sample_config_file(&path);
    let mut cfg = Config::load_from(&path).unwrap();

    cfg.set("MINIMUM_DAYS", "").unwrap();
    assert_eq!(cfg.minimum_days(), None);
    assert_eq!(cfg.rows()[13].2, "-");
    cfg.set("MINIMUM_DAYS", "10").unwrap();
    assert_eq!(cfg.minimum_days(), Some(10));
}

#[test]
fn set_many_is_all_or_nothing() {
    let path = temp_path();
    sample_config_file(&path);
    let mut cfg = Config::load_from(&path).unwrap();

    let err = cfg
        .set_many([("CELL_WIDTH", "45"), ("SHOW_WEEKENDS", "sometimes")])
        .unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(cfg.cell_width(), 60);

    cfg.set_many([("CELL_WIDTH", "45"), ("SHOW_WEEKENDS", "false")])
        .unwrap();
    assert_eq!(cfg.cell_width(), 45);
    assert_eq!(cfg.view().show_weekends.value, Bool(false));
}

#[test]
fn set_by_index_follows_key_order() {
    let path = temp_path();
    sample_config_file(&path);
    let mut cfg = Config::load_from(&path).unwrap();

    cfg.set_by_index(5, "25").unwrap();
    assert_eq!(cfg.cell_width(), 25);
    assert!(cfg.set_by_index(99, "1").is_err());
}

#[test]
fn with_defaults_writes_file_on_first_change() {
    let path = temp_path();
    let mut cfg = Config::with_defaults(&path);
    assert!(!path.exists());
    assert_eq!(cfg.granularity(), Granularity::Day);

    cfg.set("ANCHOR_TODAY", "True").unwrap();
    assert!(path.exists());
    let reloaded = Config::load_from(&path).unwrap();
    assert!(reloaded.chart_options().anchor_today);
}

#[test]
fn count_item_parse_rejects_zero_and_negative() {
    assert_eq!(CountConfigItem::parse(" 12 ").unwrap(), 12);
    assert!(CountConfigItem::parse("0").is_err());
    assert!(CountConfigItem::parse("-3").is_err());
}
