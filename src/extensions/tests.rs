use super::{
    chrono::{WeekdayExt, weekday_from_sunday_index},
    enums::valid_csv,
    string::ToDashSeparators,
};
use crate::config::ConfigKey;
use crate::core::types::Granularity;
use chrono::Weekday;

#[test]
fn sunday_index_round_trips_through_lookup() {
    let days = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];
    for (i, day) in days.into_iter().enumerate() {
        assert_eq!(day.sunday_index() as usize, i);
        assert_eq!(weekday_from_sunday_index(i as u8), Some(day));
    }
    assert_eq!(weekday_from_sunday_index(7), None);
}

#[test]
fn weekend_covers_saturday_and_sunday_only() {
    assert!(Weekday::Sat.is_weekend());
    assert!(Weekday::Sun.is_weekend());
    assert!(!Weekday::Fri.is_weekend());
    assert_eq!(Weekday::Wed.short_name(), "We");
}

#[test]
fn valid_csv_lists_enum_variants_as_strings() {
    let csv = valid_csv::<Granularity>();
    assert_eq!(csv, "hour, day");
}

#[test]
fn valid_csv_follows_declaration_order_of_config_keys() {
    let csv = valid_csv::<ConfigKey>();
    assert!(csv.starts_with("GRANULARITY, STACK_TASKS_PER_ROW, SHOW_WEEKENDS"));
    assert!(csv.ends_with("NOW_REFRESH_MS, FILE_LOGGING_ENABLED"));
}

#[test]
fn to_dash_separators_replaces_and_trims() {
    assert_eq!(" 2023/01/05 ".to_dash_separators(), "2023-01-05");
    assert_eq!(
        "2023-01-05T08:30".to_string().to_dash_separators(),
        "2023-01-05 08:30"
    );
    // A 'T' elsewhere is left alone.
    assert_eq!("Tomorrow".to_dash_separators(), "Tomorrow");
}
