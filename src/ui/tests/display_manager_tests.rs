use crate::config::Config;
use crate::core::clock::FixedClock;
use crate::core::ingest::parse_schedule;
use crate::engine::date_math::parse_date;
use crate::engine::mutator::NewTask;
use crate::engine::{ChartOptions, GanttChart};
use crate::logging::Logger;
use crate::ui::display_manager::DisplayManager;
use crate::ui::width_util::WidthUtil;

const SAMPLE: &str = r#"[
  { "cId": 1, "cName": "Team A", "series": [
    { "sId": 11, "sName": "Build", "tasks": [
      { "tId": 111, "tName": "Frame", "start": "2023-01-09", "end": "2023-01-10",
        "options": { "color": "green" } },
      { "tId": 112, "tName": "Roof", "start": "2023-01-10", "end": "2023-01-12" }
    ]},
    { "sId": 12, "sName": "Inspect", "isTask": true,
      "start": "2023-01-15", "end": "2023-01-16", "options": { "resizable": false } }
  ]},
  { "cId": "2", "cName": "Team B", "series": [] }
]"#;

fn chart(show_now_marker: bool) -> GanttChart {
    GanttChart::new(
        parse_schedule(SAMPLE).unwrap(),
        ChartOptions {
            minimum_days: Some(1),
            show_now_marker,
            ..ChartOptions::default()
        },
        FixedClock::new(parse_date("2023-01-12 10:00").unwrap()),
        Logger::console_only(),
    )
}

fn render_all(dm: &DisplayManager, chart: &GanttChart) -> String {
    let config = Config::with_defaults(std::env::temp_dir().join("ganttview-ui-unsaved.json"));
    let mut buf = Vec::new();
    dm.render_all(&config, chart, 100, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn strip_draws_one_character_per_day() {
    let dm = DisplayManager::plain();
    let lines = dm.strip_lines(&chart(false), 100);
    let gutter = " ".repeat(18);
    assert_eq!(
        lines,
        vec![
            format!("{gutter}2023-01"),
            format!("{gutter}90123456"),
            "Team A / Build    #### ..".to_string(),
            "Team A / Inspect       .##".to_string(),
            "Team B / No tasks      ..".to_string(),
        ]
    );
}

#[test]
fn strip_marks_now_and_clips_to_width() {
    let dm = DisplayManager::plain();
    let chart = chart(true);
    let lines = dm.strip_lines(&chart, 100);
    assert_eq!(lines[2], format!("{}   ^", " ".repeat(18)));

    let narrow = dm.strip_lines(&chart, 18 + 3);
    assert_eq!(narrow[1].trim(), "901");
    // The now cell (index 3) is clipped away.
    assert_eq!(narrow.len(), 5);
    assert_eq!(narrow[2], "Team A / Build    ###");
}

#[test]
fn strip_flags_conflicts_and_backwards_tasks() {
    let dm = DisplayManager::plain();
    let mut chart = chart(false);
    chart
        .add_task(
            &"1".into(),
            &"11".into(),
            NewTask {
                title: Some("Wiring".into()),
                start: parse_date("2023-01-11").ok(),
                end: parse_date("2023-01-12").ok(),
                ..NewTask::default()
            },
        )
        .unwrap();
    chart
        .add_task(
            &"2".into(),
            &"s1".into(),
            NewTask {
                title: Some("Oops".into()),
                start: parse_date("2023-01-11").ok(),
                end: parse_date("2023-01-10").ok(),
                ..NewTask::default()
            },
        )
        .unwrap();
    let lines = dm.strip_lines(&chart, 100);
    assert_eq!(lines[2], "Team A / Build   #XXX ..");
    assert_eq!(lines[4], "Team B / Oops      !  ..");
}

#[test]
fn tables_list_rows_and_bars() {
    let dm = DisplayManager::plain();
    let chart = chart(false);

    let rows = dm.row_table(&chart);
    assert_eq!(rows.rows.len(), 3);
    assert_eq!(rows.rows[0][2], "Build");
    assert_eq!(rows.rows[0][4], "2023-01-09 00:00 .. 2023-01-12 00:00");
    assert_eq!(rows.rows[2][4], "-");

    let bars = dm.bar_table(&chart);
    assert_eq!(bars.rows.len(), 3);
    assert_eq!(bars.rows[0][0], "1/11/111");
    assert_eq!(bars.rows[0][6], "2 d");
    assert_eq!(bars.rows[0][7], "-");
    assert_eq!(bars.rows[2][7], "no-resize");
}

#[test]
fn bar_names_are_painted_only_in_color_mode() {
    let chart = chart(false);
    let colored = DisplayManager::new().bar_table(&chart);
    assert_ne!(colored.rows[0][1], "Frame");
    assert_eq!(WidthUtil.visible_width(&colored.rows[0][1]), 5);
    assert_eq!(DisplayManager::plain().bar_table(&chart).rows[0][1], "Frame");
}

#[test]
fn render_all_prints_every_section() {
    let out = render_all(&DisplayManager::plain(), &chart(true));
    for title in ["CONFIG", "ROWS", "BARS", "CHART [2023-01-09 00:00, 2023-01-16 00:00)"] {
        assert!(out.lines().any(|l| l == title), "missing {title} in:\n{out}");
    }
    assert!(out.contains("CELL_WIDTH"));
    assert!(out.contains("Now 2023-01-12 10:00 in cell 3 (+12px)."));
}

#[test]
fn now_line_reports_outside_window() {
    let chart = GanttChart::new(
        parse_schedule(SAMPLE).unwrap(),
        ChartOptions {
            minimum_days: Some(1),
            ..ChartOptions::default()
        },
        FixedClock::new(parse_date("2024-06-01 10:00").unwrap()),
        Logger::console_only(),
    );
    assert_eq!(
        DisplayManager::plain().now_line(&chart),
        "Now is outside the window."
    );
}
