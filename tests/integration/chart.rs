use std::cell::RefCell;
use std::rc::Rc;

use ganttview::core::ids::TaskRef;
use ganttview::core::types::Granularity;
use ganttview::engine::date_math::parse_date;
use ganttview::logging::{LogLevel, Logger};
use ganttview::{ChartEvent, ChartOptions, FixedClock, GanttChart, load_schedule_file};

use crate::common::demo_path;

fn demo_chart(options: ChartOptions) -> GanttChart {
    let logger = Logger::console_only();
    logger.set_console_level(LogLevel::Error);
    GanttChart::new(
        load_schedule_file(demo_path("schedule.json")).unwrap(),
        options,
        FixedClock::new(parse_date("2024-03-08 12:00").unwrap()),
        logger,
    )
}

fn options() -> ChartOptions {
    ChartOptions {
        minimum_days: Some(1),
        ..ChartOptions::default()
    }
}

#[test]
fn demo_schedule_lays_out_every_row() {
    let chart = demo_chart(options());

    assert_eq!(chart.window().start, parse_date("2024-03-01").unwrap());
    assert_eq!(chart.window().end, parse_date("2024-03-15").unwrap());
    assert_eq!(chart.grid().day_count(), 15);

    let names: Vec<&str> = chart.layout().rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Backend", "Release", "Mockups", "No tasks"]);
    assert!(chart.layout().rows[3].empty);

    // The review task carries sentinel dates and gets no bar.
    assert!(chart.layout().bar(&TaskRef::new("2", "20", "201")).is_none());
    assert_eq!(chart.layout().conflict_count(), 2);

    let marker = chart.now_marker().unwrap();
    assert_eq!(marker.leaf_index, 7);
    assert!((marker.fraction - 0.5).abs() < f64::EPSILON);
}

#[test]
fn dragging_a_conflicting_bar_clears_the_overlap() {
    let mut chart = demo_chart(options());
    let moved = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&moved);
    chart.on_drag(move |t| *sink.borrow_mut() = t.start);

    let load_test = TaskRef::new("1", "10", "102");
    let outcome = chart.handle(ChartEvent::DragStopped {
        task: load_test.clone(),
        pixel_offset: 12 * 30 + 4,
    });
    assert!(outcome.is_applied());
    assert_eq!(*moved.borrow(), parse_date("2024-03-13").ok());

    let bar = chart.layout().bar(&load_test).unwrap();
    assert_eq!(bar.offset, 12);
    assert_eq!(bar.length, 3);
    assert_eq!(chart.layout().conflict_count(), 0);
    chart.teardown();
    assert!(!chart.timer().is_armed());
}

#[test]
fn hour_granularity_uses_whole_days() {
    let chart = demo_chart(ChartOptions {
        granularity: Granularity::Hour,
        ..options()
    });
    assert_eq!(chart.window().start, parse_date("2024-03-01").unwrap());
    assert_eq!(chart.grid().leaf_count(), chart.grid().day_count() * 24);
    let marker = chart.now_marker().unwrap();
    assert_eq!(marker.leaf_index, 7 * 24 + 12);
}
