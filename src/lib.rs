pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod extensions;
pub mod logging;
pub mod ui;

pub use crate::core::clock::{Clock, FixedClock, SystemClock};
pub use crate::core::ingest::{load_schedule_file, parse_schedule};
pub use crate::core::schedule::Schedule;
pub use crate::engine::events::{ChartEvent, EventOutcome};
pub use crate::engine::{ChartOptions, GanttChart};
