use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::ingest::load_schedule_file;
use crate::engine::GanttChart;
use crate::errors::Result;
use crate::logging::{LogTarget, Logger};
use std::path::PathBuf;

/// Everything the binary needs: config, the chart built from the data file,
/// and the session logger.
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub chart: GanttChart,
    pub logger: Logger,
    pub config_path: PathBuf,
    pub data_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppContext {
    pub fn new_with_paths(
        config_path: PathBuf,
        data_path: PathBuf,
        logs_dir: PathBuf,
    ) -> Result<Self> {
        let config = Config::load_from(&config_path)?;

        let logger = Logger::new();
        logger.set_log_dir(&logs_dir);
        logger.set_file_logging_enabled(config.file_logging_enabled());

        let schedule = load_schedule_file(&data_path)?;
        logger.info(
            format!(
                "Loaded {} tasks in {} rows from '{}'.",
                schedule.task_count(),
                schedule.series_count(),
                data_path.display()
            ),
            LogTarget::FileOnly,
        );
        let chart = GanttChart::new(
            schedule,
            config.chart_options(),
            SystemClock,
            logger.clone(),
        );

        Ok(Self {
            config,
            chart,
            logger,
            config_path,
            data_path,
            logs_dir,
        })
    }

    /// Pushes the current config into the chart; the chart reloads.
    pub fn apply_config(&mut self) {
        self.chart.set_options(self.config.chart_options());
        self.logger
            .set_file_logging_enabled(self.config.file_logging_enabled());
    }
}
