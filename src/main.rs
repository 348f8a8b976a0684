use anyhow::{Context, Result, anyhow};
use ganttview::core::cli::CliArgs;
use ganttview::core::context::AppContext;
use ganttview::logging::LogTarget;
use ganttview::ui::display_manager::DisplayManager;

fn run() -> Result<()> {
    let args = CliArgs::from_env().map_err(|e| anyhow!(e))?;
    let mut ctx = AppContext::new_with_paths(
        args.config_path.clone(),
        args.data_path.clone(),
        args.logs_dir.clone(),
    )
    .with_context(|| {
        format!(
            "Failed to load '{}' with config '{}'",
            args.data_path.display(),
            args.config_path.display()
        )
    })?;

    let display = DisplayManager::new();
    display.display_all(&ctx.config, &ctx.chart);

    if args.ticks > 0 && !ctx.chart.options().show_now_marker {
        ctx.logger.warn(
            "--ticks has no effect while SHOW_NOW_MARKER is False.",
            LogTarget::ConsoleAndFile,
        );
    } else {
        let mut remaining = args.ticks;
        while remaining > 0 && ctx.chart.timer().is_armed() {
            std::thread::sleep(ctx.chart.options().now_refresh);
            let now = ctx.chart.now();
            if ctx.chart.tick(now) {
                display.display_now(&ctx.chart);
                remaining -= 1;
            }
        }
    }

    ctx.chart.teardown();
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
