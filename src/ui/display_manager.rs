use crate::config::Config;
use crate::core::types::{BarColor, Granularity};
use crate::engine::GanttChart;
use crate::engine::calendar::Leaf;
use crate::engine::date_math;
use crate::engine::layout::Bar;
use crate::ui::ansi::{FG_DARK_GRAY, FG_RED, STYLE_BOLD, STYLE_RESET, STYLE_REVERSE, styled};
use crate::ui::table_printer::{Table, TablePrinter};
use crate::ui::width_util::WidthUtil;
use std::io::{self, Write};
use std::ops::Range;

const MAX_LABEL_WIDTH: usize = 28;
const BAR_CELL: char = '#';
const CONFLICT_CELL: char = 'X';
const DEGENERATE_CELL: char = '!';
const WEEKEND_CELL: char = '.';
const NOW_CELL: char = '^';

/// Terminal preview of a chart: tables for config, rows and bars, and a
/// text strip with one character per grid cell.
#[derive(Debug, Clone)]
pub struct DisplayManager {
    pub printer: TablePrinter,
    pub util: WidthUtil,
    /// ANSI colors on the strip and bar names.
    pub color: bool,
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Leaf cells a bar covers on the strip.
fn covered_cells(bar: &Bar, granularity: Granularity, cell_width: u32) -> Range<i64> {
    match granularity {
        Granularity::Day => bar.offset..bar.offset + bar.length,
        Granularity::Hour => {
            let cw = i64::from(cell_width.max(1));
            let first = bar.offset.div_euclid(cw);
            if bar.length == 0 {
                return first..first;
            }
            first..(bar.offset + bar.length + cw - 1).div_euclid(cw)
        }
    }
}

impl DisplayManager {
    pub fn new() -> Self {
        Self {
            printer: TablePrinter::new(),
            util: WidthUtil,
            color: true,
        }
    }

    /// No ANSI styling anywhere; used for pipes and tests.
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::new()
        }
    }

    fn paint(&self, style: &str, s: &str) -> String {
        if self.color {
            styled(style, s)
        } else {
            s.to_string()
        }
    }

    pub fn config_table<'a>(&self, config: &Config) -> Table<'a> {
        Table {
            title: "Config",
            headers: &["ID", "KEY", "DESCRIPTION", "VALUE"],
            rows: config
                .rows()
                .iter()
                .enumerate()
                .map(|(i, (k, d, v))| vec![i.to_string(), k.clone(), d.clone(), v.clone()])
                .collect(),
            empty_message: Some("No config items found."),
            min_width: 0,
        }
    }

    pub fn row_table<'a>(&self, chart: &GanttChart) -> Table<'a> {
        let rows = chart
            .layout()
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let span = chart
                    .schedule()
                    .series(&row.category, &row.series)
                    .and_then(|s| s.span)
                    .map_or_else(|| "-".to_string(), |iv| iv.to_string());
                vec![
                    i.to_string(),
                    row.category_name.clone(),
                    row.name.clone(),
                    row.bars.len().to_string(),
                    span,
                ]
            })
            .collect();
        Table {
            title: "Rows",
            headers: &["#", "CATEGORY", "SERIES", "BARS", "SPAN"],
            rows,
            empty_message: Some("No rows to show."),
            min_width: 0,
        }
    }

    fn bar_flags(bar: &Bar) -> String {
        let flags: Vec<&str> = [
            (bar.conflict, "overlap"),
            (bar.degenerate, "backwards"),
            (!bar.draggable, "no-drag"),
            (!bar.resizable, "no-resize"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
        if flags.is_empty() {
            "-".to_string()
        } else {
            flags.join(",")
        }
    }

    pub fn bar_table<'a>(&self, chart: &GanttChart) -> Table<'a> {
        let rows = chart
            .layout()
            .bars()
            .map(|bar| {
                let name = match bar.color.as_deref().and_then(BarColor::lookup) {
                    Some(color) if self.color => color.paint(&bar.name),
                    _ => bar.name.clone(),
                };
                vec![
                    bar.task.to_string(),
                    name,
                    bar.interval.start.format("%Y-%m-%d %H:%M").to_string(),
                    bar.interval.end.format("%Y-%m-%d %H:%M").to_string(),
                    bar.offset.to_string(),
                    bar.length.to_string(),
                    bar.label.clone(),
                    Self::bar_flags(bar),
                ]
            })
            .collect();
        Table {
            title: "Bars",
            headers: &[
                "TASK", "NAME", "START", "END", "OFFSET", "LENGTH", "LABEL", "FLAGS",
            ],
            rows,
            empty_message: Some("No scheduled tasks."),
            min_width: 0,
        }
    }

    fn label_width(chart: &GanttChart) -> usize {
        chart
            .layout()
            .rows
            .iter()
            .map(|r| Self::row_label(&r.category_name, &r.name).chars().count())
            .max()
            .unwrap_or(0)
            .min(MAX_LABEL_WIDTH)
    }

    fn row_label(category: &str, series: &str) -> String {
        format!("{category} / {series}")
    }

    /// Joins styled cells, opening a new escape only when the style changes.
    fn compose(&self, cells: &[(char, Option<&'static str>)]) -> String {
        let mut out = String::new();
        let mut current: Option<&str> = None;
        for (ch, style) in cells {
            let style = if self.color { *style } else { None };
            if style != current {
                if current.is_some() {
                    out.push_str(STYLE_RESET);
                }
                if let Some(s) = style {
                    out.push_str(s);
                }
                current = style;
            }
            out.push(*ch);
        }
        if current.is_some() {
            out.push_str(STYLE_RESET);
        }
        out.trim_end().to_string()
    }

    fn background(chart: &GanttChart, leaf: &Leaf) -> (char, Option<&'static str>) {
        if chart.options().show_weekends && date_math::is_weekend(leaf.day) {
            (WEEKEND_CELL, Some(FG_DARK_GRAY))
        } else {
            (' ', None)
        }
    }

    /// The text Gantt strip, one line per header row and one per chart row,
    /// clipped to `width` columns.
    pub fn strip_lines(&self, chart: &GanttChart, width: usize) -> Vec<String> {
        let grid = chart.grid();
        let layout = chart.layout();
        let leaves = grid.leaves();
        let label_w = Self::label_width(chart);
        let cols = leaves.len().min(width.saturating_sub(label_w + 1));
        let gutter = " ".repeat(label_w + 1);
        let mut lines = Vec::new();

        let months: String = grid
            .month_headers()
            .iter()
            .map(|m| self.util.fit(&m.label, m.span as usize))
            .collect::<String>()
            .chars()
            .take(cols)
            .collect();
        lines.push(format!("{gutter}{}", self.paint(STYLE_BOLD, months.trim_end())));

        let ticks: String = match grid.granularity {
            Granularity::Day => grid
                .day_headers(chart.options().show_weekends, chart.now())
                .iter()
                .filter_map(|h| h.label.chars().last())
                .take(cols)
                .collect(),
            Granularity::Hour => grid
                .hour_headers(chart.now())
                .iter()
                .filter_map(|h| h.label.chars().nth(1))
                .take(cols)
                .collect(),
        };
        lines.push(format!("{gutter}{ticks}"));

        if let Some(marker) = chart.now_marker().filter(|m| m.leaf_index < cols) {
            let mut cells = vec![(' ', None); marker.leaf_index];
            cells.push((NOW_CELL, Some(STYLE_REVERSE)));
            lines.push(format!("{gutter}{}", self.compose(&cells)));
        }

        for row in &layout.rows {
            let mut cells: Vec<(char, Option<&'static str>)> = leaves
                .iter()
                .take(cols)
                .map(|leaf| Self::background(chart, leaf))
                .collect();
            for bar in &row.bars {
                let covered = covered_cells(bar, layout.granularity, layout.cell_width);
                let (ch, style) = if bar.degenerate {
                    (DEGENERATE_CELL, Some(FG_RED))
                } else if bar.conflict {
                    (CONFLICT_CELL, Some(FG_RED))
                } else {
                    let color = bar.color.as_deref().and_then(BarColor::lookup);
                    (BAR_CELL, color.map(BarColor::ansi_fg))
                };
                let cover = if bar.degenerate {
                    covered.start..covered.start + 1
                } else {
                    covered
                };
                for i in cover {
                    if let Some(cell) = usize::try_from(i).ok().and_then(|i| cells.get_mut(i)) {
                        // Overlap marks win over plain bars in shared cells.
                        if cell.0 != CONFLICT_CELL && cell.0 != DEGENERATE_CELL {
                            *cell = (ch, style);
                        }
                    }
                }
            }
            let label = self.util.fit(&Self::row_label(&row.category_name, &row.name), label_w);
            lines.push(format!("{label} {}", self.compose(&cells)).trim_end().to_string());
        }
        lines
    }

    /// One line describing the now marker.
    pub fn now_line(&self, chart: &GanttChart) -> String {
        match chart.now_marker() {
            Some(m) => format!(
                "Now {} in cell {} (+{}px).",
                m.at.format("%Y-%m-%d %H:%M"),
                m.leaf_index,
                m.pixel_left(chart.options().cell_width)
            ),
            None => "Now is outside the window.".to_string(),
        }
    }

    pub fn render_chart<W: Write + ?Sized>(
        &self,
        chart: &GanttChart,
        width: usize,
        out: &mut W,
    ) -> io::Result<()> {
        let lines = self.strip_lines(chart, width);
        let w = lines
            .iter()
            .map(|l| self.util.visible_width(l))
            .max()
            .unwrap_or(0);
        self.printer
            .render_banner(&format!("Chart {}", chart.window()), w, out)?;
        for line in &lines {
            writeln!(out, "{line}")?;
        }
        if chart.options().show_now_marker {
            writeln!(out, "{}", self.now_line(chart))?;
        }
        Ok(())
    }

    /// Config, rows, bars and the strip, in that order.
    pub fn render_all<W: Write + ?Sized>(
        &self,
        config: &Config,
        chart: &GanttChart,
        width: usize,
        out: &mut W,
    ) -> io::Result<()> {
        self.printer.render_table(&self.config_table(config), out)?;
        self.printer.render_table(&self.row_table(chart), out)?;
        self.printer.render_table(&self.bar_table(chart), out)?;
        self.render_chart(chart, width, out)
    }

    pub fn display_all(&self, config: &Config, chart: &GanttChart) {
        let mut stdout = io::stdout();
        let _ = self.render_all(config, chart, self.util.terminal_width(), &mut stdout);
    }

    pub fn display_now(&self, chart: &GanttChart) {
        println!("{}", self.now_line(chart));
    }
}
