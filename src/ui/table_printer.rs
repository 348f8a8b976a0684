use crate::ui::width_util::WidthUtil;
use std::io::{self, Write};

const COLUMN_GAP: &str = " | ";

/// A titled table ready to render.
#[derive(Debug, Clone, Default)]
pub struct Table<'a> {
    pub title: &'a str,
    pub headers: &'a [&'a str],
    pub rows: Vec<Vec<String>>,
    /// Printed instead of the header and rows when there are no rows.
    pub empty_message: Option<&'a str>,
    pub min_width: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TablePrinter {
    util: WidthUtil,
    left_pad: usize,
}

impl TablePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy that indents every line by `pad` spaces.
    pub fn with_left_pad(&self, pad: usize) -> Self {
        Self {
            util: self.util.clone(),
            left_pad: pad,
        }
    }

    fn line<W: Write + ?Sized>(&self, out: &mut W, s: &str) -> io::Result<()> {
        writeln!(out, "{}{s}", " ".repeat(self.left_pad))
    }

    fn rule<W: Write + ?Sized>(&self, out: &mut W, width: usize) -> io::Result<()> {
        self.line(out, &"-".repeat(width.max(1)))
    }

    pub fn render_banner<W: Write + ?Sized>(
        &self,
        title: &str,
        width: usize,
        out: &mut W,
    ) -> io::Result<()> {
        let w = width.max(self.util.visible_width(title));
        self.rule(out, w)?;
        self.line(out, &title.to_uppercase())?;
        self.rule(out, w)
    }

    fn column_widths(&self, table: &Table<'_>) -> Vec<usize> {
        let mut widths: Vec<usize> = table
            .headers
            .iter()
            .map(|h| self.util.visible_width(h))
            .collect();
        for row in &table.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(self.util.visible_width(cell));
            }
        }
        widths
    }

    /// Natural width: columns plus separators, without the minimum.
    pub fn table_width(&self, table: &Table<'_>) -> usize {
        let widths = self.column_widths(table);
        if widths.is_empty() {
            return 0;
        }
        widths.iter().sum::<usize>() + (widths.len() - 1) * COLUMN_GAP.len()
    }

    fn join(&self, cells: &[String], widths: &[usize]) -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| self.util.pad_visible(cell, *w))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP)
            .trim_end()
            .to_string()
    }

    pub fn render_table<W: Write + ?Sized>(&self, table: &Table<'_>, out: &mut W) -> io::Result<()> {
        let widths = self.column_widths(table);
        let total = self.table_width(table).max(table.min_width);

        if table.rows.is_empty() {
            if let Some(msg) = table.empty_message {
                let w = total.max(self.util.visible_width(msg));
                self.render_banner(table.title, w, out)?;
                self.line(out, msg)?;
                return self.rule(out, w);
            }
        }

        self.render_banner(table.title, total, out)?;
        let headers: Vec<String> = table.headers.iter().map(|h| h.to_string()).collect();
        self.line(out, &self.join(&headers, &widths))?;
        self.rule(out, total)?;
        for row in &table.rows {
            self.line(out, &self.join(row, &widths))?;
        }
        self.rule(out, total)
    }
}
