// ANSI styling shared by the preview tables and the text strip.

/// Reset terminal styling to defaults.
pub const STYLE_RESET: &str = crate::csi!("0m");
/// Bold text.
pub const STYLE_BOLD: &str = crate::csi!("1m");
/// Reverse video; marks the cell holding "now".
pub const STYLE_REVERSE: &str = crate::csi!("7m");
/// Dim foreground for weekend cells.
pub const FG_DARK_GRAY: &str = crate::csi!("90m");
/// Red foreground for conflicting and degenerate bars.
pub const FG_RED: &str = crate::csi!("31m");

pub fn styled(style: &str, s: &str) -> String {
    format!("{style}{s}{STYLE_RESET}")
}
