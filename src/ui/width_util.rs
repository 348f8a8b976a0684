use terminal_size::{Width, terminal_size};

use crate::ui::ascii::ESC_BYTE;

type ByteIter<'a> = std::iter::Peekable<std::str::Bytes<'a>>;

/// Fallback when stdout is not a terminal (pipes, tests).
pub const DEFAULT_TERMINAL_WIDTH: usize = 100;

/// Width arithmetic that ignores ANSI styling.
#[derive(Debug, Default, Clone)]
pub struct WidthUtil;

impl WidthUtil {
    pub(crate) fn strip_ansi(s: &str) -> String {
        let mut out = Vec::with_capacity(s.len());
        let mut bytes = s.bytes().peekable();
        while let Some(byte) = bytes.next() {
            if byte == ESC_BYTE && matches!(bytes.peek(), Some(b'[')) {
                Self::consume_csi(&mut bytes);
                continue;
            }
            out.push(byte);
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    fn consume_csi(bytes: &mut ByteIter<'_>) {
        let _ = bytes.next(); // '['
        for b in bytes.by_ref() {
            if b.is_ascii_alphabetic() {
                break;
            }
        }
    }

    pub fn visible_width(&self, s: &str) -> usize {
        Self::strip_ansi(s).chars().count()
    }

    pub fn pad_visible(&self, s: &str, width: usize) -> String {
        let w = self.visible_width(s);
        if w >= width {
            return s.to_string();
        }
        format!("{s}{}", " ".repeat(width - w))
    }

    /// Cuts plain text to `width` characters, marking the cut with `~`.
    pub fn fit(&self, s: &str, width: usize) -> String {
        let count = s.chars().count();
        if count <= width {
            return self.pad_visible(s, width);
        }
        if width == 0 {
            return String::new();
        }
        let mut out: String = s.chars().take(width - 1).collect();
        out.push('~');
        out
    }

    pub fn terminal_width(&self) -> usize {
        match terminal_size() {
            Some((Width(w), _)) => w as usize,
            None => DEFAULT_TERMINAL_WIDTH,
        }
    }
}
