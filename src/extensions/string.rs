pub trait ToDashSeparators {
    /// Returns a trimmed copy with `/` date separators turned into `-` and an
    /// ISO `T` between date and time turned into a space.
    fn to_dash_separators(&self) -> String;
}

impl ToDashSeparators for str {
    fn to_dash_separators(&self) -> String {
        let mut out = self.trim().replace('/', "-");
        if out.len() > 10 && out.as_bytes()[10] == b'T' {
            out.replace_range(10..11, " ");
        }
        out
    }
}

impl ToDashSeparators for String {
    fn to_dash_separators(&self) -> String {
        self.as_str().to_dash_separators()
    }
}
