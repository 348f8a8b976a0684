use chrono::Weekday;

pub trait WeekdayExt {
    /// Day index with Sunday as 0 and Saturday as 6.
    fn sunday_index(self) -> u8;
    fn is_weekend(self) -> bool;
    fn short_name(self) -> &'static str;
}

impl WeekdayExt for Weekday {
    fn sunday_index(self) -> u8 {
        self.num_days_from_sunday() as u8
    }

    fn is_weekend(self) -> bool {
        matches!(self, Weekday::Sat | Weekday::Sun)
    }

    fn short_name(self) -> &'static str {
        match self {
            Weekday::Mon => "Mo",
            Weekday::Tue => "Tu",
            Weekday::Wed => "We",
            Weekday::Thu => "Th",
            Weekday::Fri => "Fr",
            Weekday::Sat => "Sa",
            Weekday::Sun => "Su",
        }
    }
}

/// Inverse of [`WeekdayExt::sunday_index`].
pub fn weekday_from_sunday_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}
