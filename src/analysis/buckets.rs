use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// Calendar week-of-month bucket, qualified by month and year so the same
/// week number in different months or years never collides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub year: i32,
    pub month: u32,
    pub week: u32,
}

/// Calendar month bucket, qualified by year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}-W{}", self.year, self.month, self.week)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

// Rendered as strings so the keys stay usable in JSON maps.
impl Serialize for WeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Normalizes a commit timestamp to its UTC calendar day (time-of-day zeroed).
pub fn day_of(timestamp: &DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// Maps a day to its week-of-month bucket. Days 1-7 are week 1, 8-14 week 2,
/// and so on; the trailing partial "fifth week" of a 29-31 day month folds
/// into week 4.
pub fn week_of(day: NaiveDate) -> WeekKey {
    let week = ((day.day() - 1) / 7 + 1).min(4);
    WeekKey {
        year: day.year(),
        month: day.month(),
        week,
    }
}

pub fn month_of(day: NaiveDate) -> MonthKey {
    MonthKey {
        year: day.year(),
        month: day.month(),
    }
}

/// All three bucket keys for one commit timestamp.
pub fn bucket_of(timestamp: &DateTime<Utc>) -> (NaiveDate, WeekKey, MonthKey) {
    let day = day_of(timestamp);
    (day, week_of(day), month_of(day))
}
