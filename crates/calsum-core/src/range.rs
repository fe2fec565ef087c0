//! Day-granular date ranges and their timestamp windows.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// An inclusive `[from, to]` range of calendar days.
///
/// The range admits events inside `[from 00:00, (to + 1) 00:00)`, so the
/// last day is fully covered. An inverted range admits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub const fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Every representable day.
    pub const fn all_time() -> Self {
        Self::new(NaiveDate::MIN, NaiveDate::MAX)
    }

    pub const fn from(&self) -> NaiveDate {
        self.from
    }

    pub const fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }

    /// Start of the admission window.
    pub fn window_start(&self) -> NaiveDateTime {
        self.from.and_time(NaiveTime::MIN)
    }

    /// Exclusive end of the admission window, or `None` when the range runs
    /// to the last representable day.
    pub fn window_end(&self) -> Option<NaiveDateTime> {
        self.to.succ_opt().map(|next| next.and_time(NaiveTime::MIN))
    }

    /// Whether the interval `[start, end)` lies entirely inside the window.
    pub fn contains(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        if self.is_empty() || start < self.window_start() {
            return false;
        }
        self.window_end().is_none_or(|limit| end <= limit)
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::all_time()
    }
}
