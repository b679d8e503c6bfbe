//! Date periods for budgets and form defaults

use chrono::{Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Default budget period: `today` through the same day next month.
    ///
    /// Days that do not exist in the next month clamp to its last day
    /// (Jan 31 becomes Feb 28).
    pub fn starting(today: NaiveDate) -> Self {
        let end = today.checked_add_months(Months::new(1)).unwrap_or(today);
        Self { start: today, end }
    }

    /// Check if a date falls inside the period (both ends included)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// A period whose end precedes its start contains nothing
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Local calendar date used for form defaults
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
