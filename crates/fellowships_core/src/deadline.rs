//! Deadline arithmetic for annual `MM/DD/YYYY` due dates.
//!
//! # Responsibility
//! - Parse stored due-date text into month/day/year components.
//! - Resolve the next occurrence of a month/day on or after `today`.
//! - Count whole days until that occurrence.
//!
//! # Invariants
//! - The stored year is parsed but does not influence day counts; deadlines
//!   recur annually.
//! - Results are never negative.
//! - All functions are pure; `today` is always supplied by the caller.

use chrono::{Datelike, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Leap year used to validate month/day pairs independent of any real year.
const LEAP_REFERENCE_YEAR: i32 = 2000;
/// Longest gap between two Feb 29 dates (e.g. 2096 -> 2104).
const MAX_ROLLOVER_YEARS: i32 = 8;

/// Due-date text that cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedDateError {
    /// Fewer than three `/`-separated components.
    MissingComponents(String),
    /// A component is not an integer.
    NonNumeric(String),
    /// Month/day never exists on a calendar (e.g. `02/30`).
    InvalidCalendarDate { month: u32, day: u32 },
}

impl Display for MalformedDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingComponents(raw) => {
                write!(f, "due date `{raw}` must have MM/DD/YYYY components")
            }
            Self::NonNumeric(raw) => write!(f, "due date `{raw}` has a non-numeric component"),
            Self::InvalidCalendarDate { month, day } => {
                write!(f, "due date {month:02}/{day:02} does not exist")
            }
        }
    }
}

impl Error for MalformedDateError {}

/// Parsed components of a stored due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDate {
    pub month: u32,
    pub day: u32,
    /// Source year, kept for display only.
    pub year: i32,
}

impl DueDate {
    /// Parses `MM/DD/YYYY`. Extra trailing components are ignored.
    pub fn parse(raw: &str) -> Result<Self, MalformedDateError> {
        let mut parts = raw.split('/').map(str::trim);
        let (Some(month), Some(day), Some(year)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(MalformedDateError::MissingComponents(raw.to_string()));
        };

        let non_numeric = || MalformedDateError::NonNumeric(raw.to_string());
        let month = month.parse::<u32>().map_err(|_| non_numeric())?;
        let day = day.parse::<u32>().map_err(|_| non_numeric())?;
        let year = year.parse::<i32>().map_err(|_| non_numeric())?;

        if NaiveDate::from_ymd_opt(LEAP_REFERENCE_YEAR, month, day).is_none() {
            return Err(MalformedDateError::InvalidCalendarDate { month, day });
        }

        Ok(Self { month, day, year })
    }

    /// Returns the first date on or after `today` with this month/day.
    ///
    /// Tries `today`'s year first, then rolls forward. Feb 29 resolves to the
    /// next leap year that is not in the past.
    pub fn next_occurrence(&self, today: NaiveDate) -> Result<NaiveDate, MalformedDateError> {
        let start = today.year();
        (start..=start + MAX_ROLLOVER_YEARS)
            .filter_map(|year| NaiveDate::from_ymd_opt(year, self.month, self.day))
            .find(|candidate| *candidate >= today)
            .ok_or(MalformedDateError::InvalidCalendarDate {
                month: self.month,
                day: self.day,
            })
    }

    /// Whole days from `today` to the next occurrence.
    pub fn days_until(&self, today: NaiveDate) -> Result<u32, MalformedDateError> {
        let next = self.next_occurrence(today)?;
        let days = (next - today).num_days().max(0);
        Ok(u32::try_from(days).unwrap_or(u32::MAX))
    }
}

/// Whole days from `today` until the next occurrence of `due_date`.
pub fn days_until(due_date: &str, today: NaiveDate) -> Result<u32, MalformedDateError> {
    DueDate::parse(due_date)?.days_until(today)
}

/// Next occurrence of `due_date` on or after `today`.
pub fn next_deadline(due_date: &str, today: NaiveDate) -> Result<NaiveDate, MalformedDateError> {
    DueDate::parse(due_date)?.next_occurrence(today)
}

/// Days remaining for display; malformed dates count as `0`.
pub fn days_remaining_or_zero(due_date: &str, today: NaiveDate) -> u32 {
    days_until(due_date, today).unwrap_or(0)
}

/// Row label for a due date. The raw text is shown even when malformed.
pub fn due_date_label(due_date: &str) -> String {
    format!("Due: {}", due_date.trim())
}
