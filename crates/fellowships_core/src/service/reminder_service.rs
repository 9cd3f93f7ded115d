//! Deadline reminder planning.
//!
//! # Responsibility
//! - Compute reminder fire times from due dates using deadline rollover.
//! - Compose reminder title/notes.
//! - Gate reminder creation on the platform permission check.
//!
//! # Invariants
//! - `create_reminder` is never called without granted permission.
//! - Fire times are local wall-clock times at the configured hour.

use crate::deadline::{next_deadline, MalformedDateError};
use crate::model::scholarship::{Scholarship, ScholarshipId};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reminder planning/creation errors.
#[derive(Debug)]
pub enum ReminderError {
    /// User did not grant reminder access.
    PermissionDenied,
    /// Platform failed to save the reminder.
    Creation(String),
    /// Due date could not be resolved.
    Deadline(MalformedDateError),
    /// Lead time moves the fire date out of the calendar range.
    InvalidLead(u32),
    UnknownScholarship(ScholarshipId),
}

impl Display for ReminderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "reminder access was not granted"),
            Self::Creation(message) => write!(f, "failed to create reminder: {message}"),
            Self::Deadline(err) => write!(f, "{err}"),
            Self::InvalidLead(days) => write!(f, "reminder lead of {days} days is out of range"),
            Self::UnknownScholarship(id) => write!(f, "scholarship not found: {id}"),
        }
    }
}

impl Error for ReminderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Deadline(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MalformedDateError> for ReminderError {
    fn from(value: MalformedDateError) -> Self {
        Self::Deadline(value)
    }
}

/// When a reminder fires relative to today or the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderLead {
    Tomorrow,
    DaysBefore(u32),
}

/// Platform reminder/calendar collaborator.
pub trait ReminderService {
    fn has_permission(&self) -> bool;
    /// May prompt the user. Returns whether access is now granted.
    fn request_access(&self) -> bool;
    fn create_reminder(&self, request: &ReminderRequest) -> Result<(), ReminderError>;
}

impl<R: ReminderService + ?Sized> ReminderService for &R {
    fn has_permission(&self) -> bool {
        (**self).has_permission()
    }

    fn request_access(&self) -> bool {
        (**self).request_access()
    }

    fn create_reminder(&self, request: &ReminderRequest) -> Result<(), ReminderError> {
        (**self).create_reminder(request)
    }
}

/// Fully resolved reminder ready to hand to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub scholarship_id: ScholarshipId,
    pub title: String,
    pub notes: String,
    /// Local wall-clock time.
    pub fire_at: NaiveDateTime,
}

impl ReminderRequest {
    /// Builds the reminder for `scholarship`.
    pub fn for_scholarship(
        scholarship: &Scholarship,
        lead: ReminderLead,
        today: NaiveDate,
        at: NaiveTime,
    ) -> Result<Self, ReminderError> {
        Ok(Self {
            scholarship_id: scholarship.id,
            title: format!("Deadline approaching: {}", scholarship.name),
            notes: format!(
                "Application deadline for {}\n\n{}",
                scholarship.name, scholarship.description
            ),
            fire_at: reminder_fire_at(&scholarship.due_date, lead, today, at)?,
        })
    }
}

/// Resolves the fire time for a reminder.
///
/// - `Tomorrow`: the day after `today`; `due_date` is not consulted.
/// - `DaysBefore(n)`: `n` days before the next occurrence of `due_date`.
pub fn reminder_fire_at(
    due_date: &str,
    lead: ReminderLead,
    today: NaiveDate,
    at: NaiveTime,
) -> Result<NaiveDateTime, ReminderError> {
    let day = match lead {
        ReminderLead::Tomorrow => today
            .checked_add_days(Days::new(1))
            .ok_or(ReminderError::InvalidLead(0))?,
        ReminderLead::DaysBefore(days) => next_deadline(due_date, today)?
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or(ReminderError::InvalidLead(days))?,
    };
    Ok(day.and_time(at))
}

/// Permission-gated reminder scheduling over a platform service.
pub struct ReminderPlanner<R: ReminderService> {
    service: R,
    at: NaiveTime,
}

impl<R: ReminderService> ReminderPlanner<R> {
    pub fn new(service: R, at: NaiveTime) -> Self {
        Self { service, at }
    }

    /// Resolves and creates one reminder.
    ///
    /// Requests access once when permission is missing.
    ///
    /// # Errors
    /// - `Deadline` / `InvalidLead` before any platform call.
    /// - `PermissionDenied` when access stays denied; nothing is created.
    /// - Creation errors from the platform unchanged.
    pub fn schedule(
        &self,
        scholarship: &Scholarship,
        lead: ReminderLead,
        today: NaiveDate,
    ) -> Result<ReminderRequest, ReminderError> {
        let request = ReminderRequest::for_scholarship(scholarship, lead, today, self.at)?;

        if !self.service.has_permission() && !self.service.request_access() {
            warn!(
                "event=reminder_schedule module=service status=denied id={}",
                scholarship.id
            );
            return Err(ReminderError::PermissionDenied);
        }

        self.service.create_reminder(&request)?;
        info!(
            "event=reminder_schedule module=service status=ok id={} fire_at={}",
            scholarship.id, request.fire_at
        );
        Ok(request)
    }
}
