//! Decoded calendar events as handed over by a calendar source.

use chrono::{Datelike, Duration, NaiveDateTime};

use crate::error::ValidationError;
use crate::status::{EventStatus, ParticipationStatus};

/// A person invited to an event, with their response if known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendee {
    /// Display name, or the address when no name is given.
    pub name: String,
    pub status: Option<ParticipationStatus>,
}

impl Attendee {
    pub fn new(name: impl Into<String>, status: Option<ParticipationStatus>) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    /// True when the attendee actually took part in the event.
    ///
    /// An attendee without a recorded response does not count.
    pub fn is_attending(&self) -> bool {
        self.status.is_some_and(ParticipationStatus::is_attending)
    }
}

/// The `[start, end)` interval of an event, used as a deduplication key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A single calendar entry with already-localized timestamps.
///
/// Events are immutable once built; `end` is never before `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    title: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    status: Option<EventStatus>,
    attendees: Vec<Attendee>,
}

impl CalendarEvent {
    /// Creates an event with no attendees and no status.
    pub fn new(
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if end < start {
            return Err(ValidationError::NegativeDuration { title });
        }
        Ok(Self {
            title,
            start,
            end,
            status: None,
            attendees: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_attendees(mut self, attendees: Vec<Attendee>) -> Self {
        self.attendees = attendees;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub const fn status(&self) -> Option<EventStatus> {
        self.status
    }

    pub fn attendees(&self) -> &[Attendee] {
        &self.attendees
    }

    /// Length of the event. Never negative.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub const fn slot(&self) -> TimeSlot {
        TimeSlot {
            start: self.start,
            end: self.end,
        }
    }

    /// Calendar year the event starts in.
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// Absence of a status means the event was not cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status == Some(EventStatus::Cancelled)
    }
}
