//! Attendee-based admission of events.

use crate::error::ConfigurationError;
use crate::event::CalendarEvent;
use crate::pattern::FullMatchPattern;

/// Admits events attended by someone whose name matches a pattern.
///
/// Only attendees who accepted, tentatively accepted, completed or are
/// in the middle of the event are considered. Without a pattern every event
/// is admitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendeeFilter {
    pattern: Option<FullMatchPattern>,
}

impl AttendeeFilter {
    /// A filter admitting every event.
    pub const fn match_all() -> Self {
        Self { pattern: None }
    }

    pub fn new(pattern: &str) -> Result<Self, ConfigurationError> {
        let compiled =
            FullMatchPattern::new(pattern).map_err(|source| ConfigurationError::InvalidPattern {
                name: "attendee filter".to_string(),
                pattern: pattern.to_string(),
                source: Box::new(source),
            })?;
        Ok(Self {
            pattern: Some(compiled),
        })
    }

    /// Builds a filter from an optional pattern.
    pub fn from_option(pattern: Option<&str>) -> Result<Self, ConfigurationError> {
        pattern.map_or_else(|| Ok(Self::match_all()), Self::new)
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(FullMatchPattern::as_str)
    }

    pub fn admits(&self, event: &CalendarEvent) -> bool {
        let Some(pattern) = &self.pattern else {
            return true;
        };
        event
            .attendees()
            .iter()
            .any(|attendee| attendee.is_attending() && pattern.matches(&attendee.name))
    }
}
