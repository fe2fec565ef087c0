//! Assigning events to categories.
//!
//! Each event is tested against the rules in declaration order and goes to
//! the first rule whose pattern accepts its title. A matched event that falls
//! outside the date window or fails the attendee filter is dropped outright;
//! it is never handed on to a later rule.

use crate::event::CalendarEvent;
use crate::filter::AttendeeFilter;
use crate::range::DateRange;
use crate::rule::RuleSet;

/// Events grouped by category, in rule declaration order.
///
/// Every configured category has a bucket, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBuckets {
    buckets: Vec<(String, Vec<CalendarEvent>)>,
}

impl CategoryBuckets {
    /// One empty bucket per rule.
    pub fn empty(rules: &RuleSet) -> Self {
        Self {
            buckets: rules
                .names()
                .map(|name| (name.to_string(), Vec::new()))
                .collect(),
        }
    }

    pub fn get(&self, category: &str) -> Option<&[CalendarEvent]> {
        self.buckets
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, events)| events.as_slice())
    }

    /// Appends to the bucket at `index`, which must exist.
    fn push(&mut self, index: usize, event: CalendarEvent) {
        if let Some((_, events)) = self.buckets.get_mut(index) {
            events.push(event);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CalendarEvent])> {
        self.buckets
            .iter()
            .map(|(name, events)| (name.as_str(), events.as_slice()))
    }

    /// All events across every category.
    pub fn events(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.buckets.iter().flat_map(|(_, events)| events.iter())
    }

    /// Total number of events across every category.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|(_, events)| events.len()).sum()
    }

    /// Rebuilds each bucket with `f`, keeping categories and their order.
    #[must_use]
    pub fn map_buckets<F>(self, mut f: F) -> Self
    where
        F: FnMut(Vec<CalendarEvent>) -> Vec<CalendarEvent>,
    {
        Self {
            buckets: self
                .buckets
                .into_iter()
                .map(|(name, events)| (name, f(events)))
                .collect(),
        }
    }
}

/// Classifies a one-pass stream of events against a rule set.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    rules: &'a RuleSet,
    range: &'a DateRange,
    attendees: &'a AttendeeFilter,
}

impl<'a> Classifier<'a> {
    pub const fn new(
        rules: &'a RuleSet,
        range: &'a DateRange,
        attendees: &'a AttendeeFilter,
    ) -> Self {
        Self {
            rules,
            range,
            attendees,
        }
    }

    /// Declaration index of the category `event` belongs to, if admitted.
    pub fn category_of(&self, event: &CalendarEvent) -> Option<usize> {
        if event.is_cancelled() {
            return None;
        }
        let rule = self.rules.first_match(event.title())?;
        let admitted = self.range.contains(event.start(), event.end())
            && self.attendees.admits(event);
        if admitted {
            self.rules.position(rule.name())
        } else {
            None
        }
    }

    pub fn classify<I>(&self, events: I) -> CategoryBuckets
    where
        I: IntoIterator<Item = CalendarEvent>,
    {
        let mut buckets = CategoryBuckets::empty(self.rules);
        let mut seen = 0usize;
        for event in events {
            seen += 1;
            if let Some(index) = self.category_of(&event) {
                buckets.push(index, event);
            }
        }
        tracing::debug!(seen, admitted = buckets.total(), "classified events");
        buckets
    }
}

/// Classifies `events` in a single pass.
pub fn classify<I>(
    events: I,
    rules: &RuleSet,
    range: &DateRange,
    attendees: &AttendeeFilter,
) -> CategoryBuckets
where
    I: IntoIterator<Item = CalendarEvent>,
{
    Classifier::new(rules, range, attendees).classify(events)
}
