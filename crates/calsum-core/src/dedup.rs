//! Collapsing duplicate bookings of the same time slot.
//!
//! A calendar often holds several copies of one meeting (one per invitee,
//! or a re-sent invitation). Within a category, events sharing an identical
//! `[start, end)` slot are one occurrence. The last event seen for a slot is
//! kept, at the position where the slot first appeared.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::classify::CategoryBuckets;
use crate::event::{CalendarEvent, TimeSlot};

/// Keeps one event per distinct slot.
pub fn dedupe_events(events: Vec<CalendarEvent>) -> Vec<CalendarEvent> {
    let mut index: HashMap<TimeSlot, usize> = HashMap::with_capacity(events.len());
    let mut kept: Vec<CalendarEvent> = Vec::with_capacity(events.len());

    for event in events {
        match index.entry(event.slot()) {
            Entry::Occupied(slot) => kept[*slot.get()] = event,
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(event);
            }
        }
    }
    kept
}

/// Deduplicates each category independently.
pub fn dedupe(buckets: CategoryBuckets) -> CategoryBuckets {
    let before = buckets.total();
    let deduped = buckets.map_buckets(dedupe_events);
    tracing::debug!(
        before,
        after = deduped.total(),
        "collapsed duplicate bookings"
    );
    deduped
}
