//! Per-year and all-time aggregation of classified events.
//!
//! # Folds
//!
//! A [`TypeSummary`] is built by folding events with [`TypeSummary::merge`]:
//! counts and durations add, `first_start` takes the minimum and `last_end`
//! the maximum. The empty summary is the identity, so per-category folds can
//! be split and recombined in any grouping.
//!
//! Yearly summaries report first/last within the summarized year, which keeps
//! `first_start`/`last_end` absent exactly when the count is zero. The grand
//! total is the merge of all yearly summaries.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDateTime};

use crate::classify::{CategoryBuckets, classify};
use crate::dedup::dedupe;
use crate::event::CalendarEvent;
use crate::filter::AttendeeFilter;
use crate::range::DateRange;
use crate::rule::RuleSet;

/// Aggregate for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSummary {
    pub category: String,
    pub total_duration: Duration,
    pub count: usize,
    pub first_start: Option<NaiveDateTime>,
    pub last_end: Option<NaiveDateTime>,
}

impl TypeSummary {
    /// The zero summary: no events, no duration.
    pub fn empty(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            total_duration: Duration::zero(),
            count: 0,
            first_start: None,
            last_end: None,
        }
    }

    /// Summary of a single event.
    pub fn of_event(category: impl Into<String>, event: &CalendarEvent) -> Self {
        Self {
            category: category.into(),
            total_duration: event.duration(),
            count: 1,
            first_start: Some(event.start()),
            last_end: Some(event.end()),
        }
    }

    /// Combines two summaries of the same category.
    #[must_use]
    pub fn merge(mut self, other: &Self) -> Self {
        self.total_duration += other.total_duration;
        self.count += other.count;
        self.first_start = earliest(self.first_start, other.first_start);
        self.last_end = latest(self.last_end, other.last_end);
        self
    }

    pub fn from_events<'a>(
        category: &str,
        events: impl IntoIterator<Item = &'a CalendarEvent>,
    ) -> Self {
        events.into_iter().fold(Self::empty(category), |acc, event| {
            acc.merge(&Self::of_event(category, event))
        })
    }
}

fn earliest(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn latest(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Aggregates for one calendar year, one entry per configured category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearlySummary {
    pub year: i32,
    /// In rule declaration order.
    pub per_category: Vec<TypeSummary>,
}

impl YearlySummary {
    pub fn get(&self, category: &str) -> Option<&TypeSummary> {
        self.per_category.iter().find(|s| s.category == category)
    }
}

/// Summarizes deduplicated events by the year they start in.
///
/// Only years containing at least one admitted event (in any category) are
/// reported, in ascending order. Every configured category appears in every
/// year, with a zero summary where it has no events.
pub fn aggregate_by_year(buckets: &CategoryBuckets, rules: &RuleSet) -> Vec<YearlySummary> {
    let years: BTreeSet<i32> = buckets.events().map(CalendarEvent::year).collect();

    years
        .into_iter()
        .map(|year| {
            let per_category = rules
                .names()
                .map(|name| {
                    let events = buckets.get(name).unwrap_or_default();
                    TypeSummary::from_events(
                        name,
                        events.iter().filter(|event| event.year() == year),
                    )
                })
                .collect();
            YearlySummary { year, per_category }
        })
        .collect()
}

/// Folds all yearly summaries into one total per category.
///
/// The result is in rule declaration order and always has one entry per rule.
pub fn aggregate_grand_total(yearly: &[YearlySummary], rules: &RuleSet) -> Vec<TypeSummary> {
    rules
        .names()
        .map(|name| {
            yearly
                .iter()
                .filter_map(|summary| summary.get(name))
                .fold(TypeSummary::empty(name), TypeSummary::merge)
        })
        .collect()
}

/// Final output of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Ascending by year.
    pub by_year: Vec<YearlySummary>,
    /// In rule declaration order.
    pub grand_total: Vec<TypeSummary>,
}

impl Report {
    /// Builds a report from already classified and deduplicated buckets.
    pub fn from_buckets(buckets: &CategoryBuckets, rules: &RuleSet) -> Self {
        let by_year = aggregate_by_year(buckets, rules);
        let grand_total = aggregate_grand_total(&by_year, rules);
        Self {
            by_year,
            grand_total,
        }
    }

    /// Runs the whole pipeline over a one-pass event stream.
    pub fn build<I>(
        events: I,
        rules: &RuleSet,
        range: &DateRange,
        attendees: &AttendeeFilter,
    ) -> Self
    where
        I: IntoIterator<Item = CalendarEvent>,
    {
        let buckets = dedupe(classify(events, rules, range, attendees));
        Self::from_buckets(&buckets, rules)
    }

    pub fn total_for(&self, category: &str) -> Option<&TypeSummary> {
        self.grand_total.iter().find(|s| s.category == category)
    }
}
