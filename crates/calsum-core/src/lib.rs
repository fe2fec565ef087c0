//! Core logic for summarizing calendar time by category.
//!
//! This crate contains the fundamental types and logic for:
//! - Rules: named full-title patterns with first-match-wins precedence
//! - Classification: assigning events to categories within a date range
//! - Deduplication: counting each booked time slot once per category
//! - Summaries: per-year and all-time totals per category
//!
//! Reading calendars and printing results are left to callers.

pub mod classify;
pub mod dedup;
pub mod error;
pub mod event;
pub mod filter;
pub mod pattern;
pub mod range;
pub mod rule;
pub mod status;
pub mod summary;

pub use classify::{CategoryBuckets, Classifier, classify};
pub use dedup::dedupe;
pub use error::{ConfigurationError, ValidationError};
pub use event::{Attendee, CalendarEvent, TimeSlot};
pub use filter::AttendeeFilter;
pub use range::DateRange;
pub use rule::{CategoryRule, DEFAULT_RULES, RuleForm, RuleSet, SerializedRule};
pub use status::{EventStatus, ParticipationStatus};
pub use summary::{Report, TypeSummary, YearlySummary, aggregate_by_year, aggregate_grand_total};
