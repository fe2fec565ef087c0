//! Error types for rule configuration and event validation.

use thiserror::Error;

/// Errors raised while building a rule set or attendee filter.
///
/// These are fatal: they surface before any event is classified.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A pattern failed to compile.
    #[error("invalid pattern for '{name}': {pattern}")]
    InvalidPattern {
        name: String,
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },

    /// Two rules share a name, so their precedence would be ambiguous.
    #[error("duplicate rule name: {name}")]
    DuplicateName { name: String },

    /// A rule was declared without a name.
    #[error("rule name cannot be empty (pattern: {pattern})")]
    EmptyName { pattern: String },
}

/// Validation errors for event data handed to the core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The event ends before it starts.
    #[error("event '{title}' ends before it starts")]
    NegativeDuration { title: String },

    /// A status token was not recognized.
    #[error("unknown {kind} status: {value}")]
    UnknownStatus { kind: &'static str, value: String },
}
