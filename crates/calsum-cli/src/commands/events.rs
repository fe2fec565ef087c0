//! Events command listing every counted event per category.

use std::fmt::Write;

use anyhow::{Context, Result};
use calsum_core::{CalendarEvent, CategoryBuckets, classify, dedupe};

use super::summary::format_duration;
use super::util::{RunInputs, resolve_inputs};
use crate::Config;
use crate::cli::FilterArgs;
use crate::ics;

/// Formats buckets as one block per category, events sorted by start then
/// duration.
pub fn format_events(buckets: &CategoryBuckets) -> String {
    let mut output = String::new();

    for (name, events) in buckets.iter() {
        let mut sorted: Vec<&CalendarEvent> = events.iter().collect();
        sorted.sort_by_key(|e| (e.start(), e.duration()));

        writeln!(output, "Events of '{name}'").unwrap();
        for event in sorted {
            writeln!(
                output,
                "{}: {} ({})",
                event.start().format("%Y-%m-%dT%H:%M"),
                event.title(),
                format_duration(event.duration())
            )
            .unwrap();
        }
    }

    output
}

/// Runs the events command.
pub fn run(args: &FilterArgs, config: &Config) -> Result<()> {
    let RunInputs {
        calendar,
        rules,
        range,
        attendees,
    } = resolve_inputs(args, config)?;

    let buckets = ics::process_events(ics::events(&calendar), |events| {
        dedupe(classify(events, &rules, &range, &attendees))
    })
    .with_context(|| format!("failed to read {}", args.calendar.display()))?;
    print!("{}", format_events(&buckets));

    Ok(())
}
