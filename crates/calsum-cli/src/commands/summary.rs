//! Summary command for per-year and all-time category totals.
//!
//! This module implements `calsum summary` with human-readable and JSON
//! output. Years are listed in ascending order and categories in rule
//! declaration order.

use std::fmt::Write;

use anyhow::{Context, Result};
use calsum_core::{DateRange, Report, TypeSummary};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Serialize;

use super::util::{RunInputs, resolve_inputs};
use crate::Config;
use crate::cli::FilterArgs;
use crate::ics;

// ========== Duration Formatting ==========

/// Formats a duration as "<H> h <M> min".
///
/// Seconds are dropped, not rounded.
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes();
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    format!("{hours} h {minutes} min")
}

fn format_line(summary: &TypeSummary) -> String {
    format!(
        "{}: {} ({} entries)",
        summary.category,
        format_duration(summary.total_duration),
        summary.count
    )
}

// ========== Human Output ==========

/// Formats the human-readable summary.
pub fn format_summary(report: &Report) -> String {
    let mut output = String::new();

    for yearly in &report.by_year {
        writeln!(output, "{}:", yearly.year).unwrap();
        for summary in &yearly.per_category {
            writeln!(output, "{}", format_line(summary)).unwrap();
        }
    }

    writeln!(output, "Total:").unwrap();
    for summary in &report.grand_total {
        writeln!(output, "{}", format_line(summary)).unwrap();
    }

    output
}

// ========== JSON Output ==========

/// JSON summary structure.
#[derive(Debug, Serialize)]
pub struct JsonSummary {
    pub generated_at: String,
    pub timezone: String,
    pub range: JsonRange,
    pub years: Vec<JsonYear>,
    pub total: Vec<JsonCategory>,
}

#[derive(Debug, Serialize)]
pub struct JsonRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct JsonYear {
    pub year: i32,
    pub categories: Vec<JsonCategory>,
}

#[derive(Debug, Serialize)]
pub struct JsonCategory {
    pub category: String,
    pub count: usize,
    pub total_seconds: i64,
    pub total: String,
    pub first_start: Option<String>,
    pub last_end: Option<String>,
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}

impl From<&TypeSummary> for JsonCategory {
    fn from(summary: &TypeSummary) -> Self {
        Self {
            category: summary.category.clone(),
            count: summary.count,
            total_seconds: summary.total_duration.num_seconds(),
            total: format_duration(summary.total_duration),
            first_start: summary.first_start.map(format_timestamp),
            last_end: summary.last_end.map(format_timestamp),
        }
    }
}

/// Formats a report as JSON.
pub fn format_summary_json(
    report: &Report,
    range: &DateRange,
    timezone: &str,
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let summary = JsonSummary {
        generated_at: generated_at.to_rfc3339(),
        timezone: timezone.to_string(),
        range: JsonRange {
            from: range.from().format("%Y-%m-%d").to_string(),
            to: range.to().format("%Y-%m-%d").to_string(),
        },
        years: report
            .by_year
            .iter()
            .map(|yearly| JsonYear {
                year: yearly.year,
                categories: yearly.per_category.iter().map(JsonCategory::from).collect(),
            })
            .collect(),
        total: report.grand_total.iter().map(JsonCategory::from).collect(),
    };

    Ok(serde_json::to_string_pretty(&summary)?)
}

// ========== Public Interface ==========

/// Runs the summary command.
pub fn run(args: &FilterArgs, config: &Config, json: bool) -> Result<()> {
    let RunInputs {
        calendar,
        rules,
        range,
        attendees,
    } = resolve_inputs(args, config)?;

    let report = ics::process_events(ics::events(&calendar), |events| {
        Report::build(events, &rules, &range, &attendees)
    })
    .with_context(|| format!("failed to read {}", args.calendar.display()))?;

    if json {
        let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
        let output = format_summary_json(&report, &range, &timezone, Utc::now())?;
        println!("{output}");
    } else {
        print!("{}", format_summary(&report));
    }

    Ok(())
}
