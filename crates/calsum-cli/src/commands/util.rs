//! Shared utilities for CLI commands.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use calsum_core::{AttendeeFilter, DateRange, RuleSet, SerializedRule};
use chrono::{Duration, Local, NaiveDate};
use icalendar::Calendar;
use regex::Regex;

use crate::Config;
use crate::cli::FilterArgs;
use crate::ics;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Conservative bound for relative dates (~1000 years in days).
const MAX_RELATIVE_DAYS: i64 = 1000 * 365;

/// Parse a date string as ISO 8601 or relative to `today`.
///
/// Supports:
/// - ISO 8601: "2024-02-02"
/// - Keywords: "today", "yesterday"
/// - Relative: "3 days ago", "1 week ago"
pub fn parse_date(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    match s {
        "today" => return Ok(today),
        "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(s) else {
        anyhow::bail!(
            "Invalid date: {s}. Use YYYY-MM-DD (e.g., 2024-02-02), 'today', 'yesterday' or relative (e.g., '3 days ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;

    let days_per_unit = match &caps[2] {
        "day" => 1,
        "week" => 7,
        unit => anyhow::bail!("Unknown date unit: {unit}"),
    };

    if n > MAX_RELATIVE_DAYS / days_per_unit {
        anyhow::bail!("Relative date value too large: {n} {}", &caps[2]);
    }

    today
        .checked_sub_signed(Duration::days(n * days_per_unit))
        .with_context(|| format!("relative date out of range: {s}"))
}

/// Returns the first candidate `parse` accepts, or `default` if none does.
pub fn try_parse_first<C, T, F, D>(candidates: C, parse: F, default: D) -> T
where
    C: IntoIterator,
    F: FnMut(C::Item) -> Option<T>,
    D: FnOnce() -> T,
{
    candidates
        .into_iter()
        .find_map(parse)
        .unwrap_or_else(default)
}

/// Reads a JSON rule list, or `None` if the file cannot be read or parsed.
pub fn read_rule_file(path: &Path) -> Option<Vec<SerializedRule>> {
    let file = File::open(path)
        .inspect_err(|err| tracing::warn!(path = ?path, error = %err, "failed to open rule file"))
        .ok()?;
    serde_json::from_reader(BufReader::new(file))
        .inspect_err(|err| tracing::warn!(path = ?path, error = %err, "skipping unparsable rule file"))
        .ok()
}

/// Rules from the first parsable `--rules` file, then config, then built-ins.
pub fn resolve_rules(rule_files: &[PathBuf], config: &Config) -> Result<RuleSet> {
    let serialized = try_parse_first(
        rule_files,
        |path| read_rule_file(path),
        || config.rules.clone().unwrap_or_default(),
    );

    if serialized.is_empty() {
        tracing::debug!("using built-in rules");
        return RuleSet::builtin().context("built-in rules are invalid");
    }
    RuleSet::from_serialized(&serialized).context("invalid rule configuration")
}

/// Everything a reporting command needs, resolved from flags and config.
#[derive(Debug)]
pub struct RunInputs {
    /// Parsed calendar; events are decoded as they are classified.
    pub calendar: Calendar,
    pub rules: RuleSet,
    pub range: DateRange,
    pub attendees: AttendeeFilter,
}

/// Validates configuration, then reads the calendar.
pub fn resolve_inputs(args: &FilterArgs, config: &Config) -> Result<RunInputs> {
    let today = Local::now().date_naive();
    let from = args
        .from
        .as_deref()
        .map(|s| parse_date(s, today))
        .transpose()?
        .unwrap_or(NaiveDate::MIN);
    let to = args
        .to
        .as_deref()
        .map(|s| parse_date(s, today))
        .transpose()?
        .unwrap_or(today);
    let range = DateRange::new(from, to);

    let rules = resolve_rules(&args.rules, config)?;
    let pattern = args.attendee.as_deref().or(config.attendee_filter.as_deref());
    let attendees = AttendeeFilter::from_option(pattern).context("invalid attendee filter")?;
    tracing::debug!(%from, %to, rules = rules.len(), attendee_filter = ?pattern, "resolved inputs");

    let calendar = ics::read_calendar(&args.calendar)
        .with_context(|| format!("failed to read {}", args.calendar.display()))?;

    Ok(RunInputs {
        calendar,
        rules,
        range,
        attendees,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_iso() {
        let today = date(2025, 1, 29);
        assert_eq!(parse_date("2024-02-02", today).unwrap(), date(2024, 2, 2));
    }

    #[test]
    fn test_parse_date_keywords_and_relative() {
        let today = date(2025, 1, 29);
        assert_eq!(parse_date("today", today).unwrap(), today);
        assert_eq!(parse_date("yesterday", today).unwrap(), date(2025, 1, 28));
        assert_eq!(parse_date("3 days ago", today).unwrap(), date(2025, 1, 26));
        assert_eq!(parse_date("1 week ago", today).unwrap(), date(2025, 1, 22));
        assert_eq!(parse_date("2 weeks ago", today).unwrap(), date(2025, 1, 15));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        let today = date(2025, 1, 29);
        assert!(parse_date("next tuesday", today).is_err());
        assert!(parse_date("99999999 weeks ago", today).is_err());
    }

    #[test]
    fn test_try_parse_first_takes_first_success() {
        let picked = try_parse_first(["x", "12", "7"], |s| s.parse::<u32>().ok(), || 0);
        assert_eq!(picked, 12);

        let fallback = try_parse_first(Vec::<&str>::new(), |s| s.parse::<u32>().ok(), || 42);
        assert_eq!(fallback, 42);
    }

    #[test]
    fn test_resolve_rules_prefers_first_parsable_file() {
        let mut broken = tempfile::NamedTempFile::new().unwrap();
        writeln!(broken, "not json").unwrap();
        let mut good = tempfile::NamedTempFile::new().unwrap();
        writeln!(good, r#"[{{"name": "sync", "pattern": ".*[sS]ync.*"}}]"#).unwrap();

        let files = vec![
            broken.path().to_path_buf(),
            PathBuf::from("/nonexistent/rules.json"),
            good.path().to_path_buf(),
        ];
        let rules = resolve_rules(&files, &Config::default()).unwrap();
        let names: Vec<_> = rules.names().collect();
        assert_eq!(names, ["sync"]);
    }

    #[test]
    fn test_resolve_rules_falls_back_to_config_then_builtin() {
        let config = Config {
            rules: Some(vec![SerializedRule::new("standup", "Standup")]),
            attendee_filter: None,
        };
        let rules = resolve_rules(&[], &config).unwrap();
        assert_eq!(rules.names().collect::<Vec<_>>(), ["standup"]);

        let rules = resolve_rules(&[], &Config::default()).unwrap();
        assert_eq!(rules.names().collect::<Vec<_>>(), ["interview", "debrief"]);
    }

    #[test]
    fn test_resolve_rules_rejects_invalid_patterns() {
        let config = Config {
            rules: Some(vec![SerializedRule::new("broken", "(")]),
            attendee_filter: None,
        };
        assert!(resolve_rules(&[], &config).is_err());
    }
}
