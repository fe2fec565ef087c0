//! End-to-end tests for the complete summary flow.
//!
//! Tests the full pipeline: .ics file → classify → dedupe → aggregate → output.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn calsum_binary() -> String {
    env!("CARGO_BIN_EXE_calsum").to_string()
}

const CALENDAR: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//test//calsum//EN\r
BEGIN:VEVENT\r
SUMMARY:Interview with Bob\r
DTSTART:20230510T100000\r
DTEND:20230510T110000\r
ATTENDEE;CN=Me;PARTSTAT=ACCEPTED:mailto:me@example.com\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:INTERVIEW_1 onsite interview\r
DTSTART:20240202T140000\r
DTEND:20240202T160000\r
ATTENDEE;CN=Me;PARTSTAT=ACCEPTED:mailto:me@example.com\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:INTERVIEW_2 onsite interview\r
DTSTART:20240202T140000\r
DTEND:20240202T160000\r
ATTENDEE;CN=Me;PARTSTAT=ACCEPTED:mailto:me@example.com\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:HOLD! Interview with Carol\r
DTSTART:20240203T090000\r
DTEND:20240203T100000\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:Interview prep\r
DTSTART:20240204T090000\r
DTEND:20240204T100000\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:Interview with Dave\r
DTSTART:20240205T090000\r
DTEND:20240205T100000\r
STATUS:CANCELLED\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:Candidate debrief\r
DTSTART:20240202T170000\r
DURATION:PT30M45S\r
ATTENDEE;CN=Me;PARTSTAT=DECLINED:mailto:me@example.com\r
END:VEVENT\r
END:VCALENDAR\r
";

/// Isolated environment: config lookups resolve inside the temp dir.
struct Env {
    temp: TempDir,
    calendar: PathBuf,
}

impl Env {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let calendar = temp.path().join("calendar.ics");
        std::fs::write(&calendar, CALENDAR).unwrap();
        Self { temp, calendar }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(calsum_binary());
        cmd.env("HOME", self.temp.path())
            .env("XDG_CONFIG_HOME", self.temp.path().join(".config"))
            .env_remove("CALSUM_RULES")
            .env_remove("CALSUM_ATTENDEE_FILTER")
            .env_remove("RUST_LOG");
        cmd
    }

    /// `calsum summary <calendar> --to 2024-12-31` plus extra args.
    fn summary(&self, extra: &[&str]) -> Output {
        self.command()
            .arg("summary")
            .arg(self.calendar())
            .arg("--to")
            .arg("2024-12-31")
            .args(extra)
            .output()
            .expect("failed to run calsum")
    }

    fn calendar(&self) -> &Path {
        &self.calendar
    }
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "calsum should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_summary_with_builtin_rules() {
    let env = Env::new();
    let output = env.summary(&[]);

    // Duplicate bookings count once; holds, prep sessions and cancellations
    // are ignored.
    assert_eq!(
        stdout(&output),
        "2023:\n\
         interview: 1 h 0 min (1 entries)\n\
         debrief: 0 h 0 min (0 entries)\n\
         2024:\n\
         interview: 2 h 0 min (1 entries)\n\
         debrief: 0 h 30 min (1 entries)\n\
         Total:\n\
         interview: 3 h 0 min (2 entries)\n\
         debrief: 0 h 30 min (1 entries)\n"
    );
}

#[test]
fn test_summary_date_range_is_inclusive_of_last_day() {
    let env = Env::new();
    let output = env
        .command()
        .arg("summary")
        .arg(env.calendar())
        .args(["--from", "2024-01-01", "--to", "2024-02-02"])
        .output()
        .unwrap();

    let out = stdout(&output);
    assert!(!out.contains("2023:"), "2023 should be excluded: {out}");
    assert!(
        out.ends_with("Total:\ninterview: 2 h 0 min (1 entries)\ndebrief: 0 h 30 min (1 entries)\n"),
        "{out}"
    );
}

#[test]
fn test_summary_attendee_filter() {
    let env = Env::new();
    let output = env.summary(&["--attendee", "Me"]);

    // The debrief was declined, so it no longer counts.
    let out = stdout(&output);
    assert!(
        out.ends_with("Total:\ninterview: 3 h 0 min (2 entries)\ndebrief: 0 h 0 min (0 entries)\n"),
        "{out}"
    );
}

#[test]
fn test_summary_with_rule_file() {
    let env = Env::new();
    let rules = env.write(
        "rules.json",
        r#"[{"name": "onsite", "pattern": "INTERVIEW.*"}, {"name": "everything", "pattern": ".*"}]"#,
    );
    let output = env.summary(&["--rules", rules.to_str().unwrap()]);

    let out = stdout(&output);
    let total = out.split("Total:\n").nth(1).unwrap();
    assert_eq!(
        total,
        "onsite: 2 h 0 min (1 entries)\neverything: 3 h 30 min (4 entries)\n"
    );
}

#[test]
fn test_summary_json() {
    let env = Env::new();
    let output = env.summary(&["--json"]);

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["range"]["to"], "2024-12-31");
    assert_eq!(value["years"].as_array().unwrap().len(), 2);
    assert_eq!(value["total"][0]["category"], "interview");
    assert_eq!(value["total"][0]["count"], 2);
    assert_eq!(value["total"][1]["total_seconds"], 1845);
}

#[test]
fn test_events_listing() {
    let env = Env::new();
    let output = env
        .command()
        .arg("events")
        .arg(env.calendar())
        .arg("--to")
        .arg("2024-12-31")
        .output()
        .unwrap();

    assert_eq!(
        stdout(&output),
        "Events of 'interview'\n\
         2023-05-10T10:00: Interview with Bob (1 h 0 min)\n\
         2024-02-02T14:00: INTERVIEW_2 onsite interview (2 h 0 min)\n\
         Events of 'debrief'\n\
         2024-02-02T17:00: Candidate debrief (0 h 30 min)\n"
    );
}

#[test]
fn test_config_file_supplies_rules() {
    let env = Env::new();
    let config = env.write(
        "config.toml",
        "[[rules]]\nname = \"debrief\"\npattern = \".*[dD]ebrief.*\"\n",
    );
    let output = env
        .command()
        .arg("--config")
        .arg(&config)
        .arg("summary")
        .arg(env.calendar())
        .arg("--to")
        .arg("2024-12-31")
        .output()
        .unwrap();

    let out = stdout(&output);
    assert!(out.ends_with("Total:\ndebrief: 0 h 30 min (1 entries)\n"), "{out}");
}

#[test]
fn test_rules_command_prints_defaults() {
    let env = Env::new();
    let output = env.command().arg("rules").output().unwrap();

    let rules: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(rules[0]["name"], "interview");
    assert_eq!(rules[1]["name"], "debrief");
    assert_eq!(rules[1]["pattern"], ".*[dD]ebrief.*");
}

#[test]
fn test_invalid_rule_pattern_fails_before_reading_calendar() {
    let env = Env::new();
    let config = env.write(
        "config.toml",
        "[[rules]]\nname = \"broken\"\npattern = \"([a-z\"\n",
    );
    let output = env
        .command()
        .arg("--config")
        .arg(&config)
        .arg("summary")
        .arg(env.temp.path().join("missing.ics"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid rule configuration"), "{stderr}");
}

#[test]
fn test_malformed_calendar_fails() {
    let env = Env::new();
    let calendar = env.write(
        "broken.ics",
        "BEGIN:VCALENDAR\nBEGIN:VEVENT\nSUMMARY:Interview\nEND:VEVENT\nEND:VCALENDAR\n",
    );
    let output = env
        .command()
        .arg("summary")
        .arg(&calendar)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("event without DTSTART"), "{stderr}");
}
