//! Reading events from iCalendar (`.ics`) files.
//!
//! Only what the summaries need is decoded: `SUMMARY`, `DTSTART`, `DTEND`
//! or `DURATION`, `STATUS` and `ATTENDEE` (with `CN` and `PARTSTAT`).
//!
//! # Time zones
//!
//! Every timestamp ends up as local wall time. UTC values and values with a
//! known `TZID` are converted to the local zone; floating values are kept
//! as written. Date-only values start at midnight.

use std::path::Path;
use std::sync::LazyLock;

use calsum_core::{Attendee, CalendarEvent, EventStatus, ParticipationStatus, ValidationError};
use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, EventLike,
    Property,
};
use regex::Regex;
use thiserror::Error;

/// Pre-compiled regex for RFC 5545 durations (e.g. `PT1H30M`, `P1D`, `-PT15M`).
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-])?P(?:(\d+)W|(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?)$").unwrap()
});

/// Errors decoding a calendar file.
#[derive(Debug, Error)]
pub enum IcsError {
    #[error("failed to read calendar")]
    Io(#[from] std::io::Error),

    #[error("failed to parse calendar: {0}")]
    Parse(String),

    #[error("event '{title}': {message}")]
    Malformed { title: String, message: String },

    #[error(transparent)]
    InvalidEvent(#[from] ValidationError),
}

impl IcsError {
    fn malformed(title: &str, message: impl Into<String>) -> Self {
        Self::Malformed {
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// Reads and parses a calendar file.
pub fn read_calendar(path: &Path) -> Result<Calendar, IcsError> {
    let contents = std::fs::read_to_string(path)?;
    parse_calendar(&contents)
}

pub fn parse_calendar(contents: &str) -> Result<Calendar, IcsError> {
    let calendar = contents
        .parse::<Calendar>()
        .map_err(|err| IcsError::Parse(err.to_string()))?;
    tracing::debug!(components = calendar.components.len(), "parsed calendar");
    Ok(calendar)
}

/// Lazily decodes every `VEVENT` of a calendar, in file order.
pub fn events(calendar: &Calendar) -> impl Iterator<Item = Result<CalendarEvent, IcsError>> + '_ {
    calendar
        .components
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => Some(decode_event(event)),
            _ => None,
        })
}

/// Hands the decoded events to `consume` as a plain stream.
///
/// The stream ends at the first event that fails to decode, and that error
/// is returned instead of whatever `consume` produced.
pub fn process_events<T>(
    events: impl Iterator<Item = Result<CalendarEvent, IcsError>>,
    consume: impl FnOnce(&mut dyn Iterator<Item = CalendarEvent>) -> T,
) -> Result<T, IcsError> {
    let mut error = None;
    let mut decoded = events.map_while(|event| event.map_err(|err| error = Some(err)).ok());
    let output = consume(&mut decoded);
    drop(decoded);
    error.map_or(Ok(output), Err)
}

fn decode_event(event: &icalendar::Event) -> Result<CalendarEvent, IcsError> {
    let title = event.get_summary().unwrap_or_default();

    let start = match event.get_start() {
        Some(start) => start,
        None => {
            return Err(match event.property_value("DTSTART") {
                Some(value) => IcsError::malformed(title, format!("invalid DTSTART: {value}")),
                None => IcsError::malformed(title, "event without DTSTART"),
            });
        }
    };
    let date_only = matches!(start, DatePerhapsTime::Date(_));
    let start = to_local(start);

    // An all-day event without an end lasts one day.
    let end = match (event.get_end(), event.property_value("DURATION")) {
        (Some(end), _) => Some(to_local(end)),
        (None, _) if event.property_value("DTEND").is_some() => {
            return Err(IcsError::malformed(title, "invalid DTEND"));
        }
        (None, Some(value)) => {
            let duration = parse_duration(value)
                .ok_or_else(|| IcsError::malformed(title, format!("invalid duration: {value}")))?;
            start.checked_add_signed(duration)
        }
        (None, None) if date_only => start.checked_add_signed(Duration::days(1)),
        (None, None) => Some(start),
    }
    .ok_or_else(|| IcsError::malformed(title, "event end is out of range"))?;

    let mut decoded = CalendarEvent::new(title, start, end)?.with_attendees(attendees(event));
    if let Some(status) = event.get_status() {
        decoded = decoded.with_status(match status {
            icalendar::EventStatus::Tentative => EventStatus::Tentative,
            icalendar::EventStatus::Confirmed => EventStatus::Confirmed,
            icalendar::EventStatus::Cancelled => EventStatus::Cancelled,
        });
    }
    Ok(decoded)
}

/// Resolves a calendar timestamp to local wall time.
fn to_local(value: DatePerhapsTime) -> NaiveDateTime {
    match value {
        DatePerhapsTime::Date(date) => date.and_time(NaiveTime::MIN),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(date_time)) => date_time,
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(date_time)) => {
            date_time.with_timezone(&Local).naive_local()
        }
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            match tzid.parse::<Tz>() {
                Ok(tz) => from_zone(&tz, date_time).with_timezone(&Local).naive_local(),
                Err(_) => {
                    tracing::warn!(tzid, "unknown time zone, treating as local wall time");
                    date_time
                }
            }
        }
    }
}

/// Places a wall time in `tz`, taking the earlier instant when it is
/// ambiguous and reading it as UTC when it does not exist.
fn from_zone<Z: TimeZone>(tz: &Z, naive: NaiveDateTime) -> DateTime<Z> {
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive).with_timezone(tz))
}

/// Parses an RFC 5545 duration value.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let caps = DURATION_RE.captures(value.trim())?;
    let number = |idx: usize| -> Option<i64> {
        caps.get(idx)
            .map_or(Some(0), |m| m.as_str().parse::<i64>().ok())
    };
    let parts = [
        Duration::try_weeks(number(2)?)?,
        Duration::try_days(number(3)?)?,
        Duration::try_hours(number(4)?)?,
        Duration::try_minutes(number(5)?)?,
        Duration::try_seconds(number(6)?)?,
    ];
    let total = parts
        .into_iter()
        .try_fold(Duration::zero(), |acc, part| acc.checked_add(&part))?;
    if caps.get(1).is_some_and(|sign| sign.as_str() == "-") {
        Some(-total)
    } else {
        Some(total)
    }
}

fn attendees(event: &icalendar::Event) -> Vec<Attendee> {
    let repeated = event.multi_properties().get("ATTENDEE").into_iter().flatten();
    let single = event.properties().get("ATTENDEE");
    repeated.chain(single).map(to_attendee).collect()
}

fn to_attendee(property: &Property) -> Attendee {
    let param = |key: &str| {
        property
            .params()
            .get(key)
            .map(|param| param.value().trim_matches('"'))
    };

    let name = param("CN").map_or_else(
        || {
            let value = property.value().trim();
            value
                .get(..7)
                .filter(|scheme| scheme.eq_ignore_ascii_case("mailto:"))
                .map_or(value, |_| &value[7..])
                .to_string()
        },
        ToString::to_string,
    );
    let status = param("PARTSTAT").and_then(|token| {
        token
            .parse::<ParticipationStatus>()
            .inspect_err(|err| tracing::debug!(error = %err, "ignoring PARTSTAT"))
            .ok()
    });
    Attendee::new(name, status)
}
