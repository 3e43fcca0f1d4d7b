//! iCalendar event extraction.
//!
//! Documents are read with [`ical::IcalParser`]. Only the properties the
//! classifier needs are mapped: `SUMMARY`, `LOCATION`, `DESCRIPTION`,
//! `DTSTART`, `DTEND`, `DURATION` and `STATUS`. An event whose date properties
//! are present but malformed is dropped; one bad record never blocks the rest.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use ical::parser::ical::component::IcalEvent;
use ical::property::Property;
use regex::Regex;
use thiserror::Error;

/// RFC 5545 duration: `[+-]P` then weeks, or days and/or a time part.
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-])?P(?:(\d+)W|(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?)$").unwrap()
});

/// Calendar decoding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The document is not structurally valid iCalendar.
    #[error("invalid calendar document: {0}")]
    Parse(String),
}

/// Start or end of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventTime {
    /// All-day value.
    Date(NaiveDate),
    /// Timed value, as written (no timezone conversion).
    DateTime(NaiveDateTime),
}

impl EventTime {
    /// Calendar day of this value.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(date) => *date,
            Self::DateTime(dt) => dt.date(),
        }
    }

    /// Shifts the value by `delta`; all-day values stay all-day.
    pub fn checked_add(self, delta: TimeDelta) -> Option<Self> {
        match self {
            Self::Date(date) => date
                .and_time(NaiveTime::MIN)
                .checked_add_signed(delta)
                .map(|dt| Self::Date(dt.date())),
            Self::DateTime(dt) => dt.checked_add_signed(delta).map(Self::DateTime),
        }
    }
}

/// One event record, before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEvent {
    pub summary: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    /// Start and end are written in different time zones, so their
    /// wall-clock values cannot be compared.
    pub mixed_time_zones: bool,
}

impl RawEvent {
    /// All-day event spanning `[start, end)`.
    pub fn all_day(summary: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            summary: summary.to_string(),
            start: Some(EventTime::Date(start)),
            end: Some(EventTime::Date(end)),
            ..Self::default()
        }
    }

    /// Timed event.
    pub fn timed(summary: &str, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            summary: summary.to_string(),
            start: Some(EventTime::DateTime(start)),
            end: Some(EventTime::DateTime(end)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Extracts all non-cancelled `VEVENT` records from a calendar document.
pub fn parse_calendar(text: &str) -> Result<Vec<RawEvent>, CalendarError> {
    let mut events = Vec::new();

    for calendar in ical::IcalParser::new(text.as_bytes()) {
        let calendar = calendar.map_err(|e| CalendarError::Parse(e.to_string()))?;
        events.extend(calendar.events.iter().filter_map(map_event));
    }

    Ok(events)
}

/// Maps one `VEVENT` to a [`RawEvent`], or `None` if it must be skipped.
fn map_event(component: &IcalEvent) -> Option<RawEvent> {
    let mut event = RawEvent::default();
    let mut duration = None;
    let mut zones = (None, None);
    let mut malformed = false;
    let mut cancelled = false;

    for property in &component.properties {
        let value = property.value.as_deref().unwrap_or_default();
        match property.name.to_ascii_uppercase().as_str() {
            "SUMMARY" => event.summary = unescape_text(value),
            "LOCATION" => event.location = Some(unescape_text(value)),
            "DESCRIPTION" => event.description = Some(unescape_text(value)),
            "DTSTART" => {
                event.start = parse_event_time(property);
                zones.0 = zone_designator(property);
                malformed |= event.start.is_none();
            }
            "DTEND" => {
                event.end = parse_event_time(property);
                zones.1 = zone_designator(property);
                malformed |= event.end.is_none();
            }
            "DURATION" => {
                duration = parse_duration(value);
                malformed |= duration.is_none();
            }
            "STATUS" => cancelled = value.trim().eq_ignore_ascii_case("CANCELLED"),
            _ => {}
        }
    }

    if cancelled {
        tracing::debug!(summary = %event.summary, "skipping cancelled event");
        return None;
    }
    if malformed {
        tracing::debug!(summary = %event.summary, "skipping event with malformed dates");
        return None;
    }

    if let (Some(start), None, Some(duration)) = (event.start, event.end, duration) {
        event.end = start.checked_add(duration);
    }
    if let (Some(EventTime::DateTime(_)), Some(EventTime::DateTime(_))) = (event.start, event.end) {
        event.mixed_time_zones = zones.0 != zones.1;
    }

    Some(event)
}

fn param<'a>(property: &'a Property, name: &str) -> Option<&'a str> {
    property
        .params
        .as_ref()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}

/// `TZID` parameter, `UTC` for a `Z` suffix, or `None` for floating time.
fn zone_designator(property: &Property) -> Option<String> {
    if let Some(tzid) = param(property, "TZID") {
        return Some(tzid.trim_matches('"').to_string());
    }
    property
        .value
        .as_deref()
        .is_some_and(|v| v.trim().ends_with('Z'))
        .then(|| "UTC".to_string())
}

fn parse_event_time(property: &Property) -> Option<EventTime> {
    let value = property.value.as_deref()?.trim();
    let date_only = param(property, "VALUE").is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
        || !value.contains('T');

    if date_only {
        NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()
            .map(EventTime::Date)
    } else {
        NaiveDateTime::parse_from_str(value.trim_end_matches('Z'), "%Y%m%dT%H%M%S")
            .ok()
            .map(EventTime::DateTime)
    }
}

fn parse_duration(value: &str) -> Option<TimeDelta> {
    let caps = DURATION_RE.captures(value.trim())?;
    let units: [(usize, i64); 5] = [(2, 604_800), (3, 86_400), (4, 3_600), (5, 60), (6, 1)];

    let mut seconds: i64 = 0;
    let mut any = false;
    for (group, scale) in units {
        if let Some(m) = caps.get(group) {
            let n: i64 = m.as_str().parse().ok()?;
            seconds = seconds.checked_add(n.checked_mul(scale)?)?;
            any = true;
        }
    }
    if !any {
        return None;
    }
    if caps.get(1).is_some_and(|sign| sign.as_str() == "-") {
        seconds = -seconds;
    }
    TimeDelta::try_seconds(seconds)
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
