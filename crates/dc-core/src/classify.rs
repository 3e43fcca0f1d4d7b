//! Event classification: free-text event fields to a zone and a day range.
//!
//! # Matching rules
//!
//! 1. Titles on the exclusion list are never classified.
//! 2. Summary, then location, are tokenized into whole words. Each zone keyword
//!    (zones in declared order, keywords in declared order) and then each
//!    airport code is tried; the last match wins.
//! 3. A transit notation (`A > B`, `A -> B`) overrides the result with the
//!    destination's zone when the destination resolves.
//! 4. When nothing matched but the event is a booking record, the description
//!    is matched as well.

use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;

use crate::calendar::{EventTime, RawEvent};
use crate::zone::{Location, ZoneRegistry};

/// Words are maximal runs of letters and digits.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").unwrap());

/// Arrow between an origin and a destination.
static TRANSIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*-?>\s*").unwrap());

/// A classified event: `[start, end)` spent in `location`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
    pub location: Location,
}

impl Interval {
    /// Creates an interval, or `None` if it would be empty.
    pub fn new(start: NaiveDate, end: NaiveDate, location: Location) -> Option<Self> {
        (start < end).then_some(Self {
            start,
            end,
            location,
        })
    }

    /// Number of days covered.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Why an event contributed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Excluded,
    NoZone,
    MissingStart,
    MissingEnd,
    EmptyRange,
}

/// Classifies raw events against a zone registry.
#[derive(Debug)]
pub struct Classifier<'a> {
    registry: &'a ZoneRegistry,
    /// Upper-cased keyword token sequences with their zone, in match order.
    keywords: Vec<(Vec<String>, Location)>,
    booking: Vec<Vec<String>>,
    excluded: Vec<String>,
}

impl<'a> Classifier<'a> {
    pub fn new(registry: &'a ZoneRegistry) -> Self {
        let keywords = registry
            .zones()
            .iter()
            .flat_map(|zone| {
                zone.keywords
                    .iter()
                    .map(|keyword| upper_tokens(keyword))
                    .filter(|tokens| !tokens.is_empty())
                    .map(|tokens| (tokens, Location::Zone(zone.name.clone())))
            })
            .collect();

        let booking = registry
            .booking_keywords()
            .iter()
            .map(|keyword| upper_tokens(keyword))
            .filter(|tokens| !tokens.is_empty())
            .collect();

        let excluded = registry
            .excluded_titles()
            .iter()
            .map(|title| title.trim().to_lowercase())
            .collect();

        Self {
            registry,
            keywords,
            booking,
            excluded,
        }
    }

    /// Classifies one event, or `None` if it contributes nothing.
    pub fn classify(&self, event: &RawEvent) -> Option<Interval> {
        match self.try_classify(event) {
            Ok(interval) => {
                tracing::trace!(
                    summary = %event.summary,
                    start = %interval.start,
                    end = %interval.end,
                    zone = %interval.location,
                    "classified event"
                );
                Some(interval)
            }
            Err(reason) => {
                tracing::debug!(summary = %event.summary, ?reason, "dropping event");
                None
            }
        }
    }

    /// Classifies every event, returning intervals sorted by start date.
    ///
    /// The sort is stable, so same-day intervals keep their input order.
    pub fn classify_all(&self, events: &[RawEvent]) -> Vec<Interval> {
        let mut intervals: Vec<Interval> = events.iter().filter_map(|e| self.classify(e)).collect();
        intervals.sort_by_key(|i| i.start);
        tracing::debug!(
            events = events.len(),
            intervals = intervals.len(),
            "classified calendar"
        );
        intervals
    }

    /// Resolves the zone an event places the traveler in, ignoring its dates.
    pub fn locate(&self, event: &RawEvent) -> Option<Location> {
        let summary = event.summary.as_str();
        let location = event.location.as_deref();

        if self.is_excluded(summary) {
            return None;
        }

        let mut found = [Some(summary), location]
            .into_iter()
            .flatten()
            .filter_map(|field| self.match_field(field))
            .next_back();

        let destination = location
            .and_then(transit_destination)
            .or_else(|| transit_destination(summary));
        if let Some(zone) = destination.and_then(|d| self.match_field(d)) {
            found = Some(zone);
        }

        if found.is_none() && self.is_booking(summary, location) {
            found = event
                .description
                .as_deref()
                .and_then(|d| self.match_field(d));
        }

        found
    }

    fn try_classify(&self, event: &RawEvent) -> Result<Interval, Skip> {
        if self.is_excluded(&event.summary) {
            return Err(Skip::Excluded);
        }
        let location = self.locate(event).ok_or(Skip::NoZone)?;
        let (start, end) = day_span(event)?;
        Interval::new(start, end, location).ok_or(Skip::EmptyRange)
    }

    fn is_excluded(&self, summary: &str) -> bool {
        let summary = summary.trim().to_lowercase();
        self.excluded.iter().any(|title| *title == summary)
    }

    fn is_booking(&self, summary: &str, location: Option<&str>) -> bool {
        [Some(summary), location].into_iter().flatten().any(|field| {
            let tokens = upper_tokens(field);
            self.booking.iter().any(|kw| contains_sequence(&tokens, kw))
        })
    }

    /// Last zone matched within one text field.
    fn match_field(&self, text: &str) -> Option<Location> {
        let raw: Vec<&str> = TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect();
        let upper: Vec<String> = raw.iter().map(|t| t.to_uppercase()).collect();

        let keyword_match = self
            .keywords
            .iter()
            .filter(|(keyword, _)| contains_sequence(&upper, keyword))
            .map(|(_, zone)| zone)
            .next_back();

        let airport_match = raw
            .iter()
            .filter(|token| is_airport_code(token))
            .filter_map(|code| self.registry.airport(code))
            .next_back();

        airport_match.or(keyword_match).cloned()
    }
}

/// Converts event start/end into the calendar days it occupies.
///
/// All-day events keep their exclusive end date. Timed events occupy only
/// their start day. Timed values are wall-clock times in their own zone, so
/// start and end are only checked for order when both share a zone. A
/// westbound hop can land before it departs on the clock.
fn day_span(event: &RawEvent) -> Result<(NaiveDate, NaiveDate), Skip> {
    let start = event.start.ok_or(Skip::MissingStart)?;
    match (start, event.end) {
        (EventTime::Date(first), None) => first
            .checked_add_days(Days::new(1))
            .map(|next| (first, next))
            .ok_or(Skip::EmptyRange),
        (EventTime::Date(first), Some(end)) => Ok((first, end.date())),
        (EventTime::DateTime(_), None) => Err(Skip::MissingEnd),
        (EventTime::DateTime(from), Some(end)) => {
            let to = match end {
                EventTime::DateTime(to) => to,
                EventTime::Date(to) => to.and_time(chrono::NaiveTime::MIN),
            };
            if from >= to && !event.mixed_time_zones {
                return Err(Skip::EmptyRange);
            }
            let day = from.date();
            day.checked_add_days(Days::new(1))
                .map(|next| (day, next))
                .ok_or(Skip::EmptyRange)
        }
    }
}

fn upper_tokens(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_uppercase())
        .collect()
}

fn contains_sequence(tokens: &[String], needle: &[String]) -> bool {
    !needle.is_empty() && tokens.windows(needle.len()).any(|w| w == needle)
}

/// Airport codes are matched only when written as three upper-case letters.
fn is_airport_code(token: &str) -> bool {
    token.len() == 3 && token.chars().all(|c| c.is_ascii_uppercase())
}

/// Destination segment after the last transit arrow, if any.
fn transit_destination(text: &str) -> Option<&str> {
    let arrow = TRANSIT_RE.find_iter(text).last()?;
    let destination = text[arrow.end()..].trim();
    (!destination.is_empty()).then_some(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::ZoneConfig;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn zone(name: &str) -> Location {
        Location::Zone(name.to_string())
    }

    fn event(summary: &str) -> RawEvent {
        RawEvent::all_day(summary, date(2024, 1, 10), date(2024, 1, 15))
    }

    #[test]
    fn classifies_all_day_keyword_event() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        let interval = classifier.classify(&event("Trip to BERLIN")).unwrap();
        assert_eq!(
            interval,
            Interval {
                start: date(2024, 1, 10),
                end: date(2024, 1, 15),
                location: zone("SCHENGEN"),
            }
        );
        assert_eq!(interval.days(), 5);
    }

    #[test]
    fn keywords_match_whole_words_only() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        let trunk = event("Drive").with_location("TRUNK ROAD");
        assert_eq!(classifier.classify(&trunk), None);

        let uk = event("Drive").with_location("Bath, UK");
        assert_eq!(classifier.locate(&uk), Some(zone("UK")));
    }

    #[test]
    fn keywords_are_case_insensitive_and_may_span_words() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        assert_eq!(
            classifier.locate(&event("weekend in kraków")),
            None,
            "accented spelling is a different word"
        );
        assert_eq!(classifier.locate(&event("weekend in krakow")), Some(zone("SCHENGEN")));
        assert_eq!(
            classifier.locate(&event("Back to the United Kingdom")),
            Some(zone("UK"))
        );
    }

    #[test]
    fn last_match_wins_across_zones_and_fields() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        // UK is declared after SCHENGEN, so it wins within a field.
        assert_eq!(
            classifier.locate(&event("LONDON and PARIS")),
            Some(zone("UK"))
        );
        // The location field is evaluated after the summary.
        let e = event("PARIS").with_location("KYIV");
        assert_eq!(classifier.locate(&e), Some(zone("UKRAINE")));
    }

    #[test]
    fn airport_codes_require_upper_case() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        assert_eq!(classifier.locate(&event("Flight to KBP")), Some(zone("UKRAINE")));
        assert_eq!(classifier.locate(&event("man on the moon")), None);
        assert_eq!(classifier.locate(&event("Land at JFK")), Some(Location::Outside));
    }

    #[test]
    fn transit_destination_overrides_origin() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        // Without the arrow, the airport code would outrank the city keyword.
        let flight = event("Flight LO752").with_location("KBP > WARSAW");
        assert_eq!(classifier.locate(&flight), Some(zone("SCHENGEN")));

        let arrow = event("Flight").with_location("KRK -> KBP");
        assert_eq!(classifier.locate(&arrow), Some(zone("UKRAINE")));

        let home = event("WARSAW -> JFK");
        assert_eq!(classifier.locate(&home), Some(Location::Outside));

        let hops = event("Flight").with_location("WAW > LHR > KBP");
        assert_eq!(classifier.locate(&hops), Some(zone("UKRAINE")));
    }

    #[test]
    fn unresolved_destination_keeps_whole_field_match() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        let e = event("Flight").with_location("BERLIN > Somewhere");
        assert_eq!(classifier.locate(&e), Some(zone("SCHENGEN")));
    }

    #[test]
    fn booking_records_fall_back_to_description() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        let booking = event("Hotel reservation").with_description("Grand Hotel, VIENNA");
        assert_eq!(classifier.locate(&booking), Some(zone("SCHENGEN")));

        let plain = event("Dinner").with_description("Grand Hotel, VIENNA");
        assert_eq!(classifier.locate(&plain), None);

        let direct = event("Booking: LVIV").with_description("VIENNA");
        assert_eq!(classifier.locate(&direct), Some(zone("UKRAINE")));
    }

    #[test]
    fn excluded_titles_are_never_classified() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        assert_eq!(
            classifier.classify(&event("  schengen VISA appointment ")),
            None
        );
        assert!(classifier.classify(&event("Schengen visa appointment prep in PRAGUE")).is_some());
    }

    #[test]
    fn timed_events_occupy_their_start_day() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        let overnight = RawEvent::timed(
            "Night train to PRAGUE",
            date(2024, 3, 1).and_hms_opt(22, 0, 0).unwrap(),
            date(2024, 3, 3).and_hms_opt(7, 0, 0).unwrap(),
        );
        let interval = classifier.classify(&overnight).unwrap();
        assert_eq!(interval.start, date(2024, 3, 1));
        assert_eq!(interval.end, date(2024, 3, 2));
    }

    #[test]
    fn cross_zone_flight_is_not_reversed() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        // Departs Kyiv 10:00 local, lands London 09:00 local.
        let departure = date(2024, 3, 1).and_hms_opt(10, 0, 0).unwrap();
        let arrival = date(2024, 3, 1).and_hms_opt(9, 0, 0).unwrap();
        let same_zone = RawEvent::timed("Flight", departure, arrival).with_location("KBP > LHR");
        assert_eq!(classifier.classify(&same_zone), None);

        let flight = RawEvent {
            mixed_time_zones: true,
            ..same_zone
        };
        let interval = classifier.classify(&flight).unwrap();
        assert_eq!(interval.start, date(2024, 3, 1));
        assert_eq!(interval.end, date(2024, 3, 2));
        assert_eq!(interval.location, zone("UK"));
    }

    #[test]
    fn malformed_events_are_dropped() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        let reversed = RawEvent::all_day("ROME", date(2024, 1, 15), date(2024, 1, 10));
        assert_eq!(classifier.classify(&reversed), None);

        let same_day = RawEvent::all_day("ROME", date(2024, 1, 15), date(2024, 1, 15));
        assert_eq!(classifier.classify(&same_day), None);

        let no_start = RawEvent {
            summary: "ROME".into(),
            ..RawEvent::default()
        };
        assert_eq!(classifier.classify(&no_start), None);

        let instant = RawEvent::timed(
            "ROME",
            date(2024, 1, 15).and_hms_opt(9, 0, 0).unwrap(),
            date(2024, 1, 15).and_hms_opt(9, 0, 0).unwrap(),
        );
        assert_eq!(classifier.classify(&instant), None);
    }

    #[test]
    fn all_day_without_end_lasts_one_day() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        let e = RawEvent {
            summary: "OSLO".into(),
            start: Some(EventTime::Date(date(2024, 2, 1))),
            ..RawEvent::default()
        };
        let interval = classifier.classify(&e).unwrap();
        assert_eq!((interval.start, interval.end), (date(2024, 2, 1), date(2024, 2, 2)));
    }

    #[test]
    fn classify_all_sorts_stably_by_start() {
        let registry = ZoneRegistry::default();
        let classifier = Classifier::new(&registry);

        let events = vec![
            RawEvent::all_day("LONDON", date(2024, 2, 1), date(2024, 2, 3)),
            RawEvent::all_day("PARIS", date(2024, 1, 1), date(2024, 1, 3)),
            RawEvent::all_day("KYIV", date(2024, 2, 1), date(2024, 2, 2)),
            RawEvent::all_day("Dentist", date(2024, 1, 5), date(2024, 1, 6)),
        ];

        let zones: Vec<_> = classifier
            .classify_all(&events)
            .into_iter()
            .map(|i| i.location.to_string())
            .collect();
        assert_eq!(zones, vec!["SCHENGEN", "UK", "UKRAINE"]);
    }

    #[test]
    fn synthetic_registry() {
        let registry = ZoneRegistry::new(vec![
            ZoneConfig::new("NORTH", 5, 10, &["north pole"]),
            ZoneConfig::new("SOUTH", 5, 10, &["south"]),
        ])
        .unwrap()
        .with_airports([("NPL", "NORTH"), ("HOM", "OUTSIDE")])
        .unwrap();
        let classifier = Classifier::new(&registry);

        assert_eq!(
            classifier.locate(&event("Visit the North Pole")),
            Some(zone("NORTH"))
        );
        assert_eq!(classifier.locate(&event("North, then Pole")), None);
        assert_eq!(classifier.locate(&event("NPL > HOM")), Some(Location::Outside));
        // No booking keywords configured.
        assert_eq!(
            classifier.locate(&event("Hotel reservation").with_description("south")),
            None
        );
    }
}
