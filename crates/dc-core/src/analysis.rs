//! End-to-end pipeline: raw events to a compliance report.

use std::borrow::Cow;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::calendar::RawEvent;
use crate::classify::Classifier;
use crate::timeline::{Stay, Timeline};
use crate::window::{ZoneStatus, zone_status};
use crate::zone::ZoneRegistry;

/// Analysis errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// No event could be classified into a zone.
    #[error("no events found")]
    NoEvents,
}

/// Per-zone compliance figures and the itinerary they were computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceReport {
    pub as_of: NaiveDate,
    pub zones: Vec<ZoneStatus>,
    pub itinerary: Vec<Stay>,
}

/// Classifies `events`, builds the timeline and evaluates every zone.
///
/// `as_of` defaults to the last day of the timeline.
pub fn analyze(
    events: &[RawEvent],
    registry: &ZoneRegistry,
    as_of: Option<NaiveDate>,
) -> Result<ComplianceReport, AnalysisError> {
    let intervals = Classifier::new(registry).classify_all(events);
    let timeline = Timeline::build(&intervals).ok_or(AnalysisError::NoEvents)?;
    Ok(compliance_report(&timeline, registry, as_of))
}

/// Evaluates every configured zone against an existing timeline.
///
/// A reference date past the end of the timeline extends it with the last
/// known location first.
pub fn compliance_report(
    timeline: &Timeline,
    registry: &ZoneRegistry,
    as_of: Option<NaiveDate>,
) -> ComplianceReport {
    let reference = as_of.unwrap_or_else(|| timeline.end());
    let timeline = if reference > timeline.end() {
        Cow::Owned(timeline.extended_to(reference))
    } else {
        Cow::Borrowed(timeline)
    };

    let zones = registry
        .zones()
        .par_iter()
        .map(|zone| zone_status(&timeline, zone, reference))
        .collect();

    ComplianceReport {
        as_of: reference,
        zones,
        itinerary: timeline.stays(),
    }
}
