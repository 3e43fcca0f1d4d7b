//! Report command: per-zone window usage, exit dates and the itinerary.
//!
//! This module implements `dc report` with human-readable and JSON output.

use std::fmt::Write as _;
use std::io;

use anyhow::Result;
use chrono::NaiveDate;
use dc_core::{AnalysisError, ComplianceReport, ExitProjection, RawEvent, ZoneRegistry, ZoneStatus};

/// Formats a day count with its unit.
pub fn format_days(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

/// One-line outlook for a zone.
fn format_outlook(status: &ZoneStatus) -> String {
    match (&status.exit, &status.streak, status.eligible_from) {
        (Some(ExitProjection::Overstayed { days_over }), _, _) => {
            format!("Over the limit by {}: leave now", format_days(*days_over))
        }
        (Some(ExitProjection::ExceedsOn { date }), Some(streak), _) => format!(
            "Mandatory exit: {date} (here since {}, {})",
            streak.start,
            format_days(streak.days)
        ),
        (Some(ExitProjection::ExceedsOn { date }), None, _) => format!("Mandatory exit: {date}"),
        (None, _, Some(date)) => format!("Limit reached; eligible again on {date}"),
        (None, _, None) => format!("{} remaining", format_days(status.days_remaining)),
    }
}

/// Formats the human-readable report output.
pub fn format_report(report: &ComplianceReport) -> String {
    let mut output = String::new();

    writeln!(output, "RESIDENCY REPORT: as of {}", report.as_of).unwrap();

    writeln!(output).unwrap();
    writeln!(output, "ZONES").unwrap();
    writeln!(output, "─────").unwrap();

    let width = report
        .zones
        .iter()
        .map(|z| z.zone.len())
        .max()
        .unwrap_or(0);
    for status in &report.zones {
        writeln!(
            output,
            "{:<width$}  {}/{} days in last {} days",
            status.zone, status.days_used, status.limit, status.window
        )
        .unwrap();
        writeln!(output, "  {}", format_outlook(status)).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "ITINERARY").unwrap();
    writeln!(output, "─────────").unwrap();
    for stay in &report.itinerary {
        writeln!(
            output,
            "{} → {}  {} ({})",
            stay.start,
            stay.end,
            stay.location,
            format_days(stay.days)
        )
        .unwrap();
    }

    output
}

/// Formats report data as JSON.
pub fn format_report_json(report: &ComplianceReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Runs the report command.
pub fn run<W: io::Write>(
    writer: &mut W,
    events: &[RawEvent],
    registry: &ZoneRegistry,
    as_of: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let report = match dc_core::analyze(events, registry, as_of) {
        Ok(report) => report,
        Err(AnalysisError::NoEvents) => {
            writeln!(writer, "No events found.")?;
            return Ok(());
        }
    };

    if json {
        writeln!(writer, "{}", format_report_json(&report)?)?;
    } else {
        write!(writer, "{}", format_report(&report))?;
    }

    Ok(())
}
