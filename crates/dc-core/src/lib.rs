//! Core logic for the residency day calculator.
//!
//! This crate contains:
//! - Calendar decoding: extracting event records from an iCalendar export
//! - Classification: mapping event text to a configured zone and day range
//! - Timeline: a dense day-to-zone map with last-known-zone persistence
//! - Window accounting: rolling-window usage, exit projection and re-entry

pub mod airports;
mod analysis;
pub mod calendar;
pub mod classify;
pub mod timeline;
pub mod window;
pub mod zone;

pub use analysis::{AnalysisError, ComplianceReport, analyze, compliance_report};
pub use calendar::{CalendarError, EventTime, RawEvent, parse_calendar};
pub use classify::{Classifier, Interval};
pub use timeline::{Stay, Timeline};
pub use window::{ExitProjection, Streak, ZoneStatus};
pub use zone::{ConfigError, Location, OUTSIDE, ZoneConfig, ZoneRegistry};
