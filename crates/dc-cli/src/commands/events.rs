//! Events command: lists how each calendar event was classified.

use std::io::Write;

use anyhow::Result;
use dc_core::{Classifier, RawEvent, ZoneRegistry};

/// Writes one line per classified event, sorted by start date.
pub fn run<W: Write>(writer: &mut W, events: &[RawEvent], registry: &ZoneRegistry) -> Result<()> {
    let classifier = Classifier::new(registry);
    let mut classified: Vec<_> = events
        .iter()
        .filter_map(|event| classifier.classify(event).map(|interval| (interval, event)))
        .collect();
    classified.sort_by_key(|(interval, _)| interval.start);

    if classified.is_empty() {
        writeln!(writer, "No events found.")?;
        return Ok(());
    }

    for (interval, event) in classified {
        writeln!(
            writer,
            "{}  {:>3}d  {:<8}  {}",
            interval.start,
            interval.days(),
            interval.location,
            event.summary
        )?;
    }

    Ok(())
}
