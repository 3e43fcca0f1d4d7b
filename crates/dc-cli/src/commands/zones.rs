//! Zones command for showing the effective zone configuration.

use std::io::Write;

use anyhow::Result;
use dc_core::ZoneRegistry;

use super::report::format_days;

pub fn run<W: Write>(writer: &mut W, registry: &ZoneRegistry) -> Result<()> {
    for zone in registry.zones() {
        let rule = if zone.resets_after_departure {
            "resets after departure"
        } else {
            "rolling"
        };
        writeln!(
            writer,
            "{}: {} in any {}-day window ({rule})",
            zone.name,
            format_days(zone.limit),
            zone.window
        )?;
        if !zone.keywords.is_empty() {
            writeln!(writer, "  keywords: {}", zone.keywords.join(", "))?;
        }
    }
    Ok(())
}
