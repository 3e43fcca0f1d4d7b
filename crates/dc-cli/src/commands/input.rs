//! Locating and reading the calendar export.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dc_core::{RawEvent, parse_calendar};

/// Calendar export file extension.
const CALENDAR_EXTENSION: &str = "ics";

/// Finds the first calendar export (by file name) in `dir`.
pub fn locate_calendar(dir: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(CALENDAR_EXTENSION))
        })
        .collect();
    candidates.sort();

    candidates.into_iter().next().with_context(|| {
        format!(
            "no .{CALENDAR_EXTENSION} calendar export found in {}",
            dir.display()
        )
    })
}

/// Reads events from `file`, or from the calendar found in the current directory.
pub fn read_events(file: Option<&Path>) -> Result<Vec<RawEvent>> {
    let path = match file {
        Some(path) => path.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().context("failed to get current directory")?;
            locate_calendar(&cwd)?
        }
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let events =
        parse_calendar(&text).with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), events = events.len(), "read calendar");
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_first_calendar_by_name() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("notes.txt"), "").unwrap();
        std::fs::write(temp.path().join("b.ics"), "").unwrap();
        std::fs::write(temp.path().join("a.ICS"), "").unwrap();
        std::fs::create_dir(temp.path().join("dir.ics")).unwrap();

        let found = locate_calendar(temp.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "a.ICS");
    }

    #[test]
    fn missing_calendar_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("notes.txt"), "").unwrap();

        let err = locate_calendar(temp.path()).unwrap_err();
        assert!(err.to_string().starts_with("no .ics calendar export found in"));
    }

    #[test]
    fn reads_explicit_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("travel.ics");
        std::fs::write(
            &path,
            "BEGIN:VCALENDAR\nBEGIN:VEVENT\nSUMMARY:OSLO\nDTSTART;VALUE=DATE:20240101\nEND:VEVENT\nEND:VCALENDAR\n",
        )
        .unwrap();

        let events = read_events(Some(&path)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "OSLO");

        assert!(read_events(Some(&temp.path().join("missing.ics"))).is_err());
    }

    #[test]
    fn rejects_document_that_is_not_a_calendar() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("notes.ics");
        std::fs::write(&path, "BEGIN:VEVENT\nSUMMARY:OSLO\nEND:VEVENT\n").unwrap();

        let err = read_events(Some(&path)).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse"), "{err}");
    }
}
