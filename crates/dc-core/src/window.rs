//! Rolling-window day accounting.
//!
//! All queries are pure reads over a [`Timeline`]. Days outside the timeline
//! count as not being in any zone.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::timeline::Timeline;
use crate::zone::{Location, ZoneConfig};

/// A run of consecutive days in one location ending on the reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub location: Location,
    pub start: NaiveDate,
    /// Inclusive; the reference date.
    pub end: NaiveDate,
    pub days: u32,
}

/// What happens if the traveler stays in their current zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExitProjection {
    /// The limit is already exceeded on the reference date.
    Overstayed { days_over: u32 },
    /// First date on which the window count would exceed the limit.
    ExceedsOn { date: NaiveDate },
}

/// Compliance figures for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneStatus {
    pub zone: String,
    pub limit: u32,
    pub window: u32,
    pub days_used: u32,
    pub days_remaining: u32,
    /// Present when the traveler is in this zone on the reference date.
    pub streak: Option<Streak>,
    pub exit: Option<ExitProjection>,
    /// When usage is at the limit and the traveler is elsewhere, the first
    /// date they may enter again.
    pub eligible_from: Option<NaiveDate>,
}

/// Days in `[reference - window + 1, reference]` spent in `zone`.
pub fn days_in_window(timeline: &Timeline, zone: &str, window: u32, reference: NaiveDate) -> u32 {
    let Some(from) = window_start(reference, window) else {
        return 0;
    };
    let count = timeline
        .slice(from, reference)
        .iter()
        .filter(|l| l.is_zone(zone))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// The streak of identical days ending on `reference`.
pub fn current_streak(timeline: &Timeline, reference: NaiveDate) -> Option<Streak> {
    let location = timeline.get(reference)?;
    let mut start = reference;
    let mut days = 1;
    while let Some(previous) = start.pred_opt() {
        if timeline.get(previous) != Some(location) {
            break;
        }
        start = previous;
        days += 1;
    }
    Some(Streak {
        location: location.clone(),
        start,
        end: reference,
        days,
    })
}

/// Projects the first date on which staying in `zone` would exceed its limit.
///
/// Only defined when the traveler is in `zone` on `reference`. The current
/// streak is assumed to continue indefinitely: each projected day adds one zone
/// day to the window and drops the day that slides out of it.
pub fn projected_exit(
    timeline: &Timeline,
    zone: &ZoneConfig,
    reference: NaiveDate,
) -> Option<ExitProjection> {
    if !timeline.get(reference)?.is_zone(&zone.name) {
        return None;
    }

    let used = days_in_window(timeline, &zone.name, zone.window, reference);
    if used > zone.limit {
        return Some(ExitProjection::Overstayed {
            days_over: used - zone.limit,
        });
    }

    let in_zone = |date: NaiveDate| {
        date > reference || timeline.get(date).is_some_and(|l| l.is_zone(&zone.name))
    };

    let mut count = used;
    let mut next = reference;
    // Once the whole window is projected presence the count equals `window`,
    // which exceeds `limit`, so this always returns within `window` steps.
    for _ in 0..zone.window {
        next = next.succ_opt()?;
        if next
            .checked_sub_days(Days::new(u64::from(zone.window)))
            .is_some_and(in_zone)
        {
            count -= 1;
        }
        count += 1;
        if count > zone.limit {
            return Some(ExitProjection::ExceedsOn { date: next });
        }
    }
    None
}

/// First date the traveler may re-enter `zone` after using up its limit.
///
/// Only defined when usage has reached the limit and the traveler is not in
/// `zone` on `reference`. Zones that reset after departure reopen the day
/// after the last zone day; rolling zones reopen once enough old days have
/// left the window for at least one more day.
pub fn eligible_from(timeline: &Timeline, zone: &ZoneConfig, reference: NaiveDate) -> Option<NaiveDate> {
    if timeline.get(reference).is_some_and(|l| l.is_zone(&zone.name)) {
        return None;
    }
    let used = days_in_window(timeline, &zone.name, zone.window, reference);
    if used < zone.limit {
        return None;
    }

    if zone.resets_after_departure {
        return last_day_in(timeline, &zone.name, reference)?.succ_opt();
    }

    let mut count = used;
    let mut next = reference;
    for _ in 0..zone.window {
        next = next.succ_opt()?;
        let dropped = next.checked_sub_days(Days::new(u64::from(zone.window)))?;
        if timeline.get(dropped).is_some_and(|l| l.is_zone(&zone.name)) {
            count -= 1;
        }
        if count < zone.limit {
            return Some(next);
        }
    }
    None
}

/// Full compliance figures for one zone on `reference`.
pub fn zone_status(timeline: &Timeline, zone: &ZoneConfig, reference: NaiveDate) -> ZoneStatus {
    let days_used = days_in_window(timeline, &zone.name, zone.window, reference);
    let streak = current_streak(timeline, reference).filter(|s| s.location.is_zone(&zone.name));

    ZoneStatus {
        zone: zone.name.clone(),
        limit: zone.limit,
        window: zone.window,
        days_used,
        days_remaining: zone.limit.saturating_sub(days_used),
        exit: projected_exit(timeline, zone, reference),
        eligible_from: eligible_from(timeline, zone, reference),
        streak,
    }
}

/// First day of the window ending on `reference`, clamped to the earliest
/// representable date. `None` for an empty window.
fn window_start(reference: NaiveDate, window: u32) -> Option<NaiveDate> {
    let span = window.checked_sub(1)?;
    Some(
        reference
            .checked_sub_days(Days::new(u64::from(span)))
            .unwrap_or(NaiveDate::MIN),
    )
}

/// Most recent day on or before `reference` spent in `zone`.
fn last_day_in(timeline: &Timeline, zone: &str, reference: NaiveDate) -> Option<NaiveDate> {
    timeline
        .iter()
        .take_while(|(date, _)| *date <= reference)
        .filter(|(_, l)| l.is_zone(zone))
        .map(|(date, _)| date)
        .last()
}
