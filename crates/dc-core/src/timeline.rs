//! Dense day-by-day timeline built from classified intervals.
//!
//! The traveler's location changes only on days where an interval begins.
//! Between intervals the last known location persists: gaps in the calendar
//! are treated as continued presence, not as travel.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::classify::Interval;
use crate::zone::Location;

/// Location for every day from the first interval start to the last interval end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    start: NaiveDate,
    days: Vec<Location>,
}

/// A maximal run of consecutive days in one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stay {
    pub start: NaiveDate,
    /// Inclusive.
    pub end: NaiveDate,
    pub location: Location,
    pub days: u32,
}

impl Timeline {
    /// Builds a timeline, or `None` if there are no non-empty intervals.
    ///
    /// Intervals are ordered by start date (stably); among intervals starting
    /// on the same day the last one wins.
    pub fn build(intervals: &[Interval]) -> Option<Self> {
        let mut ordered: Vec<&Interval> = intervals.iter().filter(|i| i.start < i.end).collect();
        ordered.sort_by_key(|i| i.start);

        let start = ordered.first()?.start;
        let last = ordered.iter().map(|i| i.end).max()?.pred_opt()?;

        let mut pending = ordered.into_iter().peekable();
        let mut current = Location::Outside;
        let days: Vec<Location> = start
            .iter_days()
            .take_while(|date| *date <= last)
            .map(|date| {
                while let Some(interval) = pending.next_if(|i| i.start == date) {
                    current = interval.location.clone();
                }
                current.clone()
            })
            .collect();

        tracing::debug!(%start, end = %last, days = days.len(), "built timeline");
        Some(Self { start, days })
    }

    /// First day.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day (inclusive).
    pub fn end(&self) -> NaiveDate {
        self.date_at(self.days.len() - 1)
    }

    /// Number of days covered.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Always false: a built timeline covers at least one day.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Location on `date`, if covered.
    pub fn get(&self, date: NaiveDate) -> Option<&Location> {
        self.index_of(date).and_then(|i| self.days.get(i))
    }

    /// Days in order with their locations.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &Location)> + '_ {
        self.start.iter_days().zip(self.days.iter())
    }

    /// Locations for the covered part of `[from, to]`.
    pub fn slice(&self, from: NaiveDate, to: NaiveDate) -> &[Location] {
        let from = from.max(self.start);
        let to = to.min(self.end());
        match (self.index_of(from), self.index_of(to)) {
            (Some(a), Some(b)) if a <= b => &self.days[a..=b],
            _ => &[],
        }
    }

    /// Extends the timeline through `date`, carrying the last location forward.
    #[must_use]
    pub fn extended_to(&self, date: NaiveDate) -> Self {
        let mut days = self.days.clone();
        if let Some(last) = self.days.last() {
            let extra = (date - self.end()).num_days();
            for _ in 0..extra.max(0) {
                days.push(last.clone());
            }
        }
        Self {
            start: self.start,
            days,
        }
    }

    /// Contiguous stays in chronological order.
    pub fn stays(&self) -> Vec<Stay> {
        let mut stays: Vec<Stay> = Vec::new();
        for (date, location) in self.iter() {
            match stays.last_mut() {
                Some(stay) if stay.location == *location => {
                    stay.end = date;
                    stay.days += 1;
                }
                _ => stays.push(Stay {
                    start: date,
                    end: date,
                    location: location.clone(),
                    days: 1,
                }),
            }
        }
        stays
    }

    fn index_of(&self, date: NaiveDate) -> Option<usize> {
        usize::try_from((date - self.start).num_days())
            .ok()
            .filter(|&i| i < self.days.len())
    }

    fn date_at(&self, index: usize) -> NaiveDate {
        self.start + Days::new(index as u64)
    }
}
