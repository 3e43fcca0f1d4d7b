//! Zone configuration and the validated zone registry.
//!
//! A zone is a jurisdiction with its own day limit over a rolling window.
//! Days that cannot be attributed to any configured zone are [`Location::Outside`].

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::airports;

/// Name of the sentinel location for days not attributed to any zone.
pub const OUTSIDE: &str = "OUTSIDE";

/// Zone configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A zone was declared without a name.
    #[error("zone name cannot be empty")]
    EmptyName,

    /// A zone tried to use the reserved `OUTSIDE` name.
    #[error("zone name {0} is reserved")]
    ReservedName(String),

    /// Two zones share a name.
    #[error("duplicate zone: {0}")]
    DuplicateZone(String),

    /// The rolling window has no days.
    #[error("zone {zone}: window must be at least one day")]
    EmptyWindow { zone: String },

    /// The limit would let a continuous stay run forever.
    #[error("zone {zone}: limit {limit} must be less than window {window}")]
    LimitNotBelowWindow { zone: String, limit: u32, window: u32 },

    /// An airport code points at a zone that is not configured.
    #[error("airport {code} maps to unknown zone {zone}")]
    UnknownAirportZone { code: String, zone: String },
}

/// One residency zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Unique zone identifier (e.g. `SCHENGEN`).
    pub name: String,

    /// Case-insensitive match tokens, in priority order.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Maximum days allowed inside the window.
    pub limit: u32,

    /// Rolling window length in days.
    pub window: u32,

    /// Eligibility reopens in full the day after leaving, instead of decaying
    /// as old days fall out of the window.
    #[serde(default)]
    pub resets_after_departure: bool,
}

impl ZoneConfig {
    /// Creates a rolling-window zone.
    pub fn new(name: impl Into<String>, limit: u32, window: u32, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            limit,
            window,
            resets_after_departure: false,
        }
    }

    /// Marks the zone as resetting entirely after departure.
    #[must_use]
    pub fn resetting(mut self) -> Self {
        self.resets_after_departure = true;
        self
    }
}

/// Where the traveler is on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    /// Inside the named zone.
    Zone(String),
    /// Not attributed to any configured zone.
    Outside,
}

impl Location {
    /// Parses a zone name, mapping the reserved name to [`Location::Outside`].
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case(OUTSIDE) {
            Self::Outside
        } else {
            Self::Zone(name.to_string())
        }
    }

    /// Zone name, or `OUTSIDE`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Zone(name) => name,
            Self::Outside => OUTSIDE,
        }
    }

    /// Returns true if this is the named zone.
    pub fn is_zone(&self, name: &str) -> bool {
        matches!(self, Self::Zone(zone) if zone == name)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Validated classification inputs: zones, airport codes and title rules.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    zones: Vec<ZoneConfig>,
    airports: BTreeMap<String, Location>,
    excluded_titles: Vec<String>,
    booking_keywords: Vec<String>,
}

impl ZoneRegistry {
    /// Validates a zone list. The registry starts with no airport codes and no title rules.
    pub fn new(zones: Vec<ZoneConfig>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for zone in &zones {
            if zone.name.trim().is_empty() {
                return Err(ConfigError::EmptyName);
            }
            if zone.name.eq_ignore_ascii_case(OUTSIDE) {
                return Err(ConfigError::ReservedName(zone.name.clone()));
            }
            if !seen.insert(zone.name.as_str()) {
                return Err(ConfigError::DuplicateZone(zone.name.clone()));
            }
            if zone.window == 0 {
                return Err(ConfigError::EmptyWindow {
                    zone: zone.name.clone(),
                });
            }
            if zone.limit >= zone.window {
                return Err(ConfigError::LimitNotBelowWindow {
                    zone: zone.name.clone(),
                    limit: zone.limit,
                    window: zone.window,
                });
            }
        }

        Ok(Self {
            zones,
            airports: BTreeMap::new(),
            excluded_titles: Vec::new(),
            booking_keywords: Vec::new(),
        })
    }

    /// Adds an airport-code table. Values must name a configured zone or `OUTSIDE`.
    pub fn with_airports<I, K, V>(mut self, airports: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        for (code, zone) in airports {
            let code = code.into().to_ascii_uppercase();
            let location = Location::from_name(zone.as_ref());
            if let Location::Zone(name) = &location {
                if self.zone(name).is_none() {
                    return Err(ConfigError::UnknownAirportZone {
                        code,
                        zone: name.clone(),
                    });
                }
            }
            self.airports.insert(code, location);
        }
        Ok(self)
    }

    /// Event titles that are never classified.
    #[must_use]
    pub fn with_excluded_titles(mut self, titles: Vec<String>) -> Self {
        self.excluded_titles = titles;
        self
    }

    /// Keywords marking an event as a booking record.
    #[must_use]
    pub fn with_booking_keywords(mut self, keywords: Vec<String>) -> Self {
        self.booking_keywords = keywords;
        self
    }

    /// Zones in declaration order.
    pub fn zones(&self) -> &[ZoneConfig] {
        &self.zones
    }

    /// Looks up a zone by name.
    pub fn zone(&self, name: &str) -> Option<&ZoneConfig> {
        self.zones.iter().find(|z| z.name == name)
    }

    /// Looks up an upper-case airport code.
    pub fn airport(&self, code: &str) -> Option<&Location> {
        self.airports.get(code)
    }

    pub fn excluded_titles(&self) -> &[String] {
        &self.excluded_titles
    }

    pub fn booking_keywords(&self) -> &[String] {
        &self.booking_keywords
    }
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self {
            zones: default_zones(),
            airports: airports::default_airports()
                .into_iter()
                .map(|(code, zone)| (code, Location::from_name(&zone)))
                .collect(),
            excluded_titles: default_excluded_titles(),
            booking_keywords: default_booking_keywords(),
        }
    }
}

/// Built-in zones: Schengen and Ukraine at 90/180, UK at 183/365 resetting on departure.
pub fn default_zones() -> Vec<ZoneConfig> {
    vec![
        ZoneConfig::new(
            "SCHENGEN",
            90,
            180,
            &[
                "SCHENGEN",
                "POLAND",
                "WARSAW",
                "KRAKOW",
                "GDANSK",
                "WROCLAW",
                "GERMANY",
                "BERLIN",
                "MUNICH",
                "HAMBURG",
                "FRANCE",
                "PARIS",
                "NICE",
                "SPAIN",
                "MADRID",
                "BARCELONA",
                "ITALY",
                "ROME",
                "MILAN",
                "NETHERLANDS",
                "AMSTERDAM",
                "AUSTRIA",
                "VIENNA",
                "SWITZERLAND",
                "ZURICH",
                "GENEVA",
                "CZECHIA",
                "PRAGUE",
                "PORTUGAL",
                "LISBON",
                "BELGIUM",
                "BRUSSELS",
                "DENMARK",
                "COPENHAGEN",
                "SWEDEN",
                "STOCKHOLM",
                "NORWAY",
                "OSLO",
                "FINLAND",
                "HELSINKI",
                "ICELAND",
                "REYKJAVIK",
                "HUNGARY",
                "BUDAPEST",
                "GREECE",
                "ATHENS",
                "ESTONIA",
                "TALLINN",
                "LATVIA",
                "RIGA",
                "LITHUANIA",
                "VILNIUS",
            ],
        ),
        ZoneConfig::new(
            "UKRAINE",
            90,
            180,
            &["UKRAINE", "KYIV", "KIEV", "LVIV", "ODESA", "ODESSA", "KHARKIV"],
        ),
        ZoneConfig::new(
            "UK",
            183,
            365,
            &[
                "UK",
                "UNITED KINGDOM",
                "ENGLAND",
                "SCOTLAND",
                "WALES",
                "LONDON",
                "MANCHESTER",
                "EDINBURGH",
            ],
        )
        .resetting(),
    ]
}

/// Administrative appointments that mention a country without placing the traveler there.
pub fn default_excluded_titles() -> Vec<String> {
    [
        "Schengen visa appointment",
        "UK visa appointment",
        "Ukraine embassy appointment",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub fn default_booking_keywords() -> Vec<String> {
    ["reservation", "booking", "hotel", "airbnb", "check-in"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_is_valid() {
        let defaults = ZoneRegistry::default();
        let rebuilt = ZoneRegistry::new(default_zones())
            .and_then(|r| r.with_airports(airports::default_airports()))
            .expect("defaults should validate");

        assert_eq!(rebuilt.zones(), defaults.zones());
        assert_eq!(rebuilt.airport("WAW"), Some(&Location::Zone("SCHENGEN".into())));
        assert_eq!(rebuilt.airport("JFK"), Some(&Location::Outside));
    }

    #[test]
    fn uk_resets_after_departure() {
        let registry = ZoneRegistry::default();
        let uk = registry.zone("UK").unwrap();
        assert!(uk.resets_after_departure);
        assert_eq!((uk.limit, uk.window), (183, 365));
        assert!(!registry.zone("SCHENGEN").unwrap().resets_after_departure);
    }

    #[test]
    fn rejects_duplicate_zone() {
        let zones = vec![
            ZoneConfig::new("A", 1, 2, &[]),
            ZoneConfig::new("A", 1, 2, &[]),
        ];
        assert_eq!(
            ZoneRegistry::new(zones).unwrap_err(),
            ConfigError::DuplicateZone("A".into())
        );
    }

    #[test]
    fn rejects_limit_not_below_window() {
        let err = ZoneRegistry::new(vec![ZoneConfig::new("A", 10, 10, &[])]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "zone A: limit 10 must be less than window 10"
        );
    }

    #[test]
    fn rejects_reserved_and_empty_names() {
        assert_eq!(
            ZoneRegistry::new(vec![ZoneConfig::new("outside", 1, 2, &[])]).unwrap_err(),
            ConfigError::ReservedName("outside".into())
        );
        assert_eq!(
            ZoneRegistry::new(vec![ZoneConfig::new(" ", 1, 2, &[])]).unwrap_err(),
            ConfigError::EmptyName
        );
        assert!(matches!(
            ZoneRegistry::new(vec![ZoneConfig::new("A", 0, 0, &[])]),
            Err(ConfigError::EmptyWindow { .. })
        ));
    }

    #[test]
    fn rejects_airport_for_unknown_zone() {
        let err = ZoneRegistry::new(vec![ZoneConfig::new("A", 1, 2, &[])])
            .unwrap()
            .with_airports([("xyz", "B")])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownAirportZone {
                code: "XYZ".into(),
                zone: "B".into()
            }
        );
    }

    #[test]
    fn location_display_and_lookup() {
        assert_eq!(Location::from_name("outside"), Location::Outside);
        assert_eq!(Location::Outside.to_string(), "OUTSIDE");
        let uk = Location::from_name("UK");
        assert!(uk.is_zone("UK"));
        assert!(!uk.is_zone("UKRAINE"));
        assert_eq!(serde_json::to_string(&uk).unwrap(), "\"UK\"");
    }
}
