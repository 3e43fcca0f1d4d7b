//! Configuration loading and management.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dc_core::{ConfigError, OUTSIDE, ZoneConfig, ZoneRegistry, airports, zone};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
///
/// Defaults to the built-in zones and airport table; any field can be
/// replaced from a TOML file or `DC_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Zones in match priority order.
    pub zones: Vec<ZoneConfig>,

    /// Airport code to zone name (`OUTSIDE` allowed).
    pub airports: BTreeMap<String, String>,

    /// Event titles never classified.
    pub excluded_titles: Vec<String>,

    /// Keywords marking booking records.
    pub booking_keywords: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zones: zone::default_zones(),
            airports: airports::default_airports(),
            excluded_titles: zone::default_excluded_titles(),
            booking_keywords: zone::default_booking_keywords(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (DC_*)
        figment = figment.merge(Env::prefixed("DC_"));

        figment.extract()
    }

    /// Validates the configuration into a zone registry.
    ///
    /// Airport tables merge key by key across config layers, so codes for
    /// zones that a later layer removed are skipped instead of rejected.
    pub fn registry(&self) -> Result<ZoneRegistry, ConfigError> {
        let airports = self.airports.iter().filter(|(code, zone)| {
            let known = zone.eq_ignore_ascii_case(OUTSIDE)
                || self.zones.iter().any(|z| z.name == **zone);
            if !known {
                tracing::warn!(%code, %zone, "skipping airport for unconfigured zone");
            }
            known
        });

        Ok(ZoneRegistry::new(self.zones.clone())?
            .with_airports(airports)?
            .with_excluded_titles(self.excluded_titles.clone())
            .with_booking_keywords(self.booking_keywords.clone()))
    }
}

/// Returns the platform-specific config directory for dc.
///
/// On Linux: `~/.config/daycalc`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("daycalc"))
}
