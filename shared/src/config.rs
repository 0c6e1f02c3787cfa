use crate::catches::{CatchId, Coordinates};
use serde::{Deserialize, Serialize};

pub const MAX_ZOOM: u8 = 19;
pub const MIN_POSITION_UPDATE_INTERVAL_MS: u32 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Client settings served by the backend from `.fishing_log.toml`.
///
/// Every field has a default, so a partial file is valid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base of the catch API, e.g. `http://localhost:8000/api`.
    pub api_url: String,
    /// Prefix for the relative image URLs stored on catches.
    pub media_base_url: String,
    pub tile_url: String,
    pub tile_attribution: String,
    pub default_zoom: u8,
    /// Zoom used when the map opens on a known position.
    pub focused_zoom: u8,
    pub position_update_interval_ms: u32,
    pub flash_dismiss_ms: u32,
    /// Map center when neither a target nor the user's position is known.
    pub default_center: Coordinates,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/api".to_string(),
            media_base_url: "http://localhost:8000".to_string(),
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            tile_attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
            default_zoom: 5,
            focused_zoom: 10,
            position_update_interval_ms: 5000,
            flash_dismiss_ms: 5000,
            default_center: Coordinates::new(56.0445, 12.5316),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Repairs out-of-range values in place and describes each repair.
    pub fn validate_and_fix(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        let defaults = Self::default();

        for (name, url) in [
            ("api_url", &mut self.api_url),
            ("media_base_url", &mut self.media_base_url),
        ] {
            let trimmed = url.trim().trim_end_matches('/').to_string();
            if trimmed != *url {
                warnings.push(format!("{name}: trailing '/' or whitespace removed"));
                *url = trimmed;
            }
        }

        if self.tile_url.trim().is_empty() {
            warnings.push("tile_url: empty, using OpenStreetMap tiles".to_string());
            self.tile_url = defaults.tile_url.clone();
        }

        if !self.default_center.is_finite() {
            warnings.push("default_center: non-finite coordinate replaced".to_string());
            self.default_center = defaults.default_center;
        }

        for (name, zoom) in [
            ("default_zoom", &mut self.default_zoom),
            ("focused_zoom", &mut self.focused_zoom),
        ] {
            if *zoom > MAX_ZOOM {
                warnings.push(format!("{name}: {zoom} clamped to {MAX_ZOOM}"));
                *zoom = MAX_ZOOM;
            }
        }

        if self.position_update_interval_ms < MIN_POSITION_UPDATE_INTERVAL_MS {
            warnings.push(format!(
                "position_update_interval_ms: {} raised to {}",
                self.position_update_interval_ms, MIN_POSITION_UPDATE_INTERVAL_MS
            ));
            self.position_update_interval_ms = MIN_POSITION_UPDATE_INTERVAL_MS;
        }

        warnings
    }

    pub fn catches_url(&self) -> String {
        format!("{}/catches", self.api_url)
    }

    pub fn catch_url(&self, catch_id: CatchId) -> String {
        format!("{}/catches/{}", self.api_url, catch_id)
    }

    /// Resolves a catch's relative image path against the media service.
    pub fn image_url(&self, relative: &str) -> String {
        if relative.starts_with("http://") || relative.starts_with("https://") {
            return relative.to_string();
        }
        format!(
            "{}/{}",
            self.media_base_url.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }
}
