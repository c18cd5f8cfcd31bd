use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Initial map placement handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// (lat, lon)
    pub center: (f64, f64),
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: (38.0, -96.5),
            zoom: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineCfg {
    pub sample_cap: usize,
    pub gender_options: usize,
    pub death_cause_options: usize,
    pub armed_options: usize,
    pub officer_race_vocabulary: Vec<String>,
    /// Fixed seed for session RNGs. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub viewport: Viewport,
}

impl Default for EngineCfg {
    fn default() -> Self {
        Self {
            sample_cap: 70,
            gender_options: 4,
            death_cause_options: 6,
            armed_options: 10,
            officer_race_vocabulary: ["White", "Hispanic", "Black", "Asian"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            seed: None,
            viewport: Viewport::default(),
        }
    }
}

impl EngineCfg {
    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: EngineCfg = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_cap == 0 {
            return Err(ConfigError::Invalid("sample_cap must be at least 1".into()));
        }
        let (lat, lon) = self.viewport.center;
        if !lat.is_finite() || !lon.is_finite() {
            return Err(ConfigError::Invalid("viewport center must be finite".into()));
        }
        Ok(())
    }
}
