//! Scope configuration
//!
//! Configuration is stored as YAML in the user's config directory.
//! Default location: ~/.config/ripple/config.yaml
//!
//! Only startup options live here. Nothing the settings overlay edits is
//! ever written back; a fresh launch always starts from this file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ripple_core::curve;
use ripple_core::ResolutionCurve;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Lower bound of the resolution multiplier range
    pub resolution_min: f32,
    /// Upper bound of the resolution multiplier range
    pub resolution_max: f32,
    /// Step-size parameter of the resolution curve
    pub resolution_step: f32,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            resolution_min: curve::DEFAULT_MIN,
            resolution_max: curve::DEFAULT_MAX,
            resolution_step: curve::DEFAULT_STEP,
        }
    }
}

impl ScopeConfig {
    /// Build the resolution curve these bounds describe.
    pub fn resolution_curve(&self) -> ResolutionCurve {
        ResolutionCurve::new(
            self.resolution_min,
            self.resolution_max,
            self.resolution_step,
        )
    }
}

/// Get the default config file path
///
/// Returns: ~/.config/ripple/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ripple")
        .join("config.yaml")
}

/// Load configuration from a YAML file
///
/// A missing file yields defaults silently; an unreadable or unparsable
/// file logs a warning and yields defaults.
pub fn load_config(path: &Path) -> ScopeConfig {
    if !path.exists() {
        log::info!("load_config: {:?} not found, using defaults", path);
        return ScopeConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<ScopeConfig>(&contents) {
            Ok(config) => {
                log::info!(
                    "load_config: resolution range [{}, {}], step {}",
                    config.resolution_min,
                    config.resolution_max,
                    config.resolution_step
                );
                config
            }
            Err(e) => {
                log::warn!("load_config: failed to parse {:?}: {}, using defaults", path, e);
                ScopeConfig::default()
            }
        },
        Err(e) => {
            log::warn!("load_config: failed to read {:?}: {}, using defaults", path, e);
            ScopeConfig::default()
        }
    }
}
