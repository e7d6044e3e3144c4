//! TOML configuration for a dashboard session.
//!
//! ```toml
//! [data]
//! path = "data/activities.csv"
//!
//! [data.columns]
//! focus_areas = "focus_cleaned"
//!
//! [jitter]
//! scale = 0.001
//! seed = 42
//!
//! [boundaries]
//! source = { type = "url", url = "https://example.org/counties.json" }
//! filter = { property = "STATE", equals = "34" }
//!
//! [policy]
//! require_inside = false
//! ```

use std::path::{Path, PathBuf};

use engagement_map_activity::jitter::JitterConfig;
use engagement_map_activity_models::ColumnMapping;
use engagement_map_geofence_models::{BoundaryLocation, BoundaryPolicyConfig, BoundarySource};
use serde::{Deserialize, Serialize};

use crate::DashboardError;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "ENGAGEMENT_MAP_CONFIG";

/// Config file used when neither `--config` nor the env var is set.
pub const DEFAULT_CONFIG_PATH: &str = "engagement_map.toml";

/// Where the activity table lives and how its columns are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV or JSON table. The format is chosen by extension.
    pub path: PathBuf,
    #[serde(default)]
    pub columns: ColumnMapping,
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub data: DataConfig,
    #[serde(default)]
    pub jitter: JitterConfig,
    pub boundaries: BoundarySource,
    #[serde(default)]
    pub policy: BoundaryPolicyConfig,
}

impl DashboardConfig {
    /// Parses a config document. Relative paths are left as written.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Toml`] if the document is malformed.
    pub fn parse(document: &str) -> Result<Self, DashboardError> {
        Ok(toml::from_str(document)?)
    }

    /// Reads a config file, resolving relative data and boundary file
    /// paths against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the file cannot be read and
    /// [`DashboardError::Toml`] if it is malformed.
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let document = std::fs::read_to_string(path).map_err(|e| DashboardError::Config {
            message: format!("failed to read {}: {e}", path.display()),
        })?;

        let mut config = Self::parse(&document)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Joins relative file paths onto `base`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        if self.data.path.is_relative() {
            self.data.path = base.join(&self.data.path);
        }

        resolve_source(&mut self.boundaries, base);
        if let Some(outline) = &mut self.policy.outline {
            resolve_source(outline, base);
        }
    }
}

fn resolve_source(source: &mut BoundarySource, base: &Path) {
    if let BoundaryLocation::File { path } = &mut source.source
        && Path::new(path).is_relative()
    {
        *path = base.join(&*path).to_string_lossy().into_owned();
    }
}

/// Picks the config path: explicit argument, then [`CONFIG_ENV_VAR`], then
/// [`DEFAULT_CONFIG_PATH`].
#[must_use]
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(
        || {
            std::env::var(CONFIG_ENV_VAR)
                .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
        },
        Path::to_path_buf,
    )
}
