#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! A dashboard session: the current activity dataset, the region
//! boundaries loaded for the session, and evaluation of filter selections
//! against both.
//!
//! Region boundaries load once. The activity table can be reloaded at any
//! time; each reload builds a complete new dataset and swaps it in, so
//! evaluations always see a single consistent version.

pub mod config;
pub mod evaluation;

use std::sync::Arc;

use engagement_map_activity::ActivityError;
use engagement_map_activity::dataset::{Dataset, DatasetStore};
use engagement_map_activity::normalize::Normalizer;
use engagement_map_activity::table::read_table;
use engagement_map_filter_models::FilterSelection;
use engagement_map_geofence::boundaries::load_regions;
use engagement_map_geofence::{Geofence, GeofenceError};
use thiserror::Error;

pub use config::DashboardConfig;
pub use evaluation::{Evaluation, ListedActivity, PlacedActivity};

/// Errors that can occur while setting up or reloading a dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Configuration could not be read or is unusable.
    #[error("Config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration TOML is malformed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Activity table could not be loaded.
    #[error("Activity error: {0}")]
    Activity(#[from] ActivityError),

    /// Region boundaries could not be loaded.
    #[error("Geofence error: {0}")]
    Geofence(#[from] GeofenceError),
}

/// A running dashboard session.
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    store: DatasetStore,
    geofence: Geofence,
}

impl Dashboard {
    /// Loads the activity table and the region boundaries named by
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if either source cannot be loaded.
    pub async fn load(config: DashboardConfig) -> Result<Self, DashboardError> {
        let dataset = load_dataset(&config, 1)?;

        let regions = load_regions(&config.boundaries).await?;
        let geofence = Geofence::from_config(regions, &config.policy).await?;

        Ok(Self::from_parts(config, dataset, geofence))
    }

    #[must_use]
    pub fn from_parts(config: DashboardConfig, dataset: Dataset, geofence: Geofence) -> Self {
        Self {
            config,
            store: DatasetStore::new(dataset),
            geofence,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub const fn geofence(&self) -> &Geofence {
        &self.geofence
    }

    /// The dataset current at the time of the call.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Dataset> {
        self.store.snapshot()
    }

    /// Re-reads the activity table and swaps the new dataset in.
    ///
    /// On failure the current dataset stays in place.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Activity`] if the table cannot be read.
    pub fn reload_data(&self) -> Result<Arc<Dataset>, DashboardError> {
        let version = self.store.next_version();
        let dataset = load_dataset(&self.config, version)?;
        self.store.replace(dataset);
        log::info!("Reloaded activity data as v{version}");
        Ok(self.store.snapshot())
    }

    /// Evaluates `selection` against the current dataset.
    #[must_use]
    pub fn evaluate(&self, selection: &FilterSelection) -> Evaluation {
        let dataset = self.store.snapshot();
        Evaluation::run(&dataset, &self.geofence, selection)
    }
}

fn load_dataset(config: &DashboardConfig, version: u64) -> Result<Dataset, DashboardError> {
    let rows = read_table(&config.data.path)?;
    let normalizer = Normalizer::new(config.data.columns.clone());
    Ok(Dataset::build(&rows, &normalizer, &config.jitter, version))
}
