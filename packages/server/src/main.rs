#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone API server binary.
//!
//! Reads the dashboard config from `ENGAGEMENT_MAP_CONFIG` (default
//! `engagement_map.toml`), loads the activity table and region boundaries,
//! and serves the API on `BIND_ADDR`/`PORT`.

use std::sync::Arc;

use engagement_map_dashboard::config::resolve_config_path;
use engagement_map_dashboard::{Dashboard, DashboardConfig};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    engagement_map_cli_utils::init_logger();

    let path = resolve_config_path(None);
    let config = DashboardConfig::load(&path)?;
    let dashboard = Dashboard::load(config).await?;

    engagement_map_server::run_server(Arc::new(dashboard)).await?;
    Ok(())
}
