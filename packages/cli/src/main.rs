#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the engagement map dashboard.
//!
//! ```text
//! engagement_map options [--field faculty_partners]
//! engagement_map filter [--faculty NAME] [--focus AREA]... [--geojson]
//! engagement_map regions [--county NAME] ...
//! engagement_map serve [--interactive]
//! engagement_map interactive
//! ```
//!
//! Running with no subcommand enters interactive mode. The config file is
//! taken from `--config`, then `ENGAGEMENT_MAP_CONFIG`, then
//! `engagement_map.toml`.

mod interactive;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use engagement_map_activity_models::ActivityField;
use engagement_map_dashboard::config::resolve_config_path;
use engagement_map_dashboard::{Dashboard, DashboardConfig, DashboardError};
use engagement_map_filter_models::{FilterSelection, SingleSelect};

#[derive(Parser)]
#[command(
    name = "engagement_map",
    about = "Filter, geofence, and serve community engagement activities"
)]
struct Cli {
    /// Path to the dashboard TOML config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dropdown choices derived from the activity table
    Options {
        /// Only print this field (e.g. `faculty_partners`, `focus_areas`)
        #[arg(long)]
        field: Option<ActivityField>,
    },
    /// List activities matching a filter
    Filter {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print the marker layer as `GeoJSON` instead of a table
        #[arg(long)]
        geojson: bool,
    },
    /// Print per-region counts for a filter
    Regions {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Start the API server
    Serve {
        /// Prompt for bind address and port
        #[arg(long)]
        interactive: bool,
    },
    /// Adjust filters interactively
    Interactive,
}

/// Filter flags shared by `filter` and `regions`. `All` or an omitted
/// flag means no restriction.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Faculty partner
    #[arg(long)]
    faculty: Option<String>,
    /// Activity name
    #[arg(long)]
    activity: Option<String>,
    /// Campus partner
    #[arg(long)]
    campus: Option<String>,
    /// County
    #[arg(long)]
    county: Option<String>,
    /// Municipality
    #[arg(long)]
    municipality: Option<String>,
    /// Required focus area (repeat for several; all must match)
    #[arg(long = "focus")]
    focus_areas: Vec<String>,
}

impl FilterArgs {
    fn to_selection(&self) -> FilterSelection {
        let single =
            |value: Option<&str>| value.map_or(SingleSelect::All, SingleSelect::from_choice);

        FilterSelection {
            faculty: single(self.faculty.as_deref()),
            activity: single(self.activity.as_deref()),
            campus: single(self.campus.as_deref()),
            county: single(self.county.as_deref()),
            municipality: single(self.municipality.as_deref()),
            focus_areas: self.focus_areas.iter().cloned().collect(),
        }
    }
}

async fn load_dashboard(config: Option<PathBuf>) -> Result<Dashboard, DashboardError> {
    let path = resolve_config_path(config.as_deref());
    let config = DashboardConfig::load(&path)?;
    Dashboard::load(config).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    engagement_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let dashboard = load_dashboard(cli.config).await?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Options { field } => output::print_options(&dashboard, field),
        Commands::Filter { filter, geojson } => {
            let evaluation = dashboard.evaluate(&filter.to_selection());
            if geojson {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&evaluation.to_feature_collection())?
                );
            } else {
                output::print_activities(&evaluation);
            }
        }
        Commands::Regions { filter, json } => {
            let evaluation = dashboard.evaluate(&filter.to_selection());
            if json {
                println!("{}", serde_json::to_string_pretty(&evaluation.aggregate)?);
            } else {
                output::print_regions(&evaluation);
            }
        }
        Commands::Serve { interactive } => {
            let dashboard = Arc::new(dashboard);
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(async move {
                    if interactive {
                        engagement_map_server::interactive::run(dashboard).await
                    } else {
                        engagement_map_server::run_server(dashboard).await
                    }
                })
            })
            .await??;
        }
        Commands::Interactive => interactive::run(&dashboard)?,
    }

    Ok(())
}
