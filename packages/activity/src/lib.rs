#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Activity table loading, normalization, jitter, and option lists.
//!
//! Raw spreadsheet rows go through [`normalize::Normalizer`] once, get a
//! cached marker offset from [`jitter`], and are collected into an
//! immutable [`dataset::Dataset`] together with the option lists the filter
//! UI is populated from. Reloads build a fresh dataset and swap it into a
//! [`dataset::DatasetStore`] atomically.

pub mod dataset;
pub mod jitter;
pub mod normalize;
pub mod options;
pub mod table;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the activity table.
///
/// Individual malformed rows never produce an error; they degrade to
/// absent fields during normalization.
#[derive(Debug, Error)]
pub enum ActivityError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The table file extension is not a supported format.
    #[error("Unsupported table format for {}", path.display())]
    UnsupportedFormat {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The table was readable but structurally unusable.
    #[error("Table error: {message}")]
    Table {
        /// Description of what went wrong.
        message: String,
    },
}
