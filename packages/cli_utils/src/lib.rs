#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the engagement map binaries.
//!
//! [`init_logger`] sets up `pretty_env_logger` from `RUST_LOG`, and the
//! prompt helpers turn option lists into `dialoguer` dropdowns that
//! produce [`SingleSelect`] and focus-area selections.

use std::collections::BTreeSet;

use dialoguer::{MultiSelect, Select};
use engagement_map_filter_models::{ALL_LABEL, SingleSelect};

/// Initializes the global logger from `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger() {
    let mut builder = pretty_env_logger::formatted_builder();

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }

    builder.try_init().ok(); // Ignore error if logger was already set (e.g., in tests)
}

/// Dropdown entries for a single-select field: the `All` sentinel first,
/// then every option in order.
#[must_use]
pub fn single_choices(options: &[String]) -> Vec<&str> {
    std::iter::once(ALL_LABEL)
        .chain(options.iter().map(String::as_str))
        .collect()
}

/// Position of `current` in [`single_choices`] output.
#[must_use]
pub fn single_choice_index(options: &[String], current: &SingleSelect) -> usize {
    current
        .value()
        .and_then(|v| options.iter().position(|o| o == v))
        .map_or(0, |i| i + 1)
}

/// Prompts for one value of a single-select field.
///
/// # Errors
///
/// Returns a [`dialoguer::Error`] if the terminal prompt fails.
pub fn select_single(
    prompt: &str,
    options: &[String],
    current: &SingleSelect,
) -> Result<SingleSelect, dialoguer::Error> {
    let choices = single_choices(options);

    let idx = Select::new()
        .with_prompt(prompt)
        .items(&choices)
        .default(single_choice_index(options, current))
        .max_length(20)
        .interact()?;

    Ok(SingleSelect::from_choice(choices[idx]))
}

/// Prompts for any number of values, pre-checking those in `current`.
///
/// # Errors
///
/// Returns a [`dialoguer::Error`] if the terminal prompt fails.
pub fn select_many(
    prompt: &str,
    options: &[String],
    current: &BTreeSet<String>,
) -> Result<BTreeSet<String>, dialoguer::Error> {
    let defaults: Vec<bool> = options.iter().map(|o| current.contains(o)).collect();

    let selected = MultiSelect::new()
        .with_prompt(format!("{prompt} (space=toggle, enter=confirm)"))
        .items(options)
        .defaults(&defaults)
        .max_length(20)
        .interact()?;

    Ok(selected.into_iter().map(|i| options[i].clone()).collect())
}
