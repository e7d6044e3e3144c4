//! Interactive filter session.
//!
//! Keeps one [`FilterSelection`] for the lifetime of the session and lets
//! the user adjust it field by field, inspect the results, reset it, or
//! reload the activity table.

use dialoguer::Select;
use engagement_map_activity_models::ActivityField;
use engagement_map_cli_utils::{select_many, select_single};
use engagement_map_dashboard::Dashboard;
use engagement_map_filter_models::{FilterSelection, SingleSelect};

use crate::output;

/// Menu entries of the interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Edit(ActivityField),
    ShowActivities,
    ShowRegions,
    Reset,
    Reload,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Edit(ActivityField::FacultyPartners),
        Self::Edit(ActivityField::FocusAreas),
        Self::Edit(ActivityField::ActivityName),
        Self::Edit(ActivityField::CampusPartners),
        Self::Edit(ActivityField::County),
        Self::Edit(ActivityField::Municipality),
        Self::ShowActivities,
        Self::ShowRegions,
        Self::Reset,
        Self::Reload,
        Self::Quit,
    ];

    fn label(self, selection: &FilterSelection) -> String {
        match self {
            Self::Edit(ActivityField::FocusAreas) => {
                let current = if selection.focus_areas.is_empty() {
                    "any".to_string()
                } else {
                    selection
                        .focus_areas
                        .iter()
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(" + ")
                };
                format!("Focus Areas: {current}")
            }
            Self::Edit(field) => {
                let current = single_slot(selection, field).map_or_else(String::new, ToString::to_string);
                format!("{}: {current}", field.label())
            }
            Self::ShowActivities => "Show matching activities".to_string(),
            Self::ShowRegions => "Show region counts".to_string(),
            Self::Reset => "Reset filters".to_string(),
            Self::Reload => "Reload activity data".to_string(),
            Self::Quit => "Quit".to_string(),
        }
    }
}

/// The single-select slot backing `field`. Focus areas are a set and have
/// no single-select slot.
const fn single_slot(selection: &FilterSelection, field: ActivityField) -> Option<&SingleSelect> {
    match field {
        ActivityField::FacultyPartners => Some(&selection.faculty),
        ActivityField::ActivityName => Some(&selection.activity),
        ActivityField::CampusPartners => Some(&selection.campus),
        ActivityField::County => Some(&selection.county),
        ActivityField::Municipality => Some(&selection.municipality),
        ActivityField::FocusAreas => None,
    }
}

const fn single_slot_mut(
    selection: &mut FilterSelection,
    field: ActivityField,
) -> Option<&mut SingleSelect> {
    match field {
        ActivityField::FacultyPartners => Some(&mut selection.faculty),
        ActivityField::ActivityName => Some(&mut selection.activity),
        ActivityField::CampusPartners => Some(&mut selection.campus),
        ActivityField::County => Some(&mut selection.county),
        ActivityField::Municipality => Some(&mut selection.municipality),
        ActivityField::FocusAreas => None,
    }
}

/// Runs the session until the user quits.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails.
pub fn run(dashboard: &Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    println!("Engagement Map");
    println!();

    let mut selection = FilterSelection::default();

    loop {
        let evaluation = dashboard.evaluate(&selection);
        println!(
            "\n{} matching activities, {} on the map (data v{})",
            evaluation.listed.len(),
            evaluation.placed.len(),
            evaluation.version
        );

        let labels: Vec<String> = Action::ALL.iter().map(|a| a.label(&selection)).collect();
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Edit(field) => edit_field(dashboard, &mut selection, field)?,
            Action::ShowActivities => output::print_activities(&evaluation),
            Action::ShowRegions => output::print_regions(&evaluation),
            Action::Reset => selection.reset(),
            Action::Reload => match dashboard.reload_data() {
                Ok(dataset) => println!(
                    "Reloaded {} activities (data v{})",
                    dataset.len(),
                    dataset.version()
                ),
                Err(e) => log::error!("Reload failed, keeping current data: {e}"),
            },
            Action::Quit => return Ok(()),
        }
    }
}

fn edit_field(
    dashboard: &Dashboard,
    selection: &mut FilterSelection,
    field: ActivityField,
) -> Result<(), dialoguer::Error> {
    let dataset = dashboard.snapshot();
    let options = dataset.options().get(field);

    if let Some(slot) = single_slot_mut(selection, field) {
        *slot = select_single(field.label(), options, slot)?;
    } else {
        selection.focus_areas = select_many(field.label(), options, &selection.focus_areas)?;
    }

    Ok(())
}
