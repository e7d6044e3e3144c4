//! Plain-text rendering of evaluations for the terminal.

use std::fmt::Write as _;

use engagement_map_activity_models::{ActivityField, ActivityRecord};
use engagement_map_dashboard::{Dashboard, Evaluation};
use engagement_map_geofence_models::RegionAggregate;

/// Longest value shown in a table column before truncation.
const MAX_COLUMN: usize = 40;

fn truncate(value: &str) -> String {
    if value.chars().count() > MAX_COLUMN {
        let head: String = value.chars().take(MAX_COLUMN - 3).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}

/// One listing line: name, faculty, focus areas, and the region.
#[must_use]
pub fn format_activity(record: &ActivityRecord, region: Option<&str>) -> String {
    format!(
        "{:<42} {:<42} {:<42} {}",
        truncate(record.name.as_deref().unwrap_or("(unnamed)")),
        truncate(&record.faculty_partners.join(", ")),
        truncate(&record.focus_areas.join(", ")),
        region.unwrap_or(if record.location.is_some() {
            "-"
        } else {
            "(no location)"
        }),
    )
}

/// Region table with counts and percentages, every region included.
#[must_use]
pub fn format_regions(aggregate: &RegionAggregate) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{:<32} {:>8} {:>8}", "REGION", "COUNT", "SHARE");
    let _ = writeln!(out, "{}", "-".repeat(50));

    for region in &aggregate.regions {
        let _ = writeln!(
            out,
            "{:<32} {:>8} {:>7.1}%",
            region.name, region.count, region.percentage
        );
    }

    let _ = writeln!(out, "{}", "-".repeat(50));
    let _ = writeln!(out, "{:<32} {:>8}", "Total in regions", aggregate.total);
    if aggregate.unassigned > 0 {
        let _ = writeln!(out, "{:<32} {:>8}", "Outside every region", aggregate.unassigned);
    }

    out
}

pub fn print_activities(evaluation: &Evaluation) {
    println!(
        "{:<42} {:<42} {:<42} REGION",
        "ACTIVITY", "FACULTY", "FOCUS AREAS"
    );
    println!("{}", "-".repeat(140));

    for listed in &evaluation.listed {
        println!("{}", format_activity(&listed.record, listed.region.as_deref()));
    }

    println!(
        "\n{} activit{} ({} on the map)",
        evaluation.listed.len(),
        if evaluation.listed.len() == 1 { "y" } else { "ies" },
        evaluation.placed.len()
    );
}

pub fn print_regions(evaluation: &Evaluation) {
    print!("{}", format_regions(&evaluation.aggregate));
}

pub fn print_options(dashboard: &Dashboard, field: Option<ActivityField>) {
    let dataset = dashboard.snapshot();
    let options = dataset.options();

    let fields: Vec<ActivityField> =
        field.map_or_else(|| ActivityField::ALL.to_vec(), |f| vec![f]);

    for field in fields {
        let values = options.get(field);
        println!("{} ({}):", field.label(), values.len());
        for value in values {
            println!("  {value}");
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use engagement_map_activity_models::Location;
    use engagement_map_geofence_models::RegionCount;

    use super::*;

    #[test]
    fn region_table_lists_zero_regions_and_unassigned() {
        let aggregate = RegionAggregate {
            regions: vec![
                RegionCount {
                    name: "Middlesex".to_string(),
                    count: 3,
                    percentage: 100.0,
                },
                RegionCount {
                    name: "Somerset".to_string(),
                    count: 0,
                    percentage: 0.0,
                },
            ],
            total: 3,
            unassigned: 2,
        };
        let table = format_regions(&aggregate);

        assert!(table.contains("Middlesex"));
        assert!(table.contains("100.0%"));
        assert!(table.contains("Somerset"));
        assert!(table.contains("Outside every region"));
    }

    #[test]
    fn activity_line_marks_unlocated_records() {
        let record = ActivityRecord {
            name: Some("Tutoring".to_string()),
            ..ActivityRecord::default()
        };
        assert!(format_activity(&record, None).ends_with("(no location)"));

        let located = ActivityRecord {
            location: Location::new(40.5, -74.4),
            ..record
        };
        assert!(format_activity(&located, Some("Middlesex")).ends_with("Middlesex"));
        assert!(format_activity(&located, None).ends_with('-'));
    }

    #[test]
    fn long_values_are_truncated() {
        let long = "x".repeat(100);
        assert_eq!(truncate(&long).chars().count(), MAX_COLUMN);
        assert_eq!(truncate("short"), "short");
    }
}
