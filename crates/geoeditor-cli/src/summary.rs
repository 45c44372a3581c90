use std::path::Path;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};

use geoeditor_export::ConfigRecord;
use geoeditor_model::{AttributeProfile, Dataset, ProjectKind, WeightBand};
use geoeditor_store::ProjectStore;

fn base_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table
}

pub fn print_field_table(dataset: &Dataset) {
    let mut table = base_table();
    table.set_header(["field", "type", "distinct values", "weight"]);
    for (name, entry) in &dataset.field_model.fields {
        let distinct = entry
            .attributes
            .as_ref()
            .map_or(String::from("-"), |profile| {
                profile.unique_values.len().to_string()
            });
        table.add_row([
            Cell::new(name),
            Cell::new(entry.field_type.as_str()),
            Cell::new(distinct),
            Cell::new(format!("{:.3}", entry.weight)),
        ]);
    }
    println!("{} features", dataset.raw_features.len());
    println!("{table}");
}

pub fn print_profile_table(field: &str, profile: &AttributeProfile) {
    let mut table = base_table();
    table.set_header(["value", "count", "weight %"]);
    for value in &profile.unique_values {
        table.add_row([
            Cell::new(value),
            Cell::new(profile.value_counts.get(value).copied().unwrap_or(0)),
            Cell::new(format!("{:.2}", profile.weights.get(value).unwrap_or(0.0))),
        ]);
    }
    println!("attribute profile for {field}");
    println!("{table}");
}

pub fn print_projects_table(store: &ProjectStore) {
    let mut table = base_table();
    table.set_header(["id", "kind", "name"]);
    for kind in [
        ProjectKind::Dataset,
        ProjectKind::Category,
        ProjectKind::FeatureLayer,
    ] {
        for project in store.list(kind) {
            table.add_row([
                Cell::new(project.id().as_str()),
                Cell::new(kind.as_str()),
                Cell::new(project.name()),
            ]);
        }
    }
    println!("{table}");
}

pub fn print_export_summary(record: &ConfigRecord, output: &Path) {
    println!(
        "wrote v{} configuration for {} -> {}",
        record.version, record.dataset_name, output.display()
    );
    println!(
        "{} features, {} selected fields",
        record.statistics.total_features,
        record.selected_fields.len()
    );
    if !record.missing_parts.is_empty() {
        println!("missing parts: {}", record.missing_parts.join(", "));
    }
    if let Some(report) = &record.weight_report {
        for check in &report.checks {
            let flag = match check.band {
                WeightBand::Green => "ok",
                WeightBand::Red => "CHECK",
            };
            println!(
                "  weights {:<24} total {:>8.2} / {:<6} [{}]",
                check.scope, check.total, check.nominal, flag
            );
        }
    }
}
