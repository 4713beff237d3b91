use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use super::charts::format_chart;
use crate::analysis::{Artifact, CatalogEntry, Metric, Section, TableArtifact, Warning};
use crate::dashboard::{Page, PageBody};
use crate::models::Value;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Smallest magnitude that survives rounding to four decimals.
const FIXED_POINT_MIN: f64 = 5e-5;

/// Cell text: floats to at most four decimals, nulls as `NaN`.
///
/// Non-zero floats too small for four decimals use scientific notation.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NaN".to_string(),
        Value::Float(v) if *v != 0.0 && v.abs() < FIXED_POINT_MIN => {
            let s = format!("{v:.3e}");
            match s.split_once('e') {
                Some((mantissa, exp)) => {
                    let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
                    format!("{mantissa}e{exp}")
                }
                None => s,
            }
        }
        Value::Float(v) => {
            let s = format!("{v:.4}");
            let trimmed = s.trim_end_matches('0');
            if trimmed.ends_with('.') {
                format!("{trimmed}0")
            } else {
                trimmed.to_string()
            }
        }
        other => other.to_string(),
    }
}

/// Format a table artifact with box-drawing characters.
pub fn format_table_artifact(artifact: &TableArtifact) -> String {
    let mut output = String::new();
    if let Some(caption) = &artifact.caption {
        output.push_str(&format!("{caption}\n"));
    }

    let mut table = new_table();
    table.set_header(artifact.columns.clone());
    for row in &artifact.rows {
        table.add_row(row.iter().map(|v| Cell::new(format_value(v))));
    }

    output.push_str(&format!("{table}\n"));
    output
}

pub fn format_metric(metric: &Metric) -> String {
    format!("  {}: {}\n", metric.label, metric.display.bold())
}

pub fn format_warning(warning: &Warning) -> String {
    format!("  {} {}\n", "Warning:".yellow().bold(), warning.message.yellow())
}

/// Format one section: heading, then each artifact in order.
pub fn format_section(section: &Section) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", section.heading.bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    for artifact in &section.artifacts {
        match artifact {
            Artifact::Table(t) => output.push_str(&format_table_artifact(t)),
            Artifact::Metric(m) => output.push_str(&format_metric(m)),
            Artifact::Chart(c) => output.push_str(&format_chart(c)),
            Artifact::Warning(w) => output.push_str(&format_warning(w)),
        }
    }

    output
}

/// Format a whole page: title, load error, preview and sections.
pub fn format_page(page: &Page) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", page.title.bold().cyan()));

    if let Some(error) = &page.error {
        output.push_str(&format!("{} {}\n", "Error:".red().bold(), error.red()));
    }

    match &page.body {
        PageBody::Prompt { message } => {
            output.push_str(&format!("{}\n", message.dimmed()));
        }
        PageBody::Loaded {
            name,
            total_records,
            preview,
            sections,
            ..
        } => {
            output.push_str(&format!("\n{}\n", format!("Data Preview: {name}").bold().green()));
            output.push_str(&format!("Total Records: {total_records}\n"));
            output.push_str(&format_table_artifact(preview));
            for section in sections {
                output.push_str(&format_section(section));
            }
        }
    }

    output
}

/// Print a rendered page.
pub fn print_page(page: &Page) {
    print!("{}", format_page(page));
}

/// Format the analysis catalog as a table.
pub fn format_catalog(entries: &[CatalogEntry]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Analysis Options".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table();
    table.set_header(vec!["Analysis", "Required Columns"]);
    for entry in entries {
        let required = if entry.required_columns.is_empty() {
            "-".to_string()
        } else {
            entry.required_columns.join(", ")
        };
        table.add_row(vec![Cell::new(entry.name), Cell::new(required)]);
    }

    output.push_str(&format!("{table}\n"));
    output
}

/// Print the analysis catalog.
pub fn print_catalog(entries: &[CatalogEntry]) {
    print!("{}", format_catalog(entries));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{catalog, AnalysisKind};
    use crate::dashboard::{Dashboard, LoadState};
    use crate::io::read_csv_from_bytes;
    use std::sync::Arc;

    fn loaded() -> LoadState {
        let table = read_csv_from_bytes(
            b"Traffic,Area,Delivery_Time\nLow,Urban,10\nHigh,Urban,20\nLow,Metropolitian,30\n",
            "orders",
        );
        LoadState::from_result(table.map(Arc::new))
    }

    #[test]
    fn test_format_value_tiny_floats_stay_visible() {
        assert_eq!(format_value(&Value::Float(1e-5)), "1e-5");
        assert_eq!(format_value(&Value::Float(-2.5e-7)), "-2.5e-7");
        assert_eq!(format_value(&Value::Float(1.25e-6)), "1.25e-6");
        assert_eq!(format_value(&Value::Float(0.0001)), "0.0001");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Value::Float(20.0)), "20.0");
        assert_eq!(format_value(&Value::Float(2.0 / 3.0)), "0.6667");
        assert_eq!(format_value(&Value::Float(1.25)), "1.25");
        assert_eq!(format_value(&Value::Null), "NaN");
        assert_eq!(format_value(&Value::Integer(7)), "7");
        assert_eq!(format_value(&Value::Float(0.0)), "0.0");
    }

    #[test]
    fn test_format_table_artifact_contains_headers_and_caption() {
        let artifact = TableArtifact::new(
            vec!["Area".into(), "Number of Orders".into()],
            vec![vec![Value::from("Urban"), Value::Integer(2)]],
        )
        .with_caption("Orders per area:");
        let output = format_table_artifact(&artifact);
        assert!(output.contains("Orders per area:"));
        assert!(output.contains("Number of Orders"));
        assert!(output.contains("Urban"));
    }

    #[test]
    fn test_format_page_prompt() {
        let page = Dashboard::default().render(&LoadState::Empty, &[]);
        let output = format_page(&page);
        assert!(output.contains("Logistics Data Analysis Dashboard"));
        assert!(output.contains("Please upload a CSV file"));
    }

    #[test]
    fn test_format_page_error() {
        let page = Dashboard::default().render(&LoadState::Failed("Error loading data: bad".into()), &[]);
        let output = format_page(&page);
        assert!(output.contains("Error loading data: bad"));
    }

    #[test]
    fn test_format_page_loaded_sections() {
        let page = Dashboard::default().render(
            &loaded(),
            &[
                AnalysisKind::TotalOrdersCount,
                AnalysisKind::AreaWiseAnalysis,
                AnalysisKind::OrdersByWeather,
            ],
        );
        let output = format_page(&page);
        assert!(output.contains("Total Records: 3"));
        assert!(output.contains("Total Orders"));
        assert!(output.contains("Avg Delivery Time"));
        assert!(output.contains("Weather column not found in the dataset"));
    }

    #[test]
    fn test_format_catalog() {
        let output = format_catalog(&catalog());
        assert!(output.contains("Agent Performance Analysis"));
        assert!(output.contains("Agent_Rating, Delivery_Time"));
    }
}
