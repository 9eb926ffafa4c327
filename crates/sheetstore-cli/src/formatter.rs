//! Output formatting for row results.

use comfy_table::{Cell, ContentArrangement, Table};
use serde_json::Value;

use sheetstore_proto::JsonMap;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Formatted table output.
    Table,
    /// JSON output.
    Json,
}

/// Formats result rows according to the specified format.
pub fn format_rows(rows: &[JsonMap], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_table(rows),
        OutputFormat::Json => format_json(rows),
    }
}

fn format_table(rows: &[JsonMap]) -> String {
    let Some(first) = rows.first() else {
        return "(no rows)".to_string();
    };

    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    // Rows come back keyed in header order; the first row names the
    // columns for the whole page.
    let columns: Vec<&String> = first.keys().collect();
    table.set_header(columns.iter().map(|c| Cell::new(c)));

    for row in rows {
        let cells: Vec<Cell> = columns
            .iter()
            .map(|c| Cell::new(display_value(row.get(c.as_str()))))
            .collect();
        table.add_row(cells);
    }

    table.to_string()
}

fn format_json(rows: &[JsonMap]) -> String {
    serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string())
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
