//! Schema projection.
//!
//! Maps an unordered [`Record`] onto a header's column order, one value
//! per header. Resolution is table-driven: each column name carries a
//! [`ColumnRule`] instead of the per-verb switch the column list would
//! otherwise be duplicated into. Unrecognized record fields are never
//! written anywhere.

use chrono::{SecondsFormat, Utc};

use crate::grid::Record;

/// Recognized identity/content columns: the record value passes through
/// when present and non-empty, otherwise the cell is blank.
const CONTENT_COLUMNS: [&str; 13] = [
    "auction_name",
    "auction_date",
    "address",
    "auction_sale",
    "lot_number",
    "postcode",
    "purchase_price",
    "sold_date",
    "owner",
    "guide_price",
    "auction_url",
    "source_url",
    "added_to_potential_trades",
];

/// Review-state column with a write-mode default.
pub const QA_STATUS: &str = "qa_status";

/// Ingestion timestamp column, defaulted to the current time.
pub const INGESTED_AT: &str = "ingested_at";

/// The column date-range listing filters on.
pub const AUCTION_DATE: &str = "auction_date";

/// The standard header row used when provisioning a new tab.
#[must_use]
pub fn standard_headers() -> Vec<String> {
    [
        "auction_name",
        "auction_date",
        "address",
        "auction_sale",
        "lot_number",
        "postcode",
        "purchase_price",
        "sold_date",
        "owner",
        "guide_price",
        "auction_url",
        "source_url",
        "qa_status",
        "added_to_potential_trades",
        "ingested_at",
    ]
    .iter()
    .map(|c| (*c).to_string())
    .collect()
}

/// How a column resolves its value during projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRule {
    /// Record value, blank when missing or empty.
    Passthrough,
    /// Record value, else the write-mode status literal.
    StatusDefault,
    /// Record value, else a fresh ISO-8601 timestamp.
    TimestampDefault,
    /// Not part of the recognized schema.
    Unrecognized,
}

fn rule_for(column: &str) -> ColumnRule {
    if column == QA_STATUS {
        ColumnRule::StatusDefault
    } else if column == INGESTED_AT {
        ColumnRule::TimestampDefault
    } else if CONTENT_COLUMNS.contains(&column) {
        ColumnRule::Passthrough
    } else {
        ColumnRule::Unrecognized
    }
}

/// Write mode for a projection.
///
/// Insert and update differ in two places: the `qa_status` default
/// literal, and what an unrecognized header column receives: blank on
/// insert, the existing cell value on update. The update side must see
/// the row being replaced.
#[derive(Debug, Clone, Copy)]
pub enum WriteMode<'a> {
    /// Projecting a brand-new row for append.
    Insert,
    /// Projecting a full replacement for an existing row.
    Update {
        /// The row currently stored at the target index.
        existing: &'a [String],
    },
}

impl WriteMode<'_> {
    fn status_default(&self) -> &'static str {
        match self {
            WriteMode::Insert => "imported",
            WriteMode::Update { .. } => "enriched",
        }
    }
}

/// Projects a record onto the header order.
///
/// The output always has exactly one value per header, positionally
/// aligned. Record fields that match no header are dropped without
/// error.
#[must_use]
pub fn project(headers: &[String], record: &Record, mode: WriteMode<'_>) -> Vec<String> {
    headers
        .iter()
        .enumerate()
        .map(|(i, column)| resolve(column, i, record, mode))
        .collect()
}

fn resolve(column: &str, index: usize, record: &Record, mode: WriteMode<'_>) -> String {
    match rule_for(column) {
        ColumnRule::Passthrough => record.get_non_empty(column).unwrap_or_default().to_string(),
        ColumnRule::StatusDefault => record
            .get_non_empty(column)
            .unwrap_or_else(|| mode.status_default())
            .to_string(),
        ColumnRule::TimestampDefault => record
            .get_non_empty(column)
            .map_or_else(now_iso8601, str::to_string),
        ColumnRule::Unrecognized => match mode {
            WriteMode::Insert => String::new(),
            WriteMode::Update { existing } => {
                existing.get(index).cloned().unwrap_or_default()
            }
        },
    }
}

/// Current UTC time, ISO-8601 with milliseconds and a `Z` suffix.
/// Captured per projection call, not per batch.
fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn test_projection_is_header_order_stable() {
        let headers = headers(&["address", "auction_name", "postcode"]);
        let record = Record::new()
            .with("auction_name", "March Sale")
            .with("postcode", "SW1A 1AA")
            .with("address", "1 High St");

        let row = project(&headers, &record, WriteMode::Insert);
        assert_eq!(row, ["1 High St", "March Sale", "SW1A 1AA"]);
    }

    #[test]
    fn test_output_length_matches_headers() {
        let headers = headers(&["auction_name", "mystery", "qa_status", "ingested_at"]);
        let row = project(&headers, &Record::new(), WriteMode::Insert);
        assert_eq!(row.len(), headers.len());
    }

    #[test]
    fn test_unknown_record_fields_are_dropped() {
        let headers = headers(&["auction_name", "address"]);
        let bare = Record::new().with("auction_name", "A").with("address", "B");
        let noisy = bare.clone().with("no_such_column", "x").with("other", "y");

        let with_noise = project(&headers, &noisy, WriteMode::Insert);
        assert_eq!(with_noise, project(&headers, &bare, WriteMode::Insert));
        assert!(!with_noise.iter().any(|v| v == "x" || v == "y"));
    }

    #[test]
    fn test_qa_status_defaults_by_mode() {
        let headers = headers(&["qa_status"]);
        let existing = vec!["old".to_string()];

        let inserted = project(&headers, &Record::new(), WriteMode::Insert);
        assert_eq!(inserted, ["imported"]);

        let updated = project(
            &headers,
            &Record::new(),
            WriteMode::Update { existing: &existing },
        );
        assert_eq!(updated, ["enriched"]);
    }

    #[test]
    fn test_qa_status_explicit_empty_defaults_like_absent() {
        let headers = headers(&["qa_status"]);
        let explicit_empty = Record::new().with("qa_status", "");
        let row = project(&headers, &explicit_empty, WriteMode::Insert);
        assert_eq!(row, ["imported"]);

        let supplied = Record::new().with("qa_status", "pending_enrichment");
        let row = project(&headers, &supplied, WriteMode::Insert);
        assert_eq!(row, ["pending_enrichment"]);
    }

    #[test]
    fn test_ingested_at_passthrough_and_default() {
        let headers = headers(&["ingested_at"]);

        let supplied = Record::new().with("ingested_at", "2025-01-15T10:30:00.000Z");
        let row = project(&headers, &supplied, WriteMode::Insert);
        assert_eq!(row, ["2025-01-15T10:30:00.000Z"]);

        let defaulted = project(&headers, &Record::new(), WriteMode::Insert);
        assert!(DateTime::parse_from_rfc3339(&defaulted[0]).is_ok());
        assert!(defaulted[0].ends_with('Z'));
    }

    #[test]
    fn test_unrecognized_column_blank_on_insert_preserved_on_update() {
        let headers = headers(&["auction_name", "internal_notes"]);
        let existing = vec!["Old Name".to_string(), "keep me".to_string()];
        let record = Record::new().with("auction_name", "New Name");

        let inserted = project(&headers, &record, WriteMode::Insert);
        assert_eq!(inserted, ["New Name", ""]);

        let updated = project(
            &headers,
            &record,
            WriteMode::Update { existing: &existing },
        );
        assert_eq!(updated, ["New Name", "keep me"]);
    }

    #[test]
    fn test_update_preserves_unrecognized_beyond_existing_row_end() {
        // A short existing row leaves trailing unrecognized columns blank.
        let headers = headers(&["extra_a", "extra_b"]);
        let existing = vec!["present".to_string()];
        let row = project(
            &headers,
            &Record::new(),
            WriteMode::Update { existing: &existing },
        );
        assert_eq!(row, ["present", ""]);
    }

    #[test]
    fn test_standard_headers_shape() {
        let headers = standard_headers();
        assert_eq!(headers.len(), 15);
        assert_eq!(headers[0], "auction_name");
        assert_eq!(headers[12], "qa_status");
        assert_eq!(headers[14], "ingested_at");
    }
}
