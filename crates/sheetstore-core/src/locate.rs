//! Row location by composite natural key.
//!
//! A row's logical identity is the (address, auction_name, auction_date)
//! triple. Lookup is a linear first-match scan with exact string
//! equality; no trimming, case folding, or type coercion. O(rows) is
//! fine at the target scale, since every call already fetched the full
//! grid.

use crate::grid::{Grid, Record};

/// Composite natural key identifying one logical row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowKey {
    /// Property address.
    pub address: String,
    /// Auction event name.
    pub auction_name: String,
    /// Auction date as stored (uninterpreted text).
    pub auction_date: String,
}

impl RowKey {
    /// Extracts the key from a record. Absent fields read as empty
    /// string, so a record missing a key field can only match rows
    /// whose cell is also empty.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        Self {
            address: record.get("address").unwrap_or_default().to_string(),
            auction_name: record.get("auction_name").unwrap_or_default().to_string(),
            auction_date: record.get("auction_date").unwrap_or_default().to_string(),
        }
    }
}

/// Finds the zero-based data-row index of the first row matching `key`.
///
/// When several rows share a key, the lowest index wins; that tie-break
/// is part of the contract, not an error. A key column missing from the
/// header compares as an empty cell.
#[must_use]
pub fn locate(grid: &Grid, key: &RowKey) -> Option<usize> {
    let address = grid.column_index("address");
    let auction_name = grid.column_index("auction_name");
    let auction_date = grid.column_index("auction_date");

    grid.rows.iter().position(|row| {
        cell(row, address) == key.address
            && cell(row, auction_name) == key.auction_name
            && cell(row, auction_date) == key.auction_date
    })
}

fn cell(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| row.get(i))
        .map(String::as_str)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_rows(rows: &[[&str; 3]]) -> Grid {
        let mut grid = Grid::new(vec![
            "auction_name".into(),
            "auction_date".into(),
            "address".into(),
        ]);
        for row in rows {
            grid.rows.push(row.iter().map(|c| (*c).to_string()).collect());
        }
        grid
    }

    fn key(address: &str, name: &str, date: &str) -> RowKey {
        RowKey {
            address: address.into(),
            auction_name: name.into(),
            auction_date: date.into(),
        }
    }

    #[test]
    fn test_locate_finds_matching_row() {
        let grid = grid_with_rows(&[
            ["March Sale", "2025-03-01", "1 High St"],
            ["March Sale", "2025-03-01", "2 Low Rd"],
        ]);
        assert_eq!(locate(&grid, &key("2 Low Rd", "March Sale", "2025-03-01")), Some(1));
    }

    #[test]
    fn test_locate_not_found() {
        let grid = grid_with_rows(&[["March Sale", "2025-03-01", "1 High St"]]);
        assert_eq!(locate(&grid, &key("9 Nowhere", "March Sale", "2025-03-01")), None);
    }

    #[test]
    fn test_locate_first_match_wins_on_duplicate_keys() {
        let grid = grid_with_rows(&[
            ["Dup", "2025-03-01", "Same Addr"],
            ["Dup", "2025-03-01", "Same Addr"],
        ]);
        assert_eq!(locate(&grid, &key("Same Addr", "Dup", "2025-03-01")), Some(0));
    }

    #[test]
    fn test_locate_is_exact_no_trimming() {
        let grid = grid_with_rows(&[["March Sale", "2025-03-01", "1 High St "]]);
        assert_eq!(locate(&grid, &key("1 High St", "March Sale", "2025-03-01")), None);
    }

    #[test]
    fn test_missing_key_field_matches_only_empty_cells() {
        let grid = grid_with_rows(&[
            ["March Sale", "2025-03-01", "1 High St"],
            ["March Sale", "2025-03-01", ""],
        ]);
        let record = Record::new()
            .with("auction_name", "March Sale")
            .with("auction_date", "2025-03-01");
        let key = RowKey::from_record(&record);
        assert_eq!(key.address, "");
        assert_eq!(locate(&grid, &key), Some(1));
    }

    #[test]
    fn test_key_column_absent_from_header_reads_as_empty() {
        let mut grid = Grid::new(vec!["auction_name".into(), "auction_date".into()]);
        grid.rows.push(vec!["March Sale".into(), "2025-03-01".into()]);

        // No address column: only an empty address key can match.
        assert_eq!(locate(&grid, &key("", "March Sale", "2025-03-01")), Some(0));
        assert_eq!(locate(&grid, &key("1 High St", "March Sale", "2025-03-01")), None);
    }
}
