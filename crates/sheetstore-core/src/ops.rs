//! Table operations.
//!
//! The five verbs over a tab: append, full read, filtered/paginated
//! list, key-based update, key-based delete. Every call re-fetches the
//! full grid from the backend first (the header row read there defines
//! column order for anything written back) and then performs at most
//! one positional edit. There is no locking above what the backend
//! provides; a concurrent external write during the read-then-write
//! window is last-writer-wins.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::{debug, info};

use crate::backend::GridBackend;
use crate::error::{StoreError, StoreResult};
use crate::grid::{JsonMap, Record};
use crate::locate::{locate, RowKey};
use crate::schema::{self, project, WriteMode};

/// Parameters for a filtered, paginated listing.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Inclusive lower bound on the auction date.
    pub from_date: Option<String>,
    /// Inclusive upper bound on the auction date.
    pub to_date: Option<String>,
    /// Rows to skip after filtering.
    pub offset: usize,
    /// Maximum rows to return.
    pub limit: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            from_date: None,
            to_date: None,
            offset: 0,
            limit: 100,
        }
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone)]
pub struct ListPage {
    /// The page rows, one object per row keyed by header name.
    pub rows: Vec<JsonMap>,
    /// Total rows that passed the filter, before pagination.
    pub total: usize,
    /// Effective offset.
    pub offset: usize,
    /// Effective limit.
    pub limit: usize,
}

impl ListPage {
    /// Rows actually returned; at most `limit`, fewer at the tail.
    #[must_use]
    pub fn returned(&self) -> usize {
        self.rows.len()
    }
}

/// The table-operations engine.
///
/// Stateless apart from the backend handle: each call names its target
/// `(store_id, tab)` explicitly, so one engine serves any number of
/// stores.
pub struct TableOps {
    backend: Arc<dyn GridBackend>,
}

impl TableOps {
    /// Creates an engine over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn GridBackend>) -> Self {
        Self { backend }
    }

    /// Appends one projected row per record, in input order.
    ///
    /// No dedup against existing rows: repeated identical records
    /// create duplicate rows. The returned count always equals the
    /// input length; failure granularity is the whole batch, never a
    /// single record.
    pub fn append(&self, store_id: &str, tab: &str, records: &[Record]) -> StoreResult<usize> {
        let grid = self.backend.fetch_grid(store_id, tab)?;
        for record in records {
            let row = project(&grid.headers, record, WriteMode::Insert);
            self.backend.append_row(store_id, tab, row)?;
        }
        info!(tab, count = records.len(), "appended rows");
        Ok(records.len())
    }

    /// Returns every data row as a header-keyed object, in storage
    /// order, without pagination.
    pub fn read_all(&self, store_id: &str, tab: &str) -> StoreResult<Vec<JsonMap>> {
        let grid = self.backend.fetch_grid(store_id, tab)?;
        let rows = grid.rows.iter().map(|row| grid.row_object(row)).collect();
        debug!(tab, count = grid.rows.len(), "read all rows");
        Ok(rows)
    }

    /// Filtered, paginated listing.
    ///
    /// With at least one date bound, a row passes when its
    /// `auction_date` cell parses and falls inside the inclusive range;
    /// unparseable cells are excluded. With no bounds every row passes.
    /// Pagination is the contiguous slice [offset, offset+limit) of the
    /// filtered sequence.
    pub fn list(&self, store_id: &str, tab: &str, query: &ListQuery) -> StoreResult<ListPage> {
        let grid = self.backend.fetch_grid(store_id, tab)?;

        let from = query.from_date.as_deref().and_then(parse_date);
        let to = query.to_date.as_deref().and_then(parse_date);
        let date_column = grid.column_index(schema::AUCTION_DATE);

        let filtered: Vec<&Vec<String>> = if from.is_none() && to.is_none() {
            grid.rows.iter().collect()
        } else {
            grid.rows
                .iter()
                .filter(|row| {
                    let Some(date) = date_column
                        .and_then(|i| row.get(i))
                        .and_then(|cell| parse_date(cell))
                    else {
                        return false;
                    };
                    from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t)
                })
                .collect()
        };

        let total = filtered.len();
        let rows: Vec<JsonMap> = filtered
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|row| grid.row_object(row))
            .collect();

        debug!(tab, total, returned = rows.len(), "listed rows");
        Ok(ListPage {
            rows,
            total,
            offset: query.offset,
            limit: query.limit,
        })
    }

    /// Replaces the row matching the record's composite key.
    ///
    /// Full positional replace, not a merge: every recognized column is
    /// recomputed from the record, with unrecognized header columns
    /// preserved from the existing row. Returns the zero-based index of
    /// the affected row.
    pub fn update(&self, store_id: &str, tab: &str, record: &Record) -> StoreResult<usize> {
        let grid = self.backend.fetch_grid(store_id, tab)?;
        let key = RowKey::from_record(record);
        let index = locate(&grid, &key).ok_or(StoreError::RowNotFound)?;

        let row = project(
            &grid.headers,
            record,
            WriteMode::Update {
                existing: &grid.rows[index],
            },
        );
        self.backend.write_row(store_id, tab, index, row)?;
        info!(tab, index, "updated row");
        Ok(index)
    }

    /// Removes the row matching the record's composite key.
    ///
    /// Subsequent rows shift up by one. Returns the zero-based index
    /// that was removed.
    pub fn delete(&self, store_id: &str, tab: &str, record: &Record) -> StoreResult<usize> {
        let grid = self.backend.fetch_grid(store_id, tab)?;
        let key = RowKey::from_record(record);
        let index = locate(&grid, &key).ok_or(StoreError::RowNotFound)?;

        self.backend.delete_row(store_id, tab, index)?;
        info!(tab, index, "deleted row");
        Ok(index)
    }
}

/// Parses a date cell or bound: RFC 3339, or a plain `YYYY-MM-DD`
/// treated as midnight UTC.
fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}
