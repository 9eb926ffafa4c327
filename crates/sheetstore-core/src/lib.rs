//! # sheetstore-core
//!
//! Row-store engine over spreadsheet-like grids.
//!
//! A grid is a header row plus zero or more data rows of untyped text
//! cells. The engine treats it as a schema-on-read table: incoming
//! records are projected onto the header's column order, rows are
//! located by a composite natural key, and listings can be filtered by
//! date range and paginated. The grid itself lives behind the
//! [`GridBackend`] trait and is re-fetched in full before every
//! operation.
//!
//! This crate provides:
//!
//! - **Grid model**: [`Grid`], [`Record`], [`RowKey`]
//! - **Schema projection**: table-driven mapping of records onto header
//!   order with per-column default rules
//! - **Table operations**: append, read, filtered/paginated list,
//!   key-based update, key-based delete via [`TableOps`]
//! - **Storage backends**: in-memory and JSON-file implementations of
//!   [`GridBackend`]
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use sheetstore_core::{standard_headers, GridBackend, MemoryBackend, Record, TableOps};
//!
//! let backend = Arc::new(MemoryBackend::new());
//! backend.create_tab("demo", "AUCTIONS_MASTER", &standard_headers()).unwrap();
//!
//! let ops = TableOps::new(backend);
//! let record = Record::new()
//!     .with("auction_name", "March Sale")
//!     .with("auction_date", "2025-03-01")
//!     .with("address", "1 High Street");
//! let added = ops.append("demo", "AUCTIONS_MASTER", &[record]).unwrap();
//! assert_eq!(added, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod grid;
pub mod locate;
pub mod ops;
pub mod schema;

pub use backend::{FileBackend, GridBackend, MemoryBackend};
pub use error::{StoreError, StoreResult};
pub use grid::{Grid, JsonMap, Record};
pub use locate::{locate, RowKey};
pub use ops::{ListPage, ListQuery, TableOps};
pub use schema::{project, standard_headers, WriteMode};
