//! # sheetstore-proto
//!
//! Wire types for the sheetstore line protocol.
//!
//! Requests and responses are single JSON documents, one per line. The
//! field names (`ok`, `rowIndex`, `sheet_name`, `fromDate`, …) are the
//! protocol; both server and client depend on this crate so neither can
//! drift.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An ordered JSON object (row payloads and row output).
pub type JsonMap = Map<String, Value>;

/// The operations a request can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Batch insertion of records.
    Add,
    /// Full unpaginated read.
    Read,
    /// Filtered, paginated listing.
    List,
    /// Key-based full-row replace.
    UpdateRow,
    /// Key-based physical removal.
    DeleteRow,
}

impl Action {
    /// The wire name of this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Read => "read",
            Action::List => "list",
            Action::UpdateRow => "update_row",
            Action::DeleteRow => "delete_row",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Action::Add),
            "read" => Ok(Action::Read),
            "list" => Ok(Action::List),
            "update_row" => Ok(Action::UpdateRow),
            "delete_row" => Ok(Action::DeleteRow),
            _ => Err(()),
        }
    }
}

/// A request envelope.
///
/// `action` stays a free string so the dispatcher can answer an
/// unrecognized name with a failure instead of a parse error. The
/// listing parameters are string-typed on the wire; unparseable values
/// fall back to their defaults server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    /// Shared authentication token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Operation name.
    pub action: String,

    /// Records to insert (`add`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<JsonMap>>,

    /// Single record for key-based operations (`update_row`, `delete_row`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_data: Option<JsonMap>,

    /// Store id override; the configured default applies when absent
    /// or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<String>,

    /// Tab override; the configured default applies when absent or
    /// empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,

    /// Pagination offset (`list`), decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,

    /// Pagination limit (`list`), decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,

    /// Inclusive lower date bound (`list`).
    #[serde(default, rename = "fromDate", skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,

    /// Inclusive upper date bound (`list`).
    #[serde(default, rename = "toDate", skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
}

impl Request {
    /// Creates a request for the given action with everything else
    /// unset.
    #[must_use]
    pub fn new(action: Action) -> Self {
        Self {
            action: action.as_str().to_string(),
            ..Self::default()
        }
    }
}

/// A response envelope.
///
/// Always carries `ok`; every other field is operation-specific and
/// omitted from the JSON when unset. Failures carry `ok:false` plus a
/// human-readable `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    /// Success flag.
    pub ok: bool,

    /// Human-readable failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Row count (`add`: rows appended; `read`: rows returned).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    /// Human-readable success message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The tab the operation ran against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,

    /// Result rows (`read`, `list`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<JsonMap>>,

    /// Zero-based data-row index affected (`update_row`, `delete_row`).
    #[serde(default, rename = "rowIndex", skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u64>,

    /// Total filtered count before pagination (`list`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    /// Effective offset (`list`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Effective limit (`list`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Rows actually returned (`list`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned: Option<u64>,
}

impl Response {
    /// Builds a failure response.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Success response for `add`.
    #[must_use]
    pub fn added(count: usize, tab: &str) -> Self {
        Self {
            ok: true,
            count: Some(count as u64),
            message: Some(format!("Added {count} rows to {tab}")),
            sheet_name: Some(tab.to_string()),
            ..Self::default()
        }
    }

    /// Success response for `read`.
    #[must_use]
    pub fn read(rows: Vec<JsonMap>, tab: &str) -> Self {
        Self {
            ok: true,
            count: Some(rows.len() as u64),
            rows: Some(rows),
            sheet_name: Some(tab.to_string()),
            ..Self::default()
        }
    }

    /// Success response for `list`.
    #[must_use]
    pub fn listed(rows: Vec<JsonMap>, total: usize, offset: usize, limit: usize, tab: &str) -> Self {
        Self {
            ok: true,
            total: Some(total as u64),
            offset: Some(offset as u64),
            limit: Some(limit as u64),
            returned: Some(rows.len() as u64),
            rows: Some(rows),
            sheet_name: Some(tab.to_string()),
            ..Self::default()
        }
    }

    /// Success response for `update_row`.
    #[must_use]
    pub fn updated(row_index: usize, tab: &str) -> Self {
        Self {
            ok: true,
            message: Some("Row updated successfully".to_string()),
            row_index: Some(row_index as u64),
            sheet_name: Some(tab.to_string()),
            ..Self::default()
        }
    }

    /// Success response for `delete_row`.
    #[must_use]
    pub fn deleted(row_index: usize, tab: &str) -> Self {
        Self {
            ok: true,
            message: Some("Row deleted successfully".to_string()),
            row_index: Some(row_index as u64),
            sheet_name: Some(tab.to_string()),
            ..Self::default()
        }
    }
}
