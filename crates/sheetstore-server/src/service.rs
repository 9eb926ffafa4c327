//! Request handling.
//!
//! [`ApiService`] is the operation boundary: token check, store/tab
//! resolution, action dispatch, and conversion of every [`StoreError`]
//! into a structured failure response. Nothing below here escapes as a
//! fault to the transport.

use std::sync::Arc;

use tracing::{info, warn};

use sheetstore_core::{GridBackend, ListQuery, Record, StoreError, TableOps};
use sheetstore_proto::{Action, JsonMap, Request, Response};

use crate::config::ServerConfig;

const DEFAULT_OFFSET: usize = 0;
const DEFAULT_LIMIT: usize = 100;

/// The request/response service.
pub struct ApiService {
    ops: TableOps,
    shared_token: String,
    default_sheet_id: String,
    default_tab: String,
}

impl ApiService {
    /// Creates a service over a backend with explicit token and
    /// default target.
    #[must_use]
    pub fn new(
        backend: Arc<dyn GridBackend>,
        shared_token: impl Into<String>,
        default_sheet_id: impl Into<String>,
        default_tab: impl Into<String>,
    ) -> Self {
        Self {
            ops: TableOps::new(backend),
            shared_token: shared_token.into(),
            default_sheet_id: default_sheet_id.into(),
            default_tab: default_tab.into(),
        }
    }

    /// Creates a service from server configuration.
    #[must_use]
    pub fn from_config(config: &ServerConfig, backend: Arc<dyn GridBackend>) -> Self {
        Self::new(
            backend,
            config.shared_token.clone(),
            config.sheet_id.clone(),
            config.default_tab.clone(),
        )
    }

    /// Handles one request, always producing a response.
    pub fn handle(&self, request: &Request) -> Response {
        if request.token.as_deref().unwrap_or("") != self.shared_token {
            warn!(action = %request.action, "rejected request with invalid token");
            return Response::failure("Invalid token");
        }

        let store_id = resolve(request.sheet_id.as_deref(), &self.default_sheet_id);
        let tab = resolve(request.sheet_name.as_deref(), &self.default_tab);
        info!(action = %request.action, tab, "handling request");

        let result = match request.action.parse::<Action>() {
            Ok(Action::Add) => self.handle_add(request, store_id, tab),
            Ok(Action::Read) => self.handle_read(store_id, tab),
            Ok(Action::List) => self.handle_list(request, store_id, tab),
            Ok(Action::UpdateRow) => self.handle_update(request, store_id, tab),
            Ok(Action::DeleteRow) => self.handle_delete(request, store_id, tab),
            Err(()) => Err(StoreError::unsupported(request.action.clone())),
        };

        result.unwrap_or_else(|e| {
            warn!(action = %request.action, tab, error = %e, "request failed");
            Response::failure(e.to_string())
        })
    }

    fn handle_add(
        &self,
        request: &Request,
        store_id: &str,
        tab: &str,
    ) -> Result<Response, StoreError> {
        let Some(rows) = request.rows.as_ref() else {
            return Ok(Response::failure("Missing 'rows' payload"));
        };
        let records: Vec<Record> = rows.iter().map(Record::from_json).collect();
        let added = self.ops.append(store_id, tab, &records)?;
        Ok(Response::added(added, tab))
    }

    fn handle_read(&self, store_id: &str, tab: &str) -> Result<Response, StoreError> {
        let rows = self.ops.read_all(store_id, tab)?;
        Ok(Response::read(rows, tab))
    }

    fn handle_list(
        &self,
        request: &Request,
        store_id: &str,
        tab: &str,
    ) -> Result<Response, StoreError> {
        let query = ListQuery {
            from_date: request.from_date.clone(),
            to_date: request.to_date.clone(),
            offset: parse_param(request.offset.as_deref(), DEFAULT_OFFSET),
            limit: parse_param(request.limit.as_deref(), DEFAULT_LIMIT),
        };
        let page = self.ops.list(store_id, tab, &query)?;
        Ok(Response::listed(
            page.rows, page.total, page.offset, page.limit, tab,
        ))
    }

    fn handle_update(
        &self,
        request: &Request,
        store_id: &str,
        tab: &str,
    ) -> Result<Response, StoreError> {
        let Some(record) = self.payload_record(request) else {
            return Ok(Response::failure("Missing 'row_data' payload"));
        };
        let index = self.ops.update(store_id, tab, &record)?;
        Ok(Response::updated(index, tab))
    }

    fn handle_delete(
        &self,
        request: &Request,
        store_id: &str,
        tab: &str,
    ) -> Result<Response, StoreError> {
        let Some(record) = self.payload_record(request) else {
            return Ok(Response::failure("Missing 'row_data' payload"));
        };
        let index = self.ops.delete(store_id, tab, &record)?;
        Ok(Response::deleted(index, tab))
    }

    fn payload_record(&self, request: &Request) -> Option<Record> {
        request.row_data.as_ref().map(|object: &JsonMap| Record::from_json(object))
    }
}

/// Resolves a per-call override against the configured default; empty
/// strings count as absent.
fn resolve<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

/// Parses a string-typed numeric parameter, falling back to the
/// default when absent or unparseable.
fn parse_param(value: Option<&str>, default: usize) -> usize {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
