//! # sheetstore-server
//!
//! Service layer and network shell for sheetstore.
//!
//! This crate provides:
//!
//! - **Service**: shared-token check, per-call store/tab resolution,
//!   action dispatch onto the core engine, and conversion of every
//!   error into a structured failure response.
//! - **Transport**: a newline-delimited JSON protocol over TCP. One
//!   request line in, one response line out.
//! - **Configuration**: TOML-loadable server settings; the shared token
//!   and the default store/tab are explicit configuration, never
//!   ambient state.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use sheetstore_core::MemoryBackend;
//! use sheetstore_proto::{Action, Request};
//! use sheetstore_server::{ApiService, ServerConfig};
//!
//! let config = ServerConfig::builder().shared_token("secret").build();
//! let backend = Arc::new(MemoryBackend::new());
//! let service = ApiService::from_config(&config, backend);
//!
//! let mut request = Request::new(Action::Read);
//! request.token = Some("secret".to_string());
//! let response = service.handle(&request);
//! // The default tab has not been provisioned here, so this fails.
//! assert!(!response.ok);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod net;
pub mod service;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use net::Server;
pub use service::ApiService;
