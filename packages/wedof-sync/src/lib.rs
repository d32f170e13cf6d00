//! Wedof sync - Mirror Wedof API collections into sheets.
//!
//! This crate pulls every paginated list endpoint of the Wedof
//! training-management API and hands the complete collections to a sheet
//! writer, one sheet per record type.
//!
//! # Example
//!
//! ```
//! use wedof_sync::config::{parse_sync_time, PAGE_LIMIT};
//! use wedof_sync::endpoints::WEDOF_ENDPOINTS;
//!
//! assert_eq!(PAGE_LIMIT, 100);
//! assert_eq!(WEDOF_ENDPOINTS.len(), 11);
//! assert!(parse_sync_time("09:00").is_ok());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants, environment loading and validation
//! - [`error`]: Error types and Result alias
//! - [`http`]: Transport trait and the blocking `reqwest` implementation
//! - [`rate_limit`]: Minimum-spacing rate limiter
//! - [`endpoints`]: Catalog of mirrored list endpoints
//! - [`pagination`]: Page parameters and response envelope normalization
//! - [`client`]: Rate-limited client, page draining and per-endpoint accessors
//! - [`aggregate`]: Fault-isolating fetch of the whole catalog
//! - [`sheet`]: Tabular rendering of collections
//! - [`writer`]: Sheet writers and mirroring
//! - [`sync`]: Sync service and daily scheduling
//! - [`logging`]: Tracing subscriber with stdout and log file output
//! - [`cli`]: Command-line interface

pub mod aggregate;
pub mod cli;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod logging;
pub mod pagination;
pub mod rate_limit;
pub mod sheet;
pub mod sync;
pub mod writer;

#[cfg(test)]
mod test_support;

// Re-export commonly used items
pub use aggregate::{Aggregate, Collection};
pub use client::WedofClient;
pub use config::{ClientConfig, SyncConfig};
pub use endpoints::{Endpoint, WEDOF_ENDPOINTS};
pub use error::{Result, WedofError};
pub use http::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
pub use pagination::{normalize_page, PageEnvelope, QueryParams, Record};
pub use sync::{SyncReport, SyncService};
pub use writer::{mirror_aggregate, DirectorySheetWriter, MirrorReport, SheetWriter};
