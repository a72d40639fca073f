//! HTTP surface for the report workflow.
//!
//! One JSON API under `/api/` drives a session through the cycle
//! select type → fill fields → generate → read report.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_server, ReportServer, ServerError};
pub use types::ApiContext;
