//! TWRA API Server module
//!
//! Provides an HTTP REST API over the exporter.
//! Run with `twra-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server};
