//! DuckLake inlined-data reproduction
//!
//! Runs a `WHERE` + `ORDER BY` + `LIMIT` query against a DuckLake table while
//! its rows are still inlined in the PostgreSQL metadata store, flushes them to
//! object storage, and runs the query again, reporting any row that violates
//! the filter.
//!
//! This crate provides:
//! - Connector setup (extension, S3 secret, catalog attachment)
//! - Fixture loading
//! - The probe query and per-row classification
//! - The flush on a dedicated connection inside an explicit transaction
//! - The scenario driver and its report

pub mod cli;
pub mod config;
pub mod connector;
pub mod error;
pub mod flush;
pub mod loader;
pub mod query;
pub mod scenario;

pub use config::{OutputFormat, ReproConfig};
pub use connector::LakeSession;
pub use error::ReproError;
pub use scenario::{Scenario, ScenarioReport};
