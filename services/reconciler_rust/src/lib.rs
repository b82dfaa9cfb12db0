//! Reconciler Service Library
//!
//! Reads a computed stat pool and a reference source, matches every reference
//! row to a pool entity and writes per-field differences.

pub mod config;
pub mod driver;
pub mod report;
pub mod sources;
pub mod summary;

// Re-export commonly used types
pub use config::Config;
pub use driver::{run, Reconciler, RowOutcome};
pub use report::ReportWriter;
pub use summary::RunSummary;
