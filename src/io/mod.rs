//! Input/output helpers.
//!
//! - CSV ingest into a raw table (`ingest`)
//! - series exports (CSV/JSON) (`export`)
//! - chart config JSON read/write (`config`)

pub mod config;
pub mod export;
pub mod ingest;

pub use config::*;
pub use export::*;
pub use ingest::*;
