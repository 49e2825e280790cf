//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw input rows (`RawTable`, `RawRecord`)
//! - cleaned and smoothed series (`CleanSeries`, `SmoothedSeries`)
//! - presentation windows and styling (`Segment`, `ChartConfig`)
//! - the run configuration (`RunConfig`)

pub mod types;

pub use types::*;
