//! The cleaning and smoothing pipeline.
//!
//! Data flows strictly left to right:
//! raw labels → `columns` → `coerce` → `assemble` → `smooth` → `segment`.
//! Every stage returns a new value; nothing is mutated in place.

pub mod assemble;
pub mod coerce;
pub mod columns;
pub mod segment;
pub mod smooth;

pub use assemble::{Assembled, DroppedRow, assemble};
pub use columns::normalize_columns;
pub use segment::{select, select_all, validate_segments};
pub use smooth::smooth;
