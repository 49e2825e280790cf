//! Plain-text plotting.

pub mod ascii;

pub use ascii::*;
