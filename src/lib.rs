//! `exrate-trends` library crate.
//!
//! The binary (`exrate`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the cleaning/smoothing pipeline is reusable outside the CLI
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod render;
pub mod report;
pub mod series;
pub mod tui;
