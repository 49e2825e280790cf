//! Plotters-based chart rendering.
//!
//! `panel` is backend-agnostic and shared with the TUI; `figure` lays the
//! panels out into the SVG written by `exrate render`.

pub mod figure;
pub mod panel;

pub use figure::render_figure;
