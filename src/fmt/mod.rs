//! Formatting for gobasics
//!
//! - `float`: Go-compatible rendering of floating-point values
//! - `surface`: pretty-printing of the syntax tree, for diagnostics and
//!   `gobasics fmt`

pub mod float;
pub mod surface;

pub use float::{FloatWidth, format_float};
