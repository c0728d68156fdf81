//! Status markup.
//!
//! A status line is plain bytes with inline two-byte directives:
//! - `&L` / `&C` / `&R` switch the lane subsequent text lands in
//! - `&U` toggles underline
//!
//! The parser cuts the line into blocks without copying it.

pub mod model;
pub mod parser;

pub use model::{Directive, Lane, ParsedStatus, TextBlock};
pub use parser::{DEFAULT_LANE_CAPACITY, DEFAULT_SENTINEL, StatusParser};
