//! lbar bridge library target.
//!
//! The binary entry point is in `main.rs`; the modules live here so
//! `tests/*.rs` can reach the configuration, color and geometry logic.

pub mod config;
pub mod input;
pub mod messages;
pub mod renderer;
pub mod shell;
pub mod util;

mod gfx;
