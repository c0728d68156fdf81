//! Application shell: winit lifecycle, event dispatch, bar geometry.
//!
//! The shell owns the event loop on the main thread. Status lines arrive
//! as user events from the stdin pump; window events drive resize and
//! redraw.

pub(crate) mod app;
mod events;
pub mod layout;

pub use app::{BarApp, run};
