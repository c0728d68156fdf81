//! lbar core: status markup parsing and bar layout.
//!
//! Nothing in this crate touches a display. The bridge feeds stdin bytes to a
//! [`LineAccumulator`], hands complete lines to a [`StatusBar`], and replays
//! the resulting [`Frame`] through its [`Renderer`] with [`paint`].

pub mod bar;
pub mod error;
pub mod input;
pub mod layout;
pub mod markup;
pub mod render;

pub use bar::StatusBar;
pub use error::CapacityError;
pub use input::{DEFAULT_LINE_CAPACITY, InputEvent, LineAccumulator};
pub use layout::{ColorRole, DrawCommand, Frame, LayoutEngine, UnderlineGeometry};
pub use markup::{
    DEFAULT_LANE_CAPACITY, DEFAULT_SENTINEL, Directive, Lane, ParsedStatus, StatusParser,
    TextBlock,
};
pub use render::{Renderer, paint};
