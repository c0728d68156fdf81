//! Capacity errors raised by the input and parsing stages.

use thiserror::Error;

use crate::markup::Lane;

/// Both bounded stages of the pipeline report through this type. Neither is
/// fatal: the caller decides whether to truncate or keep the previous frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapacityError {
    /// A lane collected more blocks than the parser allows.
    #[error("{lane:?} lane exceeded its capacity of {capacity} blocks")]
    LaneOverflow { lane: Lane, capacity: usize },

    /// A status line grew past the input buffer before its delimiter arrived.
    #[error("status line exceeded {capacity} bytes; remainder dropped")]
    InputOverflow { capacity: usize },
}
