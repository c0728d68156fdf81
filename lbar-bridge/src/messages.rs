//! Events delivered to the winit loop from outside the main thread.

/// User event type of the bar's event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarEvent {
    /// A complete status line from stdin, delimiter stripped.
    Status(Vec<u8>),

    /// Stdin reached EOF or failed. The last status stays on screen.
    InputClosed,
}
