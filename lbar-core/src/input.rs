//! Stdin line accumulator (streaming, chunk-safe).
//!
//! Bytes arrive in arbitrary chunks; a status line is complete at `\n` or
//! NUL. Lines longer than the capacity are truncated, reported once, and
//! still delivered.

use tracing::warn;

use crate::error::CapacityError;

/// Default line capacity in bytes.
pub const DEFAULT_LINE_CAPACITY: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A complete status line, delimiter stripped.
    Line(Vec<u8>),

    /// The line in progress hit capacity. Emitted once per line.
    Overflow(CapacityError),
}

#[derive(Debug, Clone)]
pub struct LineAccumulator {
    buf: Vec<u8>,
    capacity: usize,
    overflowed: bool,
}

impl Default for LineAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_CAPACITY)
    }
}

impl LineAccumulator {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
            overflowed: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes of the line in progress.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Feed bytes; completed lines and overflow notices are appended to `out`.
    pub fn feed(&mut self, bytes: &[u8], out: &mut Vec<InputEvent>) {
        for &b in bytes {
            if b == b'\n' || b == 0 {
                self.overflowed = false;
                out.push(InputEvent::Line(std::mem::take(&mut self.buf)));
                self.buf.reserve(self.capacity);
                continue;
            }

            if self.buf.len() < self.capacity {
                self.buf.push(b);
                continue;
            }

            if !self.overflowed {
                self.overflowed = true;
                warn!(capacity = self.capacity, "status line truncated");
                out.push(InputEvent::Overflow(CapacityError::InputOverflow {
                    capacity: self.capacity,
                }));
            }
        }
    }
}
