use crate::error::CapacityError;

use super::model::{Directive, Lane, ParsedStatus, TextBlock};

/// Directive introducer used by the status stream.
pub const DEFAULT_SENTINEL: u8 = b'&';

/// Default per-lane block limit.
pub const DEFAULT_LANE_CAPACITY: usize = 64;

/// Splits a status line into lane blocks (directives: `&L`, `&C`, `&R`, `&U`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusParser {
    sentinel: u8,
    lane_capacity: usize,
}

impl Default for StatusParser {
    fn default() -> Self {
        Self::new(DEFAULT_SENTINEL, DEFAULT_LANE_CAPACITY)
    }
}

impl StatusParser {
    pub fn new(sentinel: u8, lane_capacity: usize) -> Self {
        Self {
            sentinel,
            lane_capacity,
        }
    }

    pub fn sentinel(&self) -> u8 {
        self.sentinel
    }

    pub fn lane_capacity(&self) -> usize {
        self.lane_capacity
    }

    /// Parse one complete status line.
    ///
    /// Every sentinel/code pair closes the block in progress, whether or not
    /// the code is recognized, so `a&Zb` gives two adjacent Left blocks.
    /// Empty blocks are dropped. A sentinel in the last position has no code
    /// byte and is kept as literal text.
    pub fn parse<'a>(&self, buf: &'a [u8]) -> Result<ParsedStatus<'a>, CapacityError> {
        let mut scan = Scan::new(self.lane_capacity);

        let mut i = 0;
        while i < buf.len() {
            if buf[i] == self.sentinel {
                if let Some(&code) = buf.get(i + 1) {
                    scan.flush()?;
                    if let Some(directive) = Directive::from_code(code) {
                        scan.apply(directive);
                    }
                    scan.restart(i + 2);
                    i += 2;
                    continue;
                }
            }

            scan.len += 1;
            i += 1;
        }

        scan.flush()?;

        Ok(ParsedStatus::new(buf, scan.lanes))
    }
}

/// Mutable scan state for one parse.
struct Scan {
    lane: Lane,
    underline: bool,
    start: usize,
    len: usize,
    capacity: usize,
    lanes: [Vec<TextBlock>; 3],
}

impl Scan {
    fn new(capacity: usize) -> Self {
        Self {
            lane: Lane::Left,
            underline: false,
            start: 0,
            len: 0,
            capacity,
            lanes: [Vec::new(), Vec::new(), Vec::new()],
        }
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::SwitchLeft => self.lane = Lane::Left,
            Directive::SwitchCenter => self.lane = Lane::Center,
            Directive::SwitchRight => self.lane = Lane::Right,
            Directive::ToggleUnderline => self.underline = !self.underline,
        }
    }

    fn restart(&mut self, start: usize) {
        self.start = start;
        self.len = 0;
    }

    fn flush(&mut self) -> Result<(), CapacityError> {
        if self.len == 0 {
            return Ok(());
        }

        let lane = self.lane;
        let blocks = &mut self.lanes[lane.index()];

        if blocks.len() >= self.capacity {
            return Err(CapacityError::LaneOverflow {
                lane,
                capacity: self.capacity,
            });
        }

        blocks.push(TextBlock {
            start: self.start,
            len: self.len,
            underline: self.underline,
        });
        tracing::trace!(
            ?lane,
            start = self.start,
            len = self.len,
            underline = self.underline,
            "block"
        );
        self.len = 0;
        Ok(())
    }
}
