//! Parsed status model.
//!
//! Blocks never own text. They are byte ranges into the status line, and the
//! only way to read their bytes is through the [`ParsedStatus`] that borrows
//! that line, so a block cannot outlive the buffer it was cut from.

use std::ops::Range;

/// Horizontal alignment group within the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Left,
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    pub(crate) fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Center => 1,
            Lane::Right => 2,
        }
    }
}

/// Inline control sequence: sentinel byte followed by one code byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    SwitchLeft,
    SwitchRight,
    SwitchCenter,
    ToggleUnderline,
}

impl Directive {
    /// Decode a code byte. Unknown codes yield `None` and are ignored.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            b'L' => Some(Directive::SwitchLeft),
            b'R' => Some(Directive::SwitchRight),
            b'C' => Some(Directive::SwitchCenter),
            b'U' => Some(Directive::ToggleUnderline),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Directive::SwitchLeft => b'L',
            Directive::SwitchRight => b'R',
            Directive::SwitchCenter => b'C',
            Directive::ToggleUnderline => b'U',
        }
    }
}

/// A contiguous run of status bytes assigned to one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBlock {
    pub start: usize,
    pub len: usize,
    pub underline: bool,
}

impl TextBlock {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The result of one parse: three lanes of blocks over a borrowed buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatus<'a> {
    source: &'a [u8],
    lanes: [Vec<TextBlock>; 3],
}

impl<'a> ParsedStatus<'a> {
    pub(crate) fn new(source: &'a [u8], lanes: [Vec<TextBlock>; 3]) -> Self {
        Self { source, lanes }
    }

    /// The status line this parse was taken from.
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// Blocks of one lane, in source order.
    pub fn lane(&self, lane: Lane) -> &[TextBlock] {
        &self.lanes[lane.index()]
    }

    /// Bytes covered by a block of this parse.
    pub fn text(&self, block: &TextBlock) -> &'a [u8] {
        &self.source[block.range()]
    }

    /// All blocks across all lanes, ordered by start offset.
    pub fn blocks_by_offset(&self) -> Vec<TextBlock> {
        let mut all: Vec<TextBlock> = self.lanes.iter().flatten().copied().collect();
        all.sort_by_key(|b| b.start);
        all
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.iter().all(Vec::is_empty)
    }

    pub fn block_count(&self) -> usize {
        self.lanes.iter().map(Vec::len).sum()
    }
}
