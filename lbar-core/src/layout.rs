//! Block placement.
//!
//! Turns a [`ParsedStatus`] into a [`Frame`]: absolute x offsets per block,
//! plus an underline rectangle ahead of every underlined block.

use tracing::trace;

use crate::markup::{Lane, ParsedStatus, TextBlock};

/// Color slot a draw command paints with. The renderer owns the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Foreground,
    Underline,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Draw `span` (a block of the status line) with its baseline at `y`.
    Text {
        span: TextBlock,
        x: f32,
        y: f32,
        color: ColorRole,
        underline: bool,
        lane: Lane,
    },
    /// Filled rectangle, top-left anchored.
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: ColorRole,
    },
}

impl DrawCommand {
    pub fn is_text(&self) -> bool {
        matches!(self, DrawCommand::Text { .. })
    }
}

/// One layout pass worth of draw commands, in paint order.
pub type Frame = Vec<DrawCommand>;

/// Vertical placement of the underline bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnderlineGeometry {
    pub y: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEngine {
    baseline: f32,
    underline: UnderlineGeometry,
}

impl LayoutEngine {
    pub fn new(baseline: f32, underline: UnderlineGeometry) -> Self {
        Self {
            baseline,
            underline,
        }
    }

    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    pub fn underline(&self) -> UnderlineGeometry {
        self.underline
    }

    /// Place every block of `status` on a bar `screen_width` pixels wide.
    ///
    /// Left flows rightward from 0. Center flows rightward from
    /// `(screen_width - w) / 2` of each block plus the lane's running offset.
    /// Right is walked last-block-first, flowing leftward from one blank glyph
    /// inside the right edge.
    pub fn layout<F>(&self, status: &ParsedStatus<'_>, mut measure: F, screen_width: f32) -> Frame
    where
        F: FnMut(&[u8]) -> f32,
    {
        let mut frame = Frame::with_capacity(status.block_count() * 2);

        let mut offset = 0.0;
        for block in status.lane(Lane::Left) {
            let w = measure(status.text(block));
            self.place(&mut frame, block, Lane::Left, offset, w);
            offset += w;
        }

        let mut offset = 0.0;
        for block in status.lane(Lane::Center) {
            let w = measure(status.text(block));
            let x = (screen_width - w) / 2.0 + offset;
            self.place(&mut frame, block, Lane::Center, x, w);
            offset += w;
        }

        let right = status.lane(Lane::Right);
        if !right.is_empty() {
            let mut offset = measure(b" ");
            for block in right.iter().rev() {
                let w = measure(status.text(block));
                let x = screen_width - offset - w;
                self.place(&mut frame, block, Lane::Right, x, w);
                offset += w;
            }
        }

        trace!(commands = frame.len(), screen_width, "layout pass");
        frame
    }

    fn place(&self, frame: &mut Frame, block: &TextBlock, lane: Lane, x: f32, w: f32) {
        if block.underline {
            frame.push(DrawCommand::Rect {
                x,
                y: self.underline.y,
                w,
                h: self.underline.height,
                color: ColorRole::Underline,
            });
        }

        frame.push(DrawCommand::Text {
            span: *block,
            x,
            y: self.baseline,
            color: ColorRole::Foreground,
            underline: block.underline,
            lane,
        });
    }
}
