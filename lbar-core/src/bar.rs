//! Status bar state: the retained line, its frame and the update policy.

use tracing::{debug, warn};

use crate::error::CapacityError;
use crate::layout::{Frame, LayoutEngine};
use crate::markup::{ParsedStatus, StatusParser};

#[derive(Debug, Clone)]
pub struct StatusBar {
    parser: StatusParser,
    layout: LayoutEngine,
    status: Vec<u8>,
    frame: Frame,
}

impl StatusBar {
    pub fn new(parser: StatusParser, layout: LayoutEngine) -> Self {
        Self {
            parser,
            layout,
            status: Vec::new(),
            frame: Frame::new(),
        }
    }

    pub fn parser(&self) -> &StatusParser {
        &self.parser
    }

    pub fn layout_engine(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Swap the layout geometry (height or font change). Call [`relayout`]
    /// afterwards to refresh the frame.
    ///
    /// [`relayout`]: StatusBar::relayout
    pub fn set_layout_engine(&mut self, layout: LayoutEngine) {
        self.layout = layout;
    }

    /// The line the current frame was laid out from.
    pub fn status(&self) -> &[u8] {
        &self.status
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Replace the status with `line` and lay it out.
    ///
    /// A line that overflows a lane is rejected: the previous status and
    /// frame stay in place and the error is returned.
    pub fn update<F>(
        &mut self,
        line: &[u8],
        measure: F,
        screen_width: f32,
    ) -> Result<&Frame, CapacityError>
    where
        F: FnMut(&[u8]) -> f32,
    {
        let frame = match self.parser.parse(line) {
            Ok(parsed) => self.layout.layout(&parsed, measure, screen_width),
            Err(err) => {
                warn!(%err, "status update dropped");
                return Err(err);
            }
        };

        debug!(bytes = line.len(), commands = frame.len(), "status updated");
        self.status.clear();
        self.status.extend_from_slice(line);
        self.frame = frame;
        Ok(&self.frame)
    }

    /// Lay out the retained status again (resize, scale or font change).
    pub fn relayout<F>(&mut self, measure: F, screen_width: f32) -> &Frame
    where
        F: FnMut(&[u8]) -> f32,
    {
        // The retained line parsed once already, so it cannot overflow now.
        if let Ok(parsed) = self.parser.parse(&self.status) {
            self.frame = self.layout.layout(&parsed, measure, screen_width);
        }
        &self.frame
    }

    /// Parse the retained status again, e.g. for inspection.
    pub fn parsed(&self) -> Result<ParsedStatus<'_>, CapacityError> {
        self.parser.parse(&self.status)
    }
}
