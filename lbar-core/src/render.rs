//! Renderer seam and frame replay.

use crate::layout::{ColorRole, DrawCommand, Frame};
use crate::markup::Lane;

/// A display surface that can measure, draw and present a bar frame.
pub trait Renderer {
    /// Pixel width of `text` in the active font. Must not fail; return 0.0
    /// for runs the font cannot shape.
    fn measure_width(&mut self, text: &[u8]) -> f32;

    /// Draw `text` with its baseline at `y`.
    fn draw_text(&mut self, text: &[u8], x: f32, y: f32, color: ColorRole, lane: Lane);

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: ColorRole);

    fn present_frame(&mut self) -> anyhow::Result<()>;
}

/// Replay `frame` against `renderer` in order, then present it once.
///
/// `status` must be the line the frame was laid out from.
pub fn paint<R>(status: &[u8], frame: &Frame, renderer: &mut R) -> anyhow::Result<()>
where
    R: Renderer + ?Sized,
{
    for cmd in frame {
        match *cmd {
            DrawCommand::Text {
                span, x, y, color, lane, ..
            } => {
                let Some(text) = status.get(span.range()) else {
                    tracing::warn!(
                        start = span.start,
                        len = span.len,
                        status_len = status.len(),
                        "text span outside the status line; frame is stale"
                    );
                    continue;
                };
                renderer.draw_text(text, x, y, color, lane);
            }
            DrawCommand::Rect { x, y, w, h, color } => renderer.draw_rect(x, y, w, h, color),
        }
    }

    renderer.present_frame()
}
