//! Glyphon text engine.
//!
//! Shapes status bytes with cosmic-text, measures them for layout and queues
//! them for drawing. Each queued run is its own one-line buffer; `render`
//! uploads the glyphs and draws them over whatever the frame already holds.

use glyphon::{
    Attrs, Buffer as GlyphonBuffer, Cache, FontSystem, Metrics, Resolution, Shaping, SwashCache,
    TextArea, TextAtlas, TextBounds, TextRenderer, Viewport,
};
use wgpu::{CommandEncoder, Device, MultisampleState, Queue, TextureFormat, TextureView};

use crate::config::{FontFamily, FontSpec};
use crate::renderer::Rgba;
use crate::shell::layout::FontMetrics;

/// One shaped run waiting for the next render.
struct QueuedText {
    buffer: GlyphonBuffer,
    left: f32,
    top: f32,
    color: Rgba,
}

pub struct TextEngine {
    font_system: FontSystem,
    swash_cache: SwashCache,
    viewport: Viewport,
    atlas: TextAtlas,
    renderer: TextRenderer,
    family: FontFamily,
    metrics: Metrics,
    font: FontMetrics,
    queued: Vec<QueuedText>,
}

impl TextEngine {
    pub fn new(device: &Device, queue: &Queue, format: TextureFormat, spec: &FontSpec) -> Self {
        let mut font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let renderer = TextRenderer::new(&mut atlas, device, MultisampleState::default(), None);

        let metrics = Metrics::new(spec.size, (spec.size * 1.2).ceil());
        let font = probe_metrics(&mut font_system, &spec.family, metrics);
        tracing::info!(
            family = ?spec.family,
            size = spec.size,
            ascent = font.ascent,
            line_height = font.line_height,
            "font loaded"
        );

        Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            renderer,
            family: spec.family.clone(),
            metrics,
            font,
            queued: Vec::new(),
        }
    }

    pub fn metrics(&self) -> FontMetrics {
        self.font
    }

    /// Advance width of `text`, or 0.0 if nothing could be shaped.
    pub fn measure(&mut self, text: &[u8]) -> f32 {
        let buffer = shape(&mut self.font_system, &self.family, self.metrics, text, None);
        buffer.layout_runs().map(|run| run.line_w).sum()
    }

    /// Queue `text` with its baseline at (`x`, `baseline`).
    pub fn queue(&mut self, text: &[u8], x: f32, baseline: f32, color: Rgba) {
        let buffer = shape(
            &mut self.font_system,
            &self.family,
            self.metrics,
            text,
            Some(color),
        );
        self.queued.push(QueuedText {
            buffer,
            left: x,
            top: baseline - self.font.ascent,
            color,
        });
    }

    pub fn clear(&mut self) {
        self.queued.clear();
    }

    /// Draw every queued run into `view` and clear the queue.
    pub fn render(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        view: &TextureView,
        viewport: [u32; 2],
    ) {
        if self.queued.is_empty() {
            return;
        }

        self.viewport.update(
            queue,
            Resolution {
                width: viewport[0],
                height: viewport[1],
            },
        );

        let bounds = TextBounds {
            left: 0,
            top: 0,
            right: viewport[0] as i32,
            bottom: viewport[1] as i32,
        };
        let areas = self.queued.iter().map(|q| TextArea {
            buffer: &q.buffer,
            left: q.left,
            top: q.top,
            scale: 1.0,
            bounds,
            default_color: q.color.to_glyphon(),
            custom_glyphs: &[],
        });

        if let Err(e) = self.renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            areas,
            &mut self.swash_cache,
        ) {
            tracing::warn!("text prepare failed: {e:?}");
            self.queued.clear();
            return;
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("text-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Err(e) = self.renderer.render(&self.atlas, &self.viewport, &mut pass) {
                tracing::warn!("text render failed: {e:?}");
            }
        }

        self.atlas.trim();
        self.queued.clear();
    }
}

/// Status bytes as displayable text. Control bytes become spaces so a
/// stray `\r` or tab cannot start a new line.
fn display_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn shape(
    font_system: &mut FontSystem,
    family: &FontFamily,
    metrics: Metrics,
    text: &[u8],
    color: Option<Rgba>,
) -> GlyphonBuffer {
    let mut attrs = Attrs::new().family(family.to_glyphon());
    if let Some(color) = color {
        attrs = attrs.color(color.to_glyphon());
    }

    let mut buffer = GlyphonBuffer::new(font_system, metrics);
    buffer.set_size(font_system, None, Some(metrics.line_height));
    buffer.set_text(font_system, &display_text(text), &attrs, Shaping::Advanced, None);
    buffer.shape_until_scroll(font_system, false);
    buffer
}

/// Shape a probe line to find where the font puts its baseline.
fn probe_metrics(font_system: &mut FontSystem, family: &FontFamily, metrics: Metrics) -> FontMetrics {
    let buffer = shape(font_system, family, metrics, b"Xg", None);
    buffer
        .layout_runs()
        .next()
        .map(|run| FontMetrics {
            ascent: run.line_y - run.line_top,
            line_height: run.line_height,
        })
        .unwrap_or_else(|| FontMetrics::approximate(metrics.font_size))
}
