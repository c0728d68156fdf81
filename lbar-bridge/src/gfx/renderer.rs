//! wgpu device/surface lifecycle and the core `Renderer` implementation.
//!
//! GpuState owns the device, queue and surface. Draw calls from a frame
//! replay are queued into the quad and text pipelines; `present_frame`
//! clears to the background color, draws quads, then text on top.

use std::sync::Arc;

use anyhow::Context;
use lbar_core::{ColorRole, Lane, Renderer};
use wgpu::{
    Backends, Device, DeviceDescriptor, Instance, InstanceDescriptor, PowerPreference, Queue,
    RequestAdapterOptions, Surface, SurfaceConfiguration, TextureFormat, TextureUsages,
    TextureViewDescriptor,
};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::quad::{QuadInstance, QuadPipeline};
use super::text::TextEngine;
use crate::config::FontSpec;
use crate::renderer::{Palette, PresentOutcome, Rgba};
use crate::shell::layout::FontMetrics;

/// Owns all GPU state. Created once per window.
pub struct GpuState {
    surface: Surface<'static>,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    format: TextureFormat,
    palette: Palette,
    last_present: PresentOutcome,

    quads: QuadPipeline,
    text: TextEngine,
}

impl GpuState {
    /// Initialize wgpu for `window`. Blocks until the adapter and device are ready.
    pub fn new(window: Arc<Window>, font: &FontSpec, palette: Palette) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = Instance::new(&InstanceDescriptor {
            backends: Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create window surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
            power_preference: PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter found")?;

        let info = adapter.get_info();
        tracing::info!(adapter = %info.name, backend = ?info.backend, "GPU adapter selected");

        let (device, queue) = pollster::block_on(adapter.request_device(&DeviceDescriptor {
            label: Some("lbar-device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                .using_resolution(adapter.limits()),
            ..Default::default()
        }))
        .context("failed to open GPU device")?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("surface reports no texture formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let quads = QuadPipeline::new(&device, format);
        let text = TextEngine::new(&device, &queue, format, font);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            format,
            palette,
            last_present: PresentOutcome::Presented,
            quads,
            text,
        })
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn font_metrics(&self) -> FontMetrics {
        self.text.metrics()
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn clear_color(&self) -> wgpu::Color {
        let bg = self.palette.background;
        let [r, g, b, a] = if self.format.is_srgb() {
            bg.to_linear()
        } else {
            [bg.r, bg.g, bg.b, bg.a]
        };
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }

    /// Outcome of the most recent `present_frame`.
    pub fn last_present(&self) -> PresentOutcome {
        self.last_present
    }

    /// Encode and present everything queued since the last frame, then
    /// clear the queues.
    pub fn present(&mut self) -> anyhow::Result<PresentOutcome> {
        let outcome = self.render_frame();
        self.quads.clear();
        self.text.clear();
        outcome
    }

    fn render_frame(&mut self) -> anyhow::Result<PresentOutcome> {
        let output = match self.surface.get_current_texture() {
            Ok(tex) => tex,
            Err(e) => {
                let outcome = PresentOutcome::from_surface_error(&e)?;
                if outcome == PresentOutcome::Reconfigured {
                    tracing::warn!("surface {e}; reconfiguring");
                    self.surface.configure(&self.device, &self.config);
                } else {
                    tracing::debug!("surface unavailable: {e}");
                }
                return Ok(outcome);
            }
        };

        let view = output
            .texture
            .create_view(&TextureViewDescriptor::default());
        let viewport = [self.config.width, self.config.height];

        self.quads.prepare(&self.device, &self.queue, viewport);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("bar-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            self.quads.render(&mut pass);
        }

        self.text
            .render(&self.device, &self.queue, &mut encoder, &view, viewport);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(PresentOutcome::Presented)
    }
}

impl Renderer for GpuState {
    fn measure_width(&mut self, text: &[u8]) -> f32 {
        self.text.measure(text)
    }

    fn draw_text(&mut self, text: &[u8], x: f32, y: f32, color: ColorRole, _lane: Lane) {
        let color = self.palette.resolve(color);
        self.text.queue(text, x, y, color);
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: ColorRole) {
        let color: Rgba = self.palette.resolve(color);
        self.quads.push(QuadInstance { x, y, w, h, color });
    }

    fn present_frame(&mut self) -> anyhow::Result<()> {
        self.last_present = self.present()?;
        if self.last_present != PresentOutcome::Presented {
            tracing::debug!(outcome = ?self.last_present, "frame not presented");
        }
        Ok(())
    }
}
