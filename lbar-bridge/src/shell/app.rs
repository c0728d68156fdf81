//! Bar state and the winit event loop.
//!
//! Threading:
//!   - main thread: winit loop, parsing, layout, GPU work
//!   - tokio runtime: stdin pump, which forwards whole lines through an
//!     `EventLoopProxy`
//!
//! A status line is parsed and laid out as soon as its user event arrives.
//! Redraws paint whatever frame is current, so a burst of lines between two
//! redraws only ever presents the newest one.

use std::sync::Arc;

use anyhow::Context;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId, WindowLevel};

use lbar_core::{Renderer, StatusBar};

use super::layout::{self, FontMetrics, MonitorArea};
use crate::config::BarConfig;
use crate::gfx::GpuState;
use crate::input;
use crate::messages::BarEvent;

// ════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════

pub struct BarApp {
    config: BarConfig,

    // ── Window + GPU ──
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,

    // ── Status ──
    bar: StatusBar,
    /// Newest line received before the GPU was ready.
    pending: Option<Vec<u8>>,
    input_closed: bool,

    /// Fatal error that stopped the loop.
    failure: Option<anyhow::Error>,
}

impl BarApp {
    pub fn new(config: BarConfig) -> Self {
        let engine = config.layout_engine(FontMetrics::approximate(config.font.size));
        let bar = StatusBar::new(config.parser(), engine);

        Self {
            config,
            window: None,
            gpu: None,
            bar,
            pending: None,
            input_closed: false,
            failure: None,
        }
    }

    pub fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Parse and lay out a new status line.
    fn apply_status(&mut self, line: Vec<u8>) {
        let Some(gpu) = self.gpu.as_mut() else {
            self.pending = Some(line);
            return;
        };

        let width = gpu.width() as f32;
        if self
            .bar
            .update(&line, |text| gpu.measure_width(text), width)
            .is_ok()
        {
            self.request_redraw();
        }
    }

    pub(super) fn resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(size);
        }
        self.relayout();
    }

    /// Lay the current status out again at the surface's width.
    fn relayout(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let width = gpu.width() as f32;
        self.bar.relayout(|text| gpu.measure_width(text), width);
    }

    /// Paint the current frame. A frame dropped while the surface was being
    /// reconfigured is scheduled again, since the loop otherwise stays idle
    /// until the next status line.
    pub(super) fn redraw(&mut self) -> anyhow::Result<()> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };
        lbar_core::paint(self.bar.status(), self.bar.frame(), gpu)?;

        if gpu.last_present().needs_redraw() {
            self.request_redraw();
        }
        Ok(())
    }

    pub(super) fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    /// The error that ended the loop, if any.
    pub fn into_result(self) -> anyhow::Result<()> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// ════════════════════════════════════════════════════════════════════
// Window Creation
// ════════════════════════════════════════════════════════════════════

fn monitor_area(event_loop: &ActiveEventLoop) -> MonitorArea {
    event_loop
        .primary_monitor()
        .or_else(|| event_loop.available_monitors().next())
        .map(|m| {
            let pos = m.position();
            let size = m.size();
            MonitorArea {
                x: pos.x,
                y: pos.y,
                width: size.width,
                height: size.height,
            }
        })
        .unwrap_or_else(|| {
            tracing::warn!("no monitor reported; using a fallback size");
            MonitorArea::FALLBACK
        })
}

impl BarApp {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let monitor = monitor_area(event_loop);
        let rect = layout::dock_rect(monitor, self.config.dock, self.config.height);

        let attrs = Window::default_attributes()
            .with_title("lbar")
            .with_inner_size(PhysicalSize::new(rect.width, rect.height))
            .with_position(PhysicalPosition::new(rect.x, rect.y))
            .with_decorations(false)
            .with_resizable(false)
            .with_window_level(WindowLevel::AlwaysOnTop);

        #[cfg(target_os = "linux")]
        let attrs = {
            use winit::platform::x11::{WindowAttributesExtX11, WindowType};
            attrs
                .with_x11_window_type(vec![WindowType::Dock])
                .with_override_redirect(true)
        };

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create bar window")?,
        );
        tracing::info!(
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            dock = ?self.config.dock,
            "bar window created"
        );

        let gpu = GpuState::new(window.clone(), &self.config.font, self.config.palette)?;
        self.bar
            .set_layout_engine(self.config.layout_engine(gpu.font_metrics()));

        self.window = Some(window);
        self.gpu = Some(gpu);

        match self.pending.take() {
            Some(line) => self.apply_status(line),
            None => self.relayout(),
        }
        self.request_redraw();
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════
// ApplicationHandler
// ════════════════════════════════════════════════════════════════════

impl ApplicationHandler<BarEvent> for BarApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: BarEvent) {
        match event {
            BarEvent::Status(line) => self.apply_status(line),
            BarEvent::InputClosed => {
                if !self.input_closed {
                    self.input_closed = true;
                    tracing::info!("input closed; keeping the last status on screen");
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        super::events::handle_window_event(self, event_loop, event);
    }
}

// ════════════════════════════════════════════════════════════════════
// Entry Point
// ════════════════════════════════════════════════════════════════════

/// Run the bar until its window closes or a fatal error occurs.
pub fn run(config: BarConfig) -> anyhow::Result<()> {
    // Tracing is initialized once in the binary entry point (src/main.rs).
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "lbar starting");

    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;

    let event_loop = EventLoop::<BarEvent>::with_user_event()
        .build()
        .context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let _pump = input::spawn_stdin_pump(
        rt.handle(),
        event_loop.create_proxy(),
        config.accumulator(),
    );

    let mut app = BarApp::new(config);
    event_loop.run_app(&mut app)?;

    // The stdin read may still be blocked; don't wait for it.
    rt.shutdown_background();

    app.into_result()
}
