//! Winit window event handling.

use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;

use super::app::BarApp;

pub fn handle_window_event(app: &mut BarApp, event_loop: &ActiveEventLoop, event: WindowEvent) {
    match event {
        // ── Window lifecycle ──────────────────────────────────────
        WindowEvent::CloseRequested => {
            tracing::info!("window close requested");
            event_loop.exit();
        }

        WindowEvent::Destroyed => {
            tracing::info!("window destroyed");
            event_loop.exit();
        }

        // ── Geometry ─────────────────────────────────────────────
        WindowEvent::Resized(new_size) => {
            tracing::debug!(width = new_size.width, height = new_size.height, "resized");
            app.resize(new_size);
            app.request_redraw();
        }

        WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
            // The matching Resized follows; physical pixels are all we use.
            tracing::debug!(scale_factor, "scale factor changed");
        }

        // ── Paint ────────────────────────────────────────────────
        WindowEvent::RedrawRequested => {
            if let Err(e) = app.redraw() {
                app.fail(event_loop, e);
            }
        }

        _ => {}
    }
}
