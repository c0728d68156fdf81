//! Bar geometry.
//!
//! Where the window sits on its monitor, and where the text baseline and
//! underline sit inside the bar. All values are physical pixels.

use lbar_core::{LayoutEngine, UnderlineGeometry};

use crate::config::Dock;

/// Vertical metrics of one line of the active font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Distance from the top of the line box to the baseline.
    pub ascent: f32,
    pub line_height: f32,
}

impl FontMetrics {
    /// Rough metrics for a pixel size, used until the GPU font system has
    /// shaped a probe line.
    pub fn approximate(size: f32) -> Self {
        Self {
            ascent: size * 0.9,
            line_height: size * 1.2,
        }
    }
}

/// Window rectangle on the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// The monitor the bar spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorArea {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl MonitorArea {
    /// Used when the platform reports no monitor at all.
    pub const FALLBACK: MonitorArea = MonitorArea {
        x: 0,
        y: 0,
        width: 1024,
        height: 768,
    };
}

/// Full monitor width, docked to its top or bottom edge.
pub fn dock_rect(monitor: MonitorArea, dock: Dock, height: u32) -> BarRect {
    let height = height.min(monitor.height).max(1);
    let y = match dock {
        Dock::Top => monitor.y,
        Dock::Bottom => monitor.y + monitor.height.saturating_sub(height) as i32,
    };

    BarRect {
        x: monitor.x,
        y,
        width: monitor.width,
        height,
    }
}

/// Baseline such that the font's line box is centered in the bar.
pub fn baseline(bar_height: u32, font: FontMetrics) -> f32 {
    ((bar_height as f32 - font.line_height) / 2.0 + font.ascent).round()
}

/// Underline flush with the bottom edge of the bar.
pub fn underline(bar_height: u32, thickness: u32) -> UnderlineGeometry {
    let thickness = thickness.min(bar_height);
    UnderlineGeometry {
        y: (bar_height - thickness) as f32,
        height: thickness as f32,
    }
}

pub fn layout_engine(bar_height: u32, underline_height: u32, font: FontMetrics) -> LayoutEngine {
    LayoutEngine::new(
        baseline(bar_height, font),
        underline(bar_height, underline_height),
    )
}
