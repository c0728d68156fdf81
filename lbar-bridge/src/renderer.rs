//! Colors, the bar palette and frame presentation outcomes.
//!
//! Colors are stored as sRGB-encoded floats in `0.0..=1.0`. glyphon takes
//! them as sRGB bytes; the quad pipeline and clear color need linear values
//! when the surface format is sRGB.

use lbar_core::ColorRole;

// ════════════════════════════════════════════════════════════════════
// Rgba
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_srgb8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse `#rgb`, `#rrggbb` or `#aarrggbb` (alpha first, X11 style).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);

        match hex.len() {
            3 => Some(Self::from_srgb8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
            6 => Some(Self::from_srgb8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Some(Self::from_srgb8(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
            _ => None,
        }
    }

    /// The eight basic X11 color names plus gray.
    pub fn named(name: &str) -> Option<Self> {
        let c = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::rgb(1.0, 0.0, 0.0),
            "green" => Self::rgb(0.0, 1.0, 0.0),
            "blue" => Self::rgb(0.0, 0.0, 1.0),
            "yellow" => Self::rgb(1.0, 1.0, 0.0),
            "cyan" => Self::rgb(0.0, 1.0, 1.0),
            "magenta" => Self::rgb(1.0, 0.0, 1.0),
            "gray" | "grey" => Self::from_srgb8(190, 190, 190, 255),
            _ => return None,
        };
        Some(c)
    }

    /// Clamped, rounded 8-bit sRGB components.
    pub fn to_srgb8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Linear-light components; alpha is passed through.
    pub fn to_linear(self) -> [f32; 4] {
        fn decode(c: f32) -> f32 {
            let c = c.clamp(0.0, 1.0);
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [decode(self.r), decode(self.g), decode(self.b), self.a.clamp(0.0, 1.0)]
    }

    pub fn to_glyphon(self) -> glyphon::Color {
        let [r, g, b, a] = self.to_srgb8();
        glyphon::Color::rgba(r, g, b, a)
    }
}

// ════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════

/// Concrete colors behind the layout's color roles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub foreground: Rgba,
    pub background: Rgba,
    pub underline: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: Rgba::WHITE,
            background: Rgba::BLACK,
            underline: Rgba::WHITE,
        }
    }
}

impl Palette {
    pub fn resolve(&self, role: ColorRole) -> Rgba {
        match role {
            ColorRole::Foreground => self.foreground,
            ColorRole::Underline => self.underline,
        }
    }
}

// ════════════════════════════════════════════════════════════════════
// Frame Presentation
// ════════════════════════════════════════════════════════════════════

/// What became of the last frame handed to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentOutcome {
    #[default]
    Presented,
    /// Surface was lost or outdated and has been reconfigured; the frame was
    /// dropped and must be drawn again.
    Reconfigured,
    /// No texture this time (timeout, occluded window). The compositor sends
    /// another redraw when the window is visible again.
    Skipped,
}

impl PresentOutcome {
    /// Classify a failed `get_current_texture`. Out of memory is fatal.
    pub fn from_surface_error(err: &wgpu::SurfaceError) -> anyhow::Result<Self> {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Ok(Self::Reconfigured),
            wgpu::SurfaceError::OutOfMemory => Err(anyhow::anyhow!("GPU out of memory")),
            _ => Ok(Self::Skipped),
        }
    }

    pub fn needs_redraw(self) -> bool {
        self == Self::Reconfigured
    }
}
