//! Command-line configuration.
//!
//! Flags follow the classic lbar/dzen set (`-b -f -F -B -H`), plus an
//! underline color and the two capacity limits. Everything is validated
//! here so the shell never sees a half-formed config.

use clap::{ArgAction, Parser};
use thiserror::Error;

use lbar_core::{
    DEFAULT_LANE_CAPACITY, DEFAULT_LINE_CAPACITY, DEFAULT_SENTINEL, LayoutEngine, LineAccumulator,
    StatusParser,
};

use crate::renderer::{Palette, Rgba};
use crate::shell::layout::{self, FontMetrics};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid color {0:?}: expected #rgb, #rrggbb, #aarrggbb or a color name")]
    Color(String),

    #[error("invalid font {0:?}: expected family[:size=N]")]
    Font(String),

    #[error("invalid font size {0:?}: expected a positive number")]
    FontSize(String),

    #[error("{0:?} is not a positive integer")]
    NotPositive(String),

    #[error("underline height {underline}px does not fit a {height}px bar")]
    UnderlineTooTall { underline: u32, height: u32 },
}

// ════════════════════════════════════════════════════════════════════
// Cli
// ════════════════════════════════════════════════════════════════════

/// Status bar that draws markup read from stdin.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lbar",
    version,
    about = "Status bar fed by stdin",
    long_about = "Reads status lines from stdin and draws them in a docked bar.\n\n\
                  Inline directives: &L, &C and &R switch to the left, center and \
                  right lane; &U toggles underline."
)]
pub struct Cli {
    /// Dock at the bottom of the screen instead of the top.
    #[arg(short = 'b', long)]
    pub bottom: bool,

    /// Font as family[:size=N]; family is monospace, sans-serif, serif or a name.
    #[arg(short = 'f', long, value_name = "SPEC", default_value = "monospace:size=12", value_parser = FontSpec::parse)]
    pub font: FontSpec,

    /// Text color.
    #[arg(short = 'F', long, value_name = "COLOR", default_value = "#ffffff", value_parser = parse_color)]
    pub foreground: Rgba,

    /// Bar background color.
    #[arg(short = 'B', long, value_name = "COLOR", default_value = "#000000", value_parser = parse_color)]
    pub background: Rgba,

    /// Underline color [default: the foreground color].
    #[arg(short = 'U', long, value_name = "COLOR", value_parser = parse_color)]
    pub underline: Option<Rgba>,

    /// Bar height in pixels.
    #[arg(short = 'H', long, value_name = "PX", default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Underline thickness in pixels.
    #[arg(long, value_name = "PX", default_value_t = 2)]
    pub underline_height: u32,

    /// Longest accepted status line; longer lines are truncated.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_LINE_CAPACITY, value_parser = parse_positive)]
    pub max_line: usize,

    /// Most blocks a single lane may hold; lines with more are dropped.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_LANE_CAPACITY, value_parser = parse_positive)]
    pub max_blocks: usize,

    /// Raise log verbosity (-v, -vv). RUST_LOG takes precedence.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn parse_color(s: &str) -> Result<Rgba, ConfigError> {
    let s = s.trim();
    Rgba::from_hex(s)
        .or_else(|| Rgba::named(s))
        .ok_or_else(|| ConfigError::Color(s.to_string()))
}

fn parse_positive(s: &str) -> Result<usize, ConfigError> {
    match s.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::NotPositive(s.to_string())),
    }
}

// ════════════════════════════════════════════════════════════════════
// Font
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontFamily {
    Monospace,
    SansSerif,
    Serif,
    Named(String),
}

impl FontFamily {
    fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "" | "mono" | "monospace" => FontFamily::Monospace,
            "sans" | "sans-serif" | "sansserif" => FontFamily::SansSerif,
            "serif" => FontFamily::Serif,
            _ => FontFamily::Named(name.to_string()),
        }
    }

    pub fn to_glyphon(&self) -> glyphon::Family<'_> {
        match self {
            FontFamily::Monospace => glyphon::Family::Monospace,
            FontFamily::SansSerif => glyphon::Family::SansSerif,
            FontFamily::Serif => glyphon::Family::Serif,
            FontFamily::Named(name) => glyphon::Family::Name(name),
        }
    }
}

/// A fontconfig-style spec: `family[:key=value...]`.
///
/// Only `size` and `pixelsize` are read; other properties are accepted and
/// ignored so existing font strings keep working.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: FontFamily,
    /// Pixel size.
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: FontFamily::Monospace,
            size: 12.0,
        }
    }
}

impl FontSpec {
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let mut parts = spec.trim().split(':');
        let family = FontFamily::parse(parts.next().unwrap_or_default().trim());
        let mut size = FontSpec::default().size;

        for prop in parts.map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, value)) = prop.split_once('=') else {
                continue;
            };
            match key.trim() {
                "size" | "pixelsize" => {
                    size = match value.trim().parse::<f32>() {
                        Ok(v) if v.is_finite() && v > 0.0 => v,
                        _ => return Err(ConfigError::FontSize(value.to_string())),
                    };
                }
                "" => return Err(ConfigError::Font(spec.to_string())),
                _ => {}
            }
        }

        Ok(Self { family, size })
    }
}

// ════════════════════════════════════════════════════════════════════
// BarConfig
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dock {
    Top,
    Bottom,
}

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BarConfig {
    pub dock: Dock,
    pub height: u32,
    pub underline_height: u32,
    pub font: FontSpec,
    pub palette: Palette,
    pub max_line: usize,
    pub max_blocks: usize,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            dock: Dock::Top,
            height: 20,
            underline_height: 2,
            font: FontSpec::default(),
            palette: Palette::default(),
            max_line: DEFAULT_LINE_CAPACITY,
            max_blocks: DEFAULT_LANE_CAPACITY,
        }
    }
}

impl TryFrom<Cli> for BarConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.underline_height > cli.height {
            return Err(ConfigError::UnderlineTooTall {
                underline: cli.underline_height,
                height: cli.height,
            });
        }

        Ok(Self {
            dock: if cli.bottom { Dock::Bottom } else { Dock::Top },
            height: cli.height,
            underline_height: cli.underline_height,
            font: cli.font,
            palette: Palette {
                foreground: cli.foreground,
                background: cli.background,
                underline: cli.underline.unwrap_or(cli.foreground),
            },
            max_line: cli.max_line,
            max_blocks: cli.max_blocks,
        })
    }
}

impl BarConfig {
    pub fn parser(&self) -> StatusParser {
        StatusParser::new(DEFAULT_SENTINEL, self.max_blocks)
    }

    pub fn accumulator(&self) -> LineAccumulator {
        LineAccumulator::new(self.max_line)
    }

    /// Layout geometry for this bar given the active font's metrics.
    pub fn layout_engine(&self, font: FontMetrics) -> LayoutEngine {
        layout::layout_engine(self.height, self.underline_height, font)
    }
}
