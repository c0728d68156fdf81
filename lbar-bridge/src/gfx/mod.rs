//! GPU rendering.
//!
//! Sub-modules:
//!   renderer — wgpu device/surface lifecycle; implements the core `Renderer`
//!   quad     — solid rectangle pipeline (underlines)
//!   text     — glyphon text shaping, measurement and drawing

mod quad;
mod renderer;
mod text;

pub use renderer::GpuState;
