//! Layered frame renderer
//!
//! Every frame is painted onto an owned RGBA [`Canvas`] in a fixed order: a
//! translucent fade, an optional gradient wash, the geometric passes in
//! [`EffectConfig::passes`] order, then the whole-frame pixel passes.
//! Output backends read the canvas bytes after [`FrameRenderer::render_frame`].

pub mod bounce;
pub mod canvas;
mod draw;
pub mod effects;
pub mod frame;
pub mod layout;
pub mod params;
pub mod passes;
pub mod pixel;
pub mod text;

pub use canvas::{Canvas, ImageData};
pub use effects::{BounceUpdate, CircleVariant, EffectConfig, Pass, Preset};
pub use frame::{AnimationState, FrameRenderer};
pub use params::{Effect, Playback, RenderParameters};
