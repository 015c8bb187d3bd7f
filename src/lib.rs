pub mod audio;
pub mod cli;
pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod renderer;

pub use cli::Args;
pub use config::Config;
pub use error::{ConfigError, ParamError, SetupError};
pub use renderer::{EffectConfig, FrameRenderer, RenderParameters};
