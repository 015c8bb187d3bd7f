pub mod headless;
pub mod terminal;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::audio::{FrequencyDataSource, SpectrumAnalyser, SynthSource};
use crate::config::{Config, SignalKind};
use crate::error::SetupError;
use crate::renderer::{Canvas, FrameRenderer, RenderParameters};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Terminal,
    Headless,
}

pub type DynRenderer = FrameRenderer<Box<dyn FrequencyDataSource>>;

/// Wire the configured signal and canvas into a renderer.
pub fn build_renderer(config: &Config) -> Result<DynRenderer, SetupError> {
    let source: Box<dyn FrequencyDataSource> = match config.audio.signal {
        SignalKind::Synth => Box::new(SynthSource::new(
            config.audio.analyser,
            config.audio.synth,
            config.display.fps,
        )),
        SignalKind::Silence => Box::new(SpectrumAnalyser::new(config.audio.analyser)),
    };
    let canvas = Canvas::new(config.display.width, config.display.height);
    FrameRenderer::initialize(canvas, source, config.effects.clone())
}

/// Parameters for the next frame: the caller's flags plus the source's playback clock.
pub fn frame_params(base: &RenderParameters, renderer: &DynRenderer) -> RenderParameters {
    RenderParameters {
        playback: base.playback.or_else(|| renderer.source().playback()),
        ..base.clone()
    }
}
