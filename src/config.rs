use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::audio::{AnalyserSettings, SynthSettings};
use crate::cli::Args;
use crate::display::DisplayMode;
use crate::error::ConfigError;
use crate::renderer::{Effect, EffectConfig, RenderParameters};

/// What feeds the analyser.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, ValueEnum, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// Built-in kick and chord loop
    #[default]
    Synth,
    /// No input; the analyser reports zeros
    Silence,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub audio: AudioConfig,
    pub effects: EffectConfig,
    pub params: RenderParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    pub fps: u32,
    /// Canvas size; the terminal preview scales it to the window.
    pub width: usize,
    pub height: usize,
    /// Frames rendered before headless mode exits.
    pub frames: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Terminal,
            fps: 60,
            width: 320,
            height: 180,
            frames: 600,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub signal: SignalKind,
    pub analyser: AnalyserSettings,
    pub synth: SynthSettings,
}

/// Effects switched on when the config does not say otherwise.
const DEFAULT_EFFECTS: [Effect; 6] = [
    Effect::Gradient,
    Effect::BarCircle,
    Effect::Bounce,
    Effect::Waveform,
    Effect::Circles,
    Effect::Progress,
];

const DEFAULT_WAVEFORM_HEIGHT: f32 = 60.0;

impl Config {
    /// Flags used for a fresh config: a handful of geometric passes over a gradient.
    pub fn default_params() -> RenderParameters {
        let mut params = RenderParameters {
            waveform_height: DEFAULT_WAVEFORM_HEIGHT,
            ..RenderParameters::default()
        };
        for effect in DEFAULT_EFFECTS {
            params.set(effect, true);
        }
        params
    }

    /// Built-in configuration: defaults everywhere plus the default effect set.
    pub fn builtin() -> Self {
        Self {
            params: Self::default_params(),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the default XDG config path (~/.config/beatcanvas/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("beatcanvas").join("config.toml"))
    }

    /// Load config from the default XDG path if it exists.
    /// Returns None if the file doesn't exist; parse errors are logged and ignored.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            return None;
        }
        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("{}: {}. Using defaults.", e, error_source(&e));
                None
            }
        }
    }

    /// Write the config template to the XDG path, returning the path.
    pub fn init_default_config() -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, Self::generate_config_template()).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r#"# BeatCanvas Configuration
# This file is auto-generated. Edit as needed.

[display]
# Output: "terminal" (half-block preview) or "headless"
mode = "terminal"
# Frames per second
fps = 60
# Canvas size in pixels
width = 320
height = 180
# Frames rendered before headless mode exits
frames = 600

[audio]
# Signal fed to the analyser: "synth" or "silence"
signal = "synth"

[audio.analyser]
# Weight of the previous frame (0.0-1.0, higher = smoother)
smoothing = 0.8
# Decibel range mapped onto 0-255
min_decibels = -100.0
max_decibels = -30.0

[audio.synth]
sample_rate = 44100
bpm = 120.0
# The synthetic track loops after this many seconds
track_secs = 180.0

[effects]
# Analysis window: power of two between 32 and 32768 (bins = window / 2)
window_size = 256
# Geometric passes in painting order. Omitting a pass disables it entirely.
passes = ["bar-circle", "bars", "waveform", "circle-waveform", "circles", "progress", "date", "pixel-echo"]
# Radians added to the color rotation every frame
rotation_delta = 0.001
# Alpha of the black fade over the previous frame
background_alpha = 0.2
gradient_alpha = 0.1
# Kick band (bins kick_start..kick_end) and the average that triggers a bounce
kick_start = 1
kick_end = 6
bounce_threshold = 220.0
# Bounce interpolation: "ratio" or "ratchet"
bounce_update = "ratio"
# Ratchet step per frame
bounce_step = 0.05
# Radii and lengths as fractions of half the smaller canvas side
base_radius = 0.35
bar_circle_length = 0.5
bar_circle_fill = 0.6
bar_spacing = 1.0
bar_height_scale = 0.5
bar_alpha = 1.0
line_width = 2.0
circle_radius = 0.9
circle_alpha = 0.08
circle_variants = [
    { color = { r = 0, g = 255, b = 255 }, scale = 1.0 },
    { color = { r = 0, g = 255, b = 255 }, scale = 0.66 },
    { color = { r = 255, g = 0, b = 255 }, scale = 0.33 },
]
progress_radius = 0.9
progress_width = 4.0
# Pixel echo slice height and how far it drops
echo_height = 4
echo_drop = 6
# Fixed seed for the noise effect (random when unset)
# seed = 42

[params]
# Effect toggles. Pixel effects (emboss, noise, invert, grayscale, sepia)
# run over the finished frame.
show_gradient = true
show_bar_circle = true
show_bounce = true
show_bars = false
show_waveform = true
show_circle_waveform = false
show_circles = true
show_progress = true
show_date = false
show_pixels = false
show_emboss = false
show_noise = false
show_invert = false
show_grayscale = false
show_sepia = false
# Height of the waveform band in pixels (0 hides the waveforms)
waveform_height = 60.0
"#
        .to_string()
    }

    /// Merge CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &Args) -> Result<(), ConfigError> {
        if let Some(mode) = args.mode {
            self.display.mode = mode;
        }
        if let Some(width) = args.width {
            self.display.width = width;
        }
        if let Some(height) = args.height {
            self.display.height = height;
        }
        if let Some(frames) = args.frames {
            self.display.frames = frames;
        }
        if let Some(fps) = args.fps {
            self.display.fps = fps.max(1);
        }

        // A preset replaces the whole effect tuning but keeps the seed.
        if let Some(preset) = args.preset {
            let seed = self.effects.seed;
            self.effects = preset.effect_config();
            self.effects.seed = seed;
        }
        if let Some(seed) = args.seed {
            self.effects.seed = Some(seed);
        }

        if let Some(ref names) = args.effects {
            for effect in Effect::ALL {
                self.params.set(effect, false);
            }
            for name in names.iter().filter(|n| !n.trim().is_empty()) {
                self.params.set_by_name(name, true)?;
            }
        }
        Ok(())
    }
}

fn error_source(e: &ConfigError) -> String {
    std::error::Error::source(e)
        .map(|s| s.to_string())
        .unwrap_or_default()
}
