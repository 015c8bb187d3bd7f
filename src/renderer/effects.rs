//! Effect configuration: which geometric passes run, in what order, and
//! every tunable the renderer variants differ by.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::color::RgbColor;
use crate::error::SetupError;

/// Geometric draw passes, in canonical painting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pass {
    BarCircle,
    Bars,
    Waveform,
    CircleWaveform,
    Circles,
    Progress,
    Date,
    PixelEcho,
}

impl Pass {
    pub const ALL: [Pass; 8] = [
        Pass::BarCircle,
        Pass::Bars,
        Pass::Waveform,
        Pass::CircleWaveform,
        Pass::Circles,
        Pass::Progress,
        Pass::Date,
        Pass::PixelEcho,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Pass::BarCircle => "bar-circle",
            Pass::Bars => "bars",
            Pass::Waveform => "waveform",
            Pass::CircleWaveform => "circle-waveform",
            Pass::Circles => "circles",
            Pass::Progress => "progress",
            Pass::Date => "date",
            Pass::PixelEcho => "pixel-echo",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the bounce interpolation factor follows the kick band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BounceUpdate {
    /// Recompute from scratch every frame: `(target - base) / base`.
    #[default]
    Ratio,
    /// Step up by `bounce_step` while the kick is above threshold (saturating
    /// at 1), step down otherwise (saturating at -1).
    Ratchet,
}

/// One of the stacked discs drawn per selected bin by the circles pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleVariant {
    pub color: RgbColor,
    pub scale: f64,
}

/// Named tunings of the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Every pass, ratio bounce, kick band 1..6.
    #[default]
    Classic,
    /// Circular passes only, ratcheting bounce on the lowest bins, heavier trails.
    Pulse,
}

impl Preset {
    pub fn effect_config(self) -> EffectConfig {
        match self {
            Preset::Classic => EffectConfig::default(),
            Preset::Pulse => EffectConfig {
                passes: vec![
                    Pass::BarCircle,
                    Pass::CircleWaveform,
                    Pass::Circles,
                    Pass::Progress,
                    Pass::PixelEcho,
                ],
                background_alpha: 0.3,
                kick_start: 0,
                kick_end: 4,
                bounce_threshold: 200.0,
                bounce_update: BounceUpdate::Ratchet,
                circle_variants: [
                    CircleVariant { color: RgbColor::MAGENTA, scale: 1.0 },
                    CircleVariant { color: RgbColor::MAGENTA, scale: 1.0 },
                    CircleVariant { color: RgbColor::YELLOW, scale: 0.5 },
                ],
                ..EffectConfig::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Analysis window; the renderer reads `window_size / 2` bins.
    pub window_size: usize,
    /// Geometric passes in painting order.
    pub passes: Vec<Pass>,
    /// Radians added to the color rotation each frame.
    pub rotation_delta: f64,
    /// Alpha of the black fade laid over every frame.
    pub background_alpha: f32,
    pub gradient_alpha: f32,

    /// Kick band as a half-open bin range.
    pub kick_start: usize,
    pub kick_end: usize,
    pub bounce_threshold: f64,
    pub bounce_update: BounceUpdate,
    pub bounce_step: f64,

    // Radii and lengths are fractions of half the smaller canvas dimension.
    pub base_radius: f64,
    pub bar_circle_length: f64,
    /// Portion of each angular sector covered by its bar.
    pub bar_circle_fill: f64,
    pub bar_spacing: f64,
    pub bar_height_scale: f64,
    pub bar_alpha: f32,
    pub line_width: f64,
    pub circle_radius: f64,
    pub circle_alpha: f32,
    pub circle_variants: [CircleVariant; 3],
    pub progress_radius: f64,
    pub progress_width: f64,
    pub echo_height: usize,
    pub echo_drop: usize,

    /// Fixed seed for the noise pass; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            window_size: 256,
            passes: Pass::ALL.to_vec(),
            rotation_delta: 0.001,
            background_alpha: 0.2,
            gradient_alpha: 0.1,
            kick_start: 1,
            kick_end: 6,
            bounce_threshold: 220.0,
            bounce_update: BounceUpdate::Ratio,
            bounce_step: 0.05,
            base_radius: 0.35,
            bar_circle_length: 0.5,
            bar_circle_fill: 0.6,
            bar_spacing: 1.0,
            bar_height_scale: 0.5,
            bar_alpha: 1.0,
            line_width: 2.0,
            circle_radius: 0.9,
            circle_alpha: 0.08,
            circle_variants: [
                CircleVariant { color: RgbColor::CYAN, scale: 1.0 },
                CircleVariant { color: RgbColor::CYAN, scale: 0.66 },
                CircleVariant { color: RgbColor::MAGENTA, scale: 0.33 },
            ],
            progress_radius: 0.9,
            progress_width: 4.0,
            echo_height: 4,
            echo_drop: 6,
            seed: None,
        }
    }
}

impl EffectConfig {
    pub fn bin_count(&self) -> usize {
        self.window_size / 2
    }

    pub fn runs(&self, pass: Pass) -> bool {
        self.passes.contains(&pass)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        validate_window_size(self.window_size)?;

        let bins = self.bin_count();
        if self.kick_start >= self.kick_end || self.kick_end > bins {
            return Err(SetupError::InvalidKickRange {
                start: self.kick_start,
                end: self.kick_end,
                bins,
            });
        }

        let mut seen = HashSet::new();
        for pass in &self.passes {
            if !seen.insert(*pass) {
                return Err(SetupError::DuplicatePass(pass.to_string()));
            }
        }
        Ok(())
    }
}

/// Window sizes an analyser accepts: powers of two in 32..=32768.
pub fn validate_window_size(window_size: usize) -> Result<(), SetupError> {
    if window_size.is_power_of_two() && (32..=32768).contains(&window_size) {
        Ok(())
    } else {
        Err(SetupError::InvalidWindowSize(window_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_runs_every_pass_in_order() {
        let config = EffectConfig::default();
        assert_eq!(config.passes, Pass::ALL.to_vec());
        assert_eq!(config.bin_count(), 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn presets_validate() {
        for preset in [Preset::Classic, Preset::Pulse] {
            assert!(preset.effect_config().validate().is_ok(), "{:?}", preset);
        }
        let pulse = Preset::Pulse.effect_config();
        assert_eq!(pulse.bounce_update, BounceUpdate::Ratchet);
        assert!(!pulse.runs(Pass::Bars));
    }

    #[test]
    fn rejects_bad_window_sizes() {
        assert_eq!(validate_window_size(100), Err(SetupError::InvalidWindowSize(100)));
        assert_eq!(validate_window_size(16), Err(SetupError::InvalidWindowSize(16)));
        assert!(validate_window_size(2048).is_ok());
    }

    #[test]
    fn rejects_kick_range_outside_bins() {
        let config = EffectConfig {
            window_size: 32,
            kick_start: 10,
            kick_end: 20,
            ..EffectConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SetupError::InvalidKickRange { start: 10, end: 20, bins: 16 })
        );
    }

    #[test]
    fn rejects_duplicate_pass() {
        let config = EffectConfig {
            passes: vec![Pass::Bars, Pass::Waveform, Pass::Bars],
            ..EffectConfig::default()
        };
        assert_eq!(config.validate(), Err(SetupError::DuplicatePass("bars".into())));
    }

    #[test]
    fn deserializes_partial_toml() {
        let config: EffectConfig = toml::from_str(
            r#"
            passes = ["bar-circle", "pixel-echo"]
            bounce_update = "ratchet"
            kick_end = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.passes, vec![Pass::BarCircle, Pass::PixelEcho]);
        assert_eq!(config.bounce_update, BounceUpdate::Ratchet);
        assert_eq!(config.kick_end, 4);
        assert_eq!(config.window_size, 256);
    }
}
