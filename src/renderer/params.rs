//! Per-frame render parameters supplied by the caller.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParamError;

/// Every toggle the renderer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Gradient,
    BarCircle,
    Bounce,
    Bars,
    Waveform,
    CircleWaveform,
    Circles,
    Progress,
    Date,
    Pixels,
    Emboss,
    Noise,
    Invert,
    Grayscale,
    Sepia,
}

impl Effect {
    pub const ALL: [Effect; 15] = [
        Effect::Gradient,
        Effect::BarCircle,
        Effect::Bounce,
        Effect::Bars,
        Effect::Waveform,
        Effect::CircleWaveform,
        Effect::Circles,
        Effect::Progress,
        Effect::Date,
        Effect::Pixels,
        Effect::Emboss,
        Effect::Noise,
        Effect::Invert,
        Effect::Grayscale,
        Effect::Sepia,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Effect::Gradient => "gradient",
            Effect::BarCircle => "bar-circle",
            Effect::Bounce => "bounce",
            Effect::Bars => "bars",
            Effect::Waveform => "waveform",
            Effect::CircleWaveform => "circle-waveform",
            Effect::Circles => "circles",
            Effect::Progress => "progress",
            Effect::Date => "date",
            Effect::Pixels => "pixels",
            Effect::Emboss => "emboss",
            Effect::Noise => "noise",
            Effect::Invert => "invert",
            Effect::Grayscale => "grayscale",
            Effect::Sepia => "sepia",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Effect {
    type Err = ParamError;

    /// Accepts `bar-circle`, `bar_circle`, `showBarCircle` and similar spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        let key = folded.strip_prefix("show").unwrap_or(&folded);

        Effect::ALL
            .iter()
            .copied()
            .find(|effect| effect.name().replace('-', "") == key)
            .ok_or_else(|| ParamError::UnknownEffect(s.to_string()))
    }
}

/// Playback clock for the progress ring.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Playback {
    pub position: f64,
    pub duration: f64,
}

impl Playback {
    /// Played fraction in 0.0..=1.0; zero when the duration is unknown or not positive.
    pub fn fraction(&self) -> f64 {
        if self.duration > 0.0 && self.duration.is_finite() {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParameters {
    pub show_gradient: bool,
    pub show_bar_circle: bool,
    pub show_bounce: bool,
    pub show_bars: bool,
    pub show_waveform: bool,
    pub show_circle_waveform: bool,
    pub show_circles: bool,
    pub show_progress: bool,
    pub show_date: bool,
    pub show_pixels: bool,
    pub show_emboss: bool,
    pub show_noise: bool,
    pub show_invert: bool,
    pub show_grayscale: bool,
    pub show_sepia: bool,
    /// Height in pixels of the band the waveform passes draw into.
    pub waveform_height: f32,
    #[serde(skip)]
    pub playback: Option<Playback>,
    /// Wall clock for the date pass; the local time is used when absent.
    #[serde(skip)]
    pub timestamp: Option<NaiveDateTime>,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            show_gradient: false,
            show_bar_circle: false,
            show_bounce: false,
            show_bars: false,
            show_waveform: false,
            show_circle_waveform: false,
            show_circles: false,
            show_progress: false,
            show_date: false,
            show_pixels: false,
            show_emboss: false,
            show_noise: false,
            show_invert: false,
            show_grayscale: false,
            show_sepia: false,
            waveform_height: 0.0,
            playback: None,
            timestamp: None,
        }
    }
}

impl RenderParameters {
    /// Enable exactly the named effects.
    pub fn from_names<I, S>(names: I) -> Result<Self, ParamError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = Self::default();
        for name in names {
            params.set_by_name(name.as_ref(), true)?;
        }
        Ok(params)
    }

    fn flag_mut(&mut self, effect: Effect) -> &mut bool {
        match effect {
            Effect::Gradient => &mut self.show_gradient,
            Effect::BarCircle => &mut self.show_bar_circle,
            Effect::Bounce => &mut self.show_bounce,
            Effect::Bars => &mut self.show_bars,
            Effect::Waveform => &mut self.show_waveform,
            Effect::CircleWaveform => &mut self.show_circle_waveform,
            Effect::Circles => &mut self.show_circles,
            Effect::Progress => &mut self.show_progress,
            Effect::Date => &mut self.show_date,
            Effect::Pixels => &mut self.show_pixels,
            Effect::Emboss => &mut self.show_emboss,
            Effect::Noise => &mut self.show_noise,
            Effect::Invert => &mut self.show_invert,
            Effect::Grayscale => &mut self.show_grayscale,
            Effect::Sepia => &mut self.show_sepia,
        }
    }

    pub fn is_enabled(&self, effect: Effect) -> bool {
        match effect {
            Effect::Gradient => self.show_gradient,
            Effect::BarCircle => self.show_bar_circle,
            Effect::Bounce => self.show_bounce,
            Effect::Bars => self.show_bars,
            Effect::Waveform => self.show_waveform,
            Effect::CircleWaveform => self.show_circle_waveform,
            Effect::Circles => self.show_circles,
            Effect::Progress => self.show_progress,
            Effect::Date => self.show_date,
            Effect::Pixels => self.show_pixels,
            Effect::Emboss => self.show_emboss,
            Effect::Noise => self.show_noise,
            Effect::Invert => self.show_invert,
            Effect::Grayscale => self.show_grayscale,
            Effect::Sepia => self.show_sepia,
        }
    }

    pub fn set(&mut self, effect: Effect, enabled: bool) {
        *self.flag_mut(effect) = enabled;
    }

    pub fn toggle(&mut self, effect: Effect) -> bool {
        let flag = self.flag_mut(effect);
        *flag = !*flag;
        *flag
    }

    pub fn set_by_name(&mut self, name: &str, enabled: bool) -> Result<(), ParamError> {
        let effect: Effect = name.parse()?;
        self.set(effect, enabled);
        Ok(())
    }

    pub fn enabled(&self) -> Vec<Effect> {
        Effect::ALL
            .iter()
            .copied()
            .filter(|e| self.is_enabled(*e))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_parameters_disable_everything() {
        let params = RenderParameters::default();
        assert!(params.enabled().is_empty());
        let parsed: RenderParameters = toml::from_str("").unwrap();
        assert_eq!(parsed, params);
    }

    #[test]
    fn parses_effect_spellings() {
        assert_eq!("bar-circle".parse::<Effect>(), Ok(Effect::BarCircle));
        assert_eq!("bar_circle".parse::<Effect>(), Ok(Effect::BarCircle));
        assert_eq!("showBarCircle".parse::<Effect>(), Ok(Effect::BarCircle));
        assert_eq!("CircleWaveform".parse::<Effect>(), Ok(Effect::CircleWaveform));
        assert_eq!(
            "sparkles".parse::<Effect>(),
            Err(ParamError::UnknownEffect("sparkles".into()))
        );
    }

    #[test]
    fn every_effect_name_round_trips() {
        for effect in Effect::ALL {
            assert_eq!(effect.name().parse::<Effect>(), Ok(effect));
        }
    }

    #[test]
    fn from_names_sets_flags() {
        let params = RenderParameters::from_names(["bars", "sepia"]).unwrap();
        assert!(params.show_bars);
        assert!(params.show_sepia);
        assert_eq!(params.enabled(), vec![Effect::Bars, Effect::Sepia]);
        assert!(RenderParameters::from_names(["nope"]).is_err());
    }

    #[test]
    fn toggle_flips_flag() {
        let mut params = RenderParameters::default();
        assert!(params.toggle(Effect::Noise));
        assert!(!params.toggle(Effect::Noise));
    }

    #[test]
    fn playback_fraction_guards_zero_duration() {
        assert_eq!(Playback { position: 5.0, duration: 0.0 }.fraction(), 0.0);
        assert_eq!(Playback { position: 5.0, duration: -1.0 }.fraction(), 0.0);
        assert_eq!(Playback { position: 5.0, duration: f64::NAN }.fraction(), 0.0);
        assert_eq!(Playback { position: 5.0, duration: 20.0 }.fraction(), 0.25);
        assert_eq!(Playback { position: 30.0, duration: 20.0 }.fraction(), 1.0);
    }
}
