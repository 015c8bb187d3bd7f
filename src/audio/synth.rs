use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use tracing::debug;

use super::{AnalyserSettings, FrequencyDataSource, SpectrumAnalyser};
use crate::error::SetupError;
use crate::renderer::params::Playback;

/// Chord partials held under the kick (A minor).
const CHORD_HZ: [f32; 3] = [220.0, 261.63, 329.63];
const CHORD_LEVEL: f32 = 0.08;

const KICK_START_HZ: f32 = 180.0;
const KICK_END_HZ: f32 = 50.0;
/// Pitch sweep rate in 1/s.
const KICK_SWEEP: f32 = 35.0;
/// Amplitude decay rate in 1/s.
const KICK_DECAY: f32 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthSettings {
    pub sample_rate: u32,
    pub bpm: f32,
    /// Length of the simulated track; the signal loops after it.
    pub track_secs: f32,
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bpm: 120.0,
            track_secs: 180.0,
        }
    }
}

/// Deterministic stand-in for a music track: a four-on-the-floor kick over a
/// sustained chord.
pub struct SyntheticSignal {
    settings: SynthSettings,
    /// Samples produced since the start of the current loop.
    position: u64,
}

impl SyntheticSignal {
    pub fn new(settings: SynthSettings) -> Self {
        Self {
            settings,
            position: 0,
        }
    }

    fn sample_rate(&self) -> f32 {
        self.settings.sample_rate.max(1) as f32
    }

    fn track_samples(&self) -> u64 {
        ((self.settings.track_secs.max(0.0) * self.sample_rate()) as u64).max(1)
    }

    fn beat_samples(&self) -> u64 {
        let bpm = if self.settings.bpm > 0.0 { self.settings.bpm } else { 120.0 };
        ((self.sample_rate() * 60.0 / bpm) as u64).max(1)
    }

    fn sample_at(&self, index: u64) -> f32 {
        let sr = self.sample_rate();
        let t = index as f32 / sr;

        // phase of an exponential sweep from KICK_START_HZ down to KICK_END_HZ
        let tb = (index % self.beat_samples()) as f32 / sr;
        let sweep = (KICK_START_HZ - KICK_END_HZ) / KICK_SWEEP * (1.0 - (-KICK_SWEEP * tb).exp());
        let kick = (TAU * (KICK_END_HZ * tb + sweep)).sin() * (-KICK_DECAY * tb).exp();

        let chord: f32 = CHORD_HZ.iter().map(|hz| (TAU * hz * t).sin()).sum();

        (0.8 * kick + CHORD_LEVEL * chord).clamp(-1.0, 1.0)
    }

    /// Produce the next `len` mono samples.
    pub fn next_block(&mut self, len: usize) -> Vec<f32> {
        let track = self.track_samples();
        let block = (0..len as u64)
            .map(|i| self.sample_at((self.position + i) % track))
            .collect();
        self.position = (self.position + len as u64) % track;
        block
    }

    pub fn playback(&self) -> Playback {
        Playback {
            position: self.position as f64 / self.sample_rate() as f64,
            duration: self.settings.track_secs as f64,
        }
    }
}

/// A [`SyntheticSignal`] played in real time into a [`SpectrumAnalyser`].
///
/// Every refresh advances the signal by one frame's worth of samples.
pub struct SynthSource {
    analyser: SpectrumAnalyser,
    signal: SyntheticSignal,
    samples_per_frame: usize,
}

impl SynthSource {
    pub fn new(analyser: AnalyserSettings, synth: SynthSettings, fps: u32) -> Self {
        let samples_per_frame = (synth.sample_rate / fps.max(1)).max(1) as usize;
        debug!("Synth source: {} samples per frame at {} bpm", samples_per_frame, synth.bpm);
        Self {
            analyser: SpectrumAnalyser::new(analyser),
            signal: SyntheticSignal::new(synth),
            samples_per_frame,
        }
    }
}

impl FrequencyDataSource for SynthSource {
    fn configure(&mut self, window_size: usize) -> Result<(), SetupError> {
        self.analyser.configure(window_size)
    }

    fn frequency_bin_count(&self) -> usize {
        self.analyser.frequency_bin_count()
    }

    fn refresh(&mut self, buffer: &mut [u8]) {
        let block = self.signal.next_block(self.samples_per_frame);
        self.analyser.push_samples(&block);
        self.analyser.refresh(buffer);
    }

    fn playback(&self) -> Option<Playback> {
        Some(self.signal.playback())
    }
}
