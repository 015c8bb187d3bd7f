use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::FrequencyDataSource;
use crate::error::SetupError;
use crate::renderer::effects::validate_window_size;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyserSettings {
    /// Weight of the previous frame's magnitude (0.0 = no smoothing).
    pub smoothing: f32,
    /// Decibel level mapped to byte 0.
    pub min_decibels: f32,
    /// Decibel level mapped to byte 255.
    pub max_decibels: f32,
}

impl Default for AnalyserSettings {
    fn default() -> Self {
        Self {
            smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

/// Byte-quantised spectrum of the most recent window of samples.
///
/// Samples are pushed in as they are produced; each [`refresh`] windows the
/// latest `fft_size` of them (Blackman), transforms, smooths against the
/// previous snapshot and maps decibels linearly onto 0..=255.
///
/// [`refresh`]: FrequencyDataSource::refresh
pub struct SpectrumAnalyser {
    fft_size: usize,
    settings: AnalyserSettings,
    planner: FftPlanner<f32>,
    buffer: Vec<Complex<f32>>,
    window: Vec<f32>,
    /// Ring of the last `fft_size` samples; `write_pos` is the oldest.
    history: Vec<f32>,
    write_pos: usize,
    smoothed: Vec<f32>,
    started: bool,
}

fn blackman(fft_size: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;
    let n = fft_size as f32;
    (0..fft_size)
        .map(|i| {
            let x = std::f32::consts::TAU * i as f32 / n;
            A0 - A1 * x.cos() + A2 * (2.0 * x).cos()
        })
        .collect()
}

impl SpectrumAnalyser {
    pub fn new(settings: AnalyserSettings) -> Self {
        let mut analyser = Self {
            fft_size: 0,
            settings,
            planner: FftPlanner::new(),
            buffer: Vec::new(),
            window: Vec::new(),
            history: Vec::new(),
            write_pos: 0,
            smoothed: Vec::new(),
            started: false,
        };
        analyser.resize(2048);
        analyser
    }

    fn resize(&mut self, fft_size: usize) {
        self.fft_size = fft_size;
        self.buffer = vec![Complex::new(0.0, 0.0); fft_size];
        self.window = blackman(fft_size);
        self.history = vec![0.0; fft_size];
        self.write_pos = 0;
        self.smoothed = vec![0.0; fft_size / 2];
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Append mono samples in -1.0..=1.0. The audio graph counts as running from the first push.
    pub fn push_samples(&mut self, samples: &[f32]) {
        if samples.is_empty() {
            return;
        }
        self.started = true;
        for &sample in samples {
            self.history[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % self.fft_size;
        }
    }

    fn analyse(&mut self) {
        for i in 0..self.fft_size {
            let sample = self.history[(self.write_pos + i) % self.fft_size];
            self.buffer[i] = Complex::new(sample * self.window[i], 0.0);
        }

        let fft = self.planner.plan_fft_forward(self.fft_size);
        fft.process(&mut self.buffer);

        let tau = self.settings.smoothing.clamp(0.0, 1.0);
        let scale = 1.0 / self.fft_size as f32;
        for (k, smoothed) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.buffer[k].norm() * scale;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;
        }
    }

    fn quantise(&self, magnitude: f32) -> u8 {
        let range = self.settings.max_decibels - self.settings.min_decibels;
        if magnitude <= 0.0 || range <= 0.0 {
            return 0;
        }
        let db = 20.0 * magnitude.log10();
        let scaled = 255.0 / range * (db - self.settings.min_decibels);
        scaled.floor().clamp(0.0, 255.0) as u8
    }
}

impl FrequencyDataSource for SpectrumAnalyser {
    fn configure(&mut self, window_size: usize) -> Result<(), SetupError> {
        validate_window_size(window_size)?;
        if window_size != self.fft_size {
            debug!("Analyser window {} -> {}", self.fft_size, window_size);
            self.resize(window_size);
        }
        Ok(())
    }

    fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    fn refresh(&mut self, buffer: &mut [u8]) {
        if !self.started {
            buffer.fill(0);
            return;
        }
        self.analyse();
        for (dst, &magnitude) in buffer.iter_mut().zip(self.smoothed.iter()) {
            *dst = self.quantise(magnitude);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (std::f32::consts::TAU * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn silent_before_any_samples() {
        let mut analyser = SpectrumAnalyser::new(AnalyserSettings::default());
        analyser.configure(256).unwrap();
        let mut buffer = vec![7u8; 128];
        analyser.refresh(&mut buffer);
        assert!(buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn configure_sets_bin_count() {
        let mut analyser = SpectrumAnalyser::new(AnalyserSettings::default());
        assert_eq!(analyser.frequency_bin_count(), 1024);
        analyser.configure(512).unwrap();
        assert_eq!(analyser.frequency_bin_count(), 256);
        assert_eq!(analyser.configure(300), Err(SetupError::InvalidWindowSize(300)));
    }

    #[test]
    fn tone_peaks_in_its_bin() {
        // a wide decibel range keeps the main lobe from saturating
        let settings = AnalyserSettings {
            smoothing: 0.0,
            max_decibels: 0.0,
            ..AnalyserSettings::default()
        };
        let mut analyser = SpectrumAnalyser::new(settings);
        analyser.configure(256).unwrap();

        // bin 16 of 256 at 44.1 kHz
        let freq = 16.0 * 44_100.0 / 256.0;
        analyser.push_samples(&tone(freq, 44_100.0, 256));

        let mut buffer = vec![0u8; 128];
        analyser.refresh(&mut buffer);
        let peak = buffer
            .iter()
            .enumerate()
            .max_by_key(|&(_, &m)| m)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 16);
        assert!(buffer[16] > 200);
        assert!(buffer[100] < buffer[16]);
    }

    #[test]
    fn smoothing_decays_after_signal_stops() {
        let settings = AnalyserSettings {
            max_decibels: 0.0,
            ..AnalyserSettings::default()
        };
        let mut analyser = SpectrumAnalyser::new(settings);
        analyser.configure(256).unwrap();
        let freq = 16.0 * 44_100.0 / 256.0;
        analyser.push_samples(&tone(freq, 44_100.0, 256));

        let mut buffer = vec![0u8; 128];
        for _ in 0..10 {
            analyser.refresh(&mut buffer);
        }
        let loud = buffer[16];

        analyser.push_samples(&[0.0; 256]);
        for _ in 0..5 {
            analyser.refresh(&mut buffer);
        }
        let fading = buffer[16];
        assert!(fading > 0 && fading < loud);
    }
}
