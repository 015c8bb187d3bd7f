//! Frequency data acquisition.
//!
//! The renderer only sees the [`FrequencyDataSource`] contract: a fixed number
//! of byte magnitudes refreshed on demand.

mod analyser;
mod synth;

pub use analyser::{AnalyserSettings, SpectrumAnalyser};
pub use synth::{SynthSettings, SynthSource, SyntheticSignal};

use crate::error::SetupError;
use crate::renderer::params::Playback;

/// A provider of per-bin magnitudes in 0..=255, lowest frequency first.
pub trait FrequencyDataSource {
    /// Set the analysis window. The source then reports `window_size / 2` bins.
    fn configure(&mut self, window_size: usize) -> Result<(), SetupError>;

    fn frequency_bin_count(&self) -> usize;

    /// Overwrite `buffer` with the current snapshot. Silence reads as zeros.
    fn refresh(&mut self, buffer: &mut [u8]);

    /// Position of whatever is playing, when the source knows it.
    fn playback(&self) -> Option<Playback> {
        None
    }
}

impl<T: FrequencyDataSource + ?Sized> FrequencyDataSource for Box<T> {
    fn configure(&mut self, window_size: usize) -> Result<(), SetupError> {
        (**self).configure(window_size)
    }

    fn frequency_bin_count(&self) -> usize {
        (**self).frequency_bin_count()
    }

    fn refresh(&mut self, buffer: &mut [u8]) {
        (**self).refresh(buffer)
    }

    fn playback(&self) -> Option<Playback> {
        (**self).playback()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::FrequencyDataSource;
    use crate::error::SetupError;

    /// Replays a fixed spectrum every frame.
    pub struct FixedSpectrum {
        pub magnitudes: Vec<u8>,
        /// Bin count to report regardless of configuration, for contract tests.
        pub reported_bins: Option<usize>,
        pub refreshes: usize,
    }

    impl FixedSpectrum {
        pub fn new(magnitudes: Vec<u8>) -> Self {
            Self {
                magnitudes,
                reported_bins: None,
                refreshes: 0,
            }
        }

        pub fn silent(bins: usize) -> Self {
            Self::new(vec![0; bins])
        }
    }

    impl FrequencyDataSource for FixedSpectrum {
        fn configure(&mut self, window_size: usize) -> Result<(), SetupError> {
            self.magnitudes.resize(window_size / 2, 0);
            Ok(())
        }

        fn frequency_bin_count(&self) -> usize {
            self.reported_bins.unwrap_or(self.magnitudes.len())
        }

        fn refresh(&mut self, buffer: &mut [u8]) {
            self.refreshes += 1;
            for (dst, src) in buffer.iter_mut().zip(&self.magnitudes) {
                *dst = *src;
            }
        }
    }
}
