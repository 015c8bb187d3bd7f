//! Frame geometry shared by every pass, computed once at setup.

use super::effects::EffectConfig;

/// Pre-computed positions and radii used by the geometric passes.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    pub width: f64,
    pub height: f64,
    pub cx: f64,
    pub cy: f64,
    /// Half of the smaller canvas dimension.
    pub half_dim: f64,
    pub bins: usize,
    /// Horizontal space each bin gets in the linear passes.
    pub slot_width: f64,
    pub base_radius: f64,
    pub bar_circle_length: f64,
    pub circle_max_radius: f64,
    pub progress_radius: f64,
}

pub fn compute_layout(width: usize, height: usize, bins: usize, config: &EffectConfig) -> FrameLayout {
    let width = width as f64;
    let height = height as f64;
    let half_dim = width.min(height) / 2.0;
    let slot_width = if bins > 0 { width / bins as f64 } else { 0.0 };

    FrameLayout {
        width,
        height,
        cx: width / 2.0,
        cy: height / 2.0,
        half_dim,
        bins,
        slot_width,
        base_radius: half_dim * config.base_radius,
        bar_circle_length: half_dim * config.bar_circle_length,
        circle_max_radius: half_dim * config.circle_radius,
        progress_radius: half_dim * config.progress_radius,
    }
}

impl FrameLayout {
    /// Vertical offset a bin contributes to the waveform passes.
    #[inline]
    pub fn waveform_offset(&self, magnitude: u8, waveform_height: f64) -> f64 {
        if self.bins == 0 {
            return 0.0;
        }
        magnitude as f64 / self.bins as f64 * waveform_height / 2.0
    }

    /// Screen-space y of a waveform vertex. Silence sits on the bottom edge of
    /// a `waveform_height` band centred on the canvas.
    #[inline]
    pub fn waveform_y(&self, magnitude: u8, waveform_height: f64) -> f64 {
        self.cy + waveform_height / 2.0 - self.waveform_offset(magnitude, waveform_height)
    }

    /// Screen-space x of waveform vertex `i`, spanning the full width.
    #[inline]
    pub fn waveform_x(&self, i: usize) -> f64 {
        if self.bins > 1 {
            i as f64 * self.width / (self.bins - 1) as f64
        } else {
            0.0
        }
    }
}
