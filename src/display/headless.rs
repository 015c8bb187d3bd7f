//! Render a fixed number of frames without any output surface.

use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tracing::info;

use super::{build_renderer, frame_params};
use crate::config::Config;
use crate::renderer::Canvas;

/// Summary of a headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub frames: u64,
    pub elapsed: Duration,
    /// Mean Rec. 709 luma of the final frame, 0.0..=255.0.
    pub mean_luma: f64,
    /// Share of pixels in the final frame that are not black.
    pub lit_fraction: f64,
    pub peak_kick: f64,
}

impl RunStats {
    pub fn frame_time_ms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.elapsed.as_secs_f64() * 1000.0 / self.frames as f64
    }
}

fn frame_stats(canvas: &Canvas) -> (f64, f64) {
    let mut luma_sum = 0.0;
    let mut lit = 0usize;
    let mut count = 0usize;
    for px in canvas.data().chunks_exact(4) {
        // composite over black
        let a = px[3] as f64 / 255.0;
        let luma = (0.2126 * px[0] as f64 + 0.7152 * px[1] as f64 + 0.0722 * px[2] as f64) * a;
        luma_sum += luma;
        if luma >= 1.0 {
            lit += 1;
        }
        count += 1;
    }
    if count == 0 {
        return (0.0, 0.0);
    }
    (luma_sum / count as f64, lit as f64 / count as f64)
}

pub fn run(config: Config) -> Result<RunStats> {
    let mut renderer = build_renderer(&config).context("Failed to set up renderer")?;
    let frames = config.display.frames;
    info!(
        "Rendering {} headless frames at {}x{}",
        frames, config.display.width, config.display.height
    );

    let start = Instant::now();
    let mut peak_kick: f64 = 0.0;
    for _ in 0..frames {
        let params = frame_params(&config.params, &renderer);
        renderer.render_frame(&params);
        if let Some(bounce) = renderer.last_bounce() {
            peak_kick = peak_kick.max(bounce.kick_average);
        }
    }

    let (mean_luma, lit_fraction) = frame_stats(renderer.canvas());
    let stats = RunStats {
        frames,
        elapsed: start.elapsed(),
        mean_luma,
        lit_fraction,
        peak_kick,
    };
    info!(
        "Rendered {} frames in {:.2?} ({:.3} ms/frame), mean luma {:.1}, {:.1}% lit, peak kick {:.1}",
        stats.frames,
        stats.elapsed,
        stats.frame_time_ms(),
        stats.mean_luma,
        stats.lit_fraction * 100.0,
        stats.peak_kick
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RgbColor;

    fn small_config(frames: u64) -> Config {
        let mut config = Config::builtin();
        config.display.width = 64;
        config.display.height = 48;
        config.display.frames = frames;
        config.effects.seed = Some(3);
        config
    }

    #[test]
    fn renders_requested_frames() {
        let stats = run(small_config(20)).unwrap();
        assert_eq!(stats.frames, 20);
        assert!(stats.lit_fraction > 0.0);
        assert!(stats.peak_kick > 0.0);
    }

    #[test]
    fn zero_frames_is_fine() {
        let stats = run(small_config(0)).unwrap();
        assert_eq!(stats.frame_time_ms(), 0.0);
        assert_eq!(stats.mean_luma, 0.0);
    }

    #[test]
    fn stats_composite_over_black() {
        let mut canvas = Canvas::new(2, 1);
        canvas.fill(RgbColor::new(255, 255, 255));
        let (luma, lit) = frame_stats(&canvas);
        assert!((luma - 255.0).abs() < 1e-9);
        assert_eq!(lit, 1.0);
    }
}
