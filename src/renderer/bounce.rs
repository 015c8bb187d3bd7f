//! Kick-driven radius bounce shared by the circular passes.

use super::effects::{BounceUpdate, EffectConfig};

/// Reference magnitude the kick average is measured against.
const MAX_MAGNITUDE: f64 = 255.0;

/// `(1 - t) * a + t * b` with `t` clamped to 0.0..=1.0.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    (1.0 - t) * a + t * b
}

/// Mean magnitude over `start..end`; zero for an empty or out-of-range band.
pub fn kick_average(magnitudes: &[u8], start: usize, end: usize) -> f64 {
    let end = end.min(magnitudes.len());
    if start >= end {
        return 0.0;
    }
    let sum: u32 = magnitudes[start..end].iter().map(|&m| m as u32).sum();
    sum as f64 / (end - start) as f64
}

/// The outcome of one bounce evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    pub kick_average: f64,
    pub base_radius: f64,
    /// Radius the kick pushes toward, before smoothing.
    pub target_radius: f64,
    /// Radius the circular passes draw at.
    pub radius: f64,
}

/// Evaluate the bounce for this frame and advance `lerp_percent`.
///
/// A kick above the threshold pushes the target to `base * (1 + k)` with
/// `k = kick / 255`. Under [`BounceUpdate::Ratio`] the drawn radius works out
/// to `base * (1 + k - k^2)`, the same as a target of `base * (2 - k)` would
/// give; the two targets only draw differently under [`BounceUpdate::Ratchet`].
pub fn evaluate(
    magnitudes: &[u8],
    base_radius: f64,
    lerp_percent: &mut f64,
    config: &EffectConfig,
) -> Bounce {
    let kick = kick_average(magnitudes, config.kick_start, config.kick_end);
    let above = kick > config.bounce_threshold;

    let target_radius = if above {
        base_radius + base_radius * (kick / MAX_MAGNITUDE)
    } else {
        base_radius
    };

    *lerp_percent = match config.bounce_update {
        BounceUpdate::Ratio => {
            if base_radius > 0.0 {
                (target_radius - base_radius) / base_radius
            } else {
                0.0
            }
        }
        BounceUpdate::Ratchet => {
            if above {
                (*lerp_percent + config.bounce_step).min(1.0)
            } else {
                (*lerp_percent - config.bounce_step).max(-1.0)
            }
        }
    };

    Bounce {
        kick_average: kick,
        base_radius,
        target_radius,
        radius: lerp(target_radius, base_radius, *lerp_percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kick_frame(level: u8, bins: usize) -> Vec<u8> {
        let mut m = vec![0u8; bins];
        m[..6].fill(level);
        m
    }

    #[test]
    fn lerp_clamps_factor() {
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
        assert_eq!(lerp(10.0, 20.0, -3.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 7.0), 20.0);
    }

    #[test]
    fn kick_average_handles_degenerate_ranges() {
        assert_eq!(kick_average(&[], 1, 6), 0.0);
        assert_eq!(kick_average(&[10, 20, 30], 2, 2), 0.0);
        assert_eq!(kick_average(&[10, 20, 30], 1, 10), 25.0);
    }

    #[test]
    fn saturated_kick_doubles_target() {
        let config = EffectConfig::default();
        let mut percent = 0.0;
        let bounce = evaluate(&kick_frame(255, 128), 100.0, &mut percent, &config);
        assert_eq!(bounce.kick_average, 255.0);
        assert_eq!(bounce.target_radius, 200.0);
        assert_eq!(percent, 1.0);
        // ratio of 1 blends fully back to the base radius
        assert_eq!(bounce.radius, 100.0);
    }

    #[test]
    fn moderate_kick_expands_radius() {
        let config = EffectConfig::default();
        let mut percent = 0.0;
        let bounce = evaluate(&kick_frame(230, 128), 100.0, &mut percent, &config);
        let expected_target = 100.0 + 100.0 * 230.0 / 255.0;
        assert!((bounce.target_radius - expected_target).abs() < 1e-9);
        assert!(bounce.radius > 100.0 && bounce.radius < expected_target);
    }

    #[test]
    fn ratio_radius_is_quadratic_in_kick() {
        let config = EffectConfig::default();
        let k = 230.0 / 255.0;
        let mut percent = 0.0;
        let bounce = evaluate(&kick_frame(230, 128), 100.0, &mut percent, &config);
        assert!((bounce.radius - 100.0 * (1.0 + k - k * k)).abs() < 1e-9);

        // a target of base * (2 - k) blends to the same radius
        let mirrored = 100.0 * (2.0 - k);
        let mirrored_radius = lerp(mirrored, 100.0, (mirrored - 100.0) / 100.0);
        assert!((bounce.radius - mirrored_radius).abs() < 1e-9);
    }

    #[test]
    fn silence_never_drifts() {
        for update in [BounceUpdate::Ratio, BounceUpdate::Ratchet] {
            let config = EffectConfig {
                bounce_update: update,
                ..EffectConfig::default()
            };
            let mut percent = 0.0;
            for _ in 0..200 {
                let bounce = evaluate(&[0u8; 128], 80.0, &mut percent, &config);
                assert_eq!(bounce.radius, 80.0);
            }
        }
    }

    #[test]
    fn ratchet_saturates_then_reverses() {
        let config = EffectConfig {
            bounce_update: BounceUpdate::Ratchet,
            ..EffectConfig::default()
        };
        let loud = kick_frame(240, 128);
        let mut percent = 0.0;
        for _ in 0..40 {
            evaluate(&loud, 100.0, &mut percent, &config);
        }
        assert_eq!(percent, 1.0);

        evaluate(&[0u8; 128], 100.0, &mut percent, &config);
        assert!((percent - 0.95).abs() < 1e-12);
        for _ in 0..100 {
            evaluate(&[0u8; 128], 100.0, &mut percent, &config);
        }
        assert_eq!(percent, -1.0);
    }

    #[test]
    fn zero_base_radius_is_guarded() {
        let config = EffectConfig::default();
        let mut percent = 0.5;
        let bounce = evaluate(&kick_frame(255, 128), 0.0, &mut percent, &config);
        assert_eq!(percent, 0.0);
        assert_eq!(bounce.radius, 0.0);
    }
}
