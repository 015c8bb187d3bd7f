use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

/// RGB color as it appears in configuration files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0, 0, 0);
    pub const MAGENTA: RgbColor = RgbColor::new(255, 0, 255);
    pub const GREEN: RgbColor = RgbColor::new(0, 255, 0);
    pub const YELLOW: RgbColor = RgbColor::new(255, 255, 0);
    pub const CYAN: RgbColor = RgbColor::new(0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Wrap any hue in degrees into [0, 360).
///
/// Rotation grows without bound, so the wrap happens in f64 before the value
/// is narrowed for palette.
#[inline]
pub fn wrap_hue(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Hue in degrees for an angular position (radians) shifted by the color rotation (radians).
#[inline]
pub fn rotated_hue(angle: f64, rotation: f64) -> f64 {
    wrap_hue((angle + rotation).to_degrees())
}

/// HSL to 8-bit RGB. `saturation` and `lightness` are in 0.0..=1.0.
pub fn hsl(hue: f64, saturation: f32, lightness: f32) -> RgbColor {
    let hsl = Hsl::new(wrap_hue(hue) as f32, saturation, lightness);
    let rgb: Srgb = hsl.into_color();

    RgbColor {
        r: (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        g: (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        b: (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    }
}

/// Interpolate between two colors
pub fn lerp_color(a: RgbColor, b: RgbColor, t: f32) -> RgbColor {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    RgbColor {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
    }
}

/// A static multi-stop gradient, sampled by position in 0.0..=1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<(f32, RgbColor)>,
}

impl Gradient {
    /// Stops must be sorted by offset.
    pub fn new(stops: Vec<(f32, RgbColor)>) -> Self {
        Self { stops }
    }

    /// The five-stop backdrop: magenta, green, yellow, green, magenta.
    pub fn backdrop() -> Self {
        Self::new(vec![
            (0.0, RgbColor::MAGENTA),
            (0.25, RgbColor::GREEN),
            (0.5, RgbColor::YELLOW),
            (0.75, RgbColor::GREEN),
            (1.0, RgbColor::MAGENTA),
        ])
    }

    pub fn color_at(&self, position: f32) -> RgbColor {
        let Some(&(first_offset, first)) = self.stops.first() else {
            return RgbColor::BLACK;
        };
        if position <= first_offset {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (start, a) = pair[0];
            let (end, b) = pair[1];
            if position <= end {
                let span = end - start;
                let t = if span > 0.0 { (position - start) / span } else { 1.0 };
                return lerp_color(a, b, t);
            }
        }
        self.stops.last().map(|&(_, c)| c).unwrap_or(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_wraps_for_large_rotation() {
        let near = hsl(30.0, 1.0, 0.5);
        let far = hsl(30.0 + 360.0 * 1_000_000.0, 1.0, 0.5);
        assert_eq!(near, far);
        assert!((wrap_hue(-30.0) - 330.0).abs() < 1e-9);
    }

    #[test]
    fn primary_hues() {
        assert_eq!(hsl(0.0, 1.0, 0.5), RgbColor::new(255, 0, 0));
        assert_eq!(hsl(120.0, 1.0, 0.5), RgbColor::new(0, 255, 0));
        assert_eq!(hsl(240.0, 1.0, 0.5), RgbColor::new(0, 0, 255));
    }

    #[test]
    fn backdrop_hits_stops_exactly() {
        let gradient = Gradient::backdrop();
        assert_eq!(gradient.color_at(0.0), RgbColor::MAGENTA);
        assert_eq!(gradient.color_at(0.25), RgbColor::GREEN);
        assert_eq!(gradient.color_at(0.5), RgbColor::YELLOW);
        assert_eq!(gradient.color_at(0.75), RgbColor::GREEN);
        assert_eq!(gradient.color_at(1.0), RgbColor::MAGENTA);
        // halfway between green and yellow
        assert_eq!(gradient.color_at(0.375), RgbColor::new(128, 255, 0));
    }
}
