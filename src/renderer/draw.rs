//! Rasterization primitives on top of [`Canvas`].
//!
//! Shapes are filled by testing pixel centers. Strokes that may overlap
//! themselves (polylines, arcs) are collected into a [`Coverage`] mask first
//! so each pixel is composited once per shape.

use std::f64::consts::TAU;

use super::canvas::Canvas;
use crate::color::{Gradient, RgbColor};

/// Per-shape pixel coverage over the shape's bounding box, clipped to the canvas.
struct Coverage {
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
    hits: Vec<bool>,
}

impl Coverage {
    /// Mask covering every pixel whose center may lie within `pad` of `points`.
    fn around(points: &[(f64, f64)], pad: f64, canvas_width: usize, canvas_height: usize) -> Self {
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        // end bounds are exclusive
        let x0 = (min_x - pad).floor().max(0.0);
        let y0 = (min_y - pad).floor().max(0.0);
        let x1 = (max_x + pad).ceil().min(canvas_width as f64);
        let y1 = (max_y + pad).ceil().min(canvas_height as f64);
        if !(x1 > x0 && y1 > y0) {
            return Self {
                x0: 0,
                y0: 0,
                width: 0,
                height: 0,
                hits: Vec::new(),
            };
        }

        let (width, height) = ((x1 - x0) as usize, (y1 - y0) as usize);
        Self {
            x0: x0 as usize,
            y0: y0 as usize,
            width,
            height,
            hits: vec![false; width * height],
        }
    }

    /// Mark every pixel whose center is within `half_width` of the segment.
    fn mark_segment(&mut self, a: (f64, f64), b: (f64, f64), half_width: f64) {
        let min_x = (a.0.min(b.0) - half_width).floor().max(self.x0 as f64);
        let min_y = (a.1.min(b.1) - half_width).floor().max(self.y0 as f64);
        let max_x = (a.0.max(b.0) + half_width).ceil().min((self.x0 + self.width) as f64);
        let max_y = (a.1.max(b.1) + half_width).ceil().min((self.y0 + self.height) as f64);
        if !(max_x > min_x && max_y > min_y) {
            return;
        }

        for y in min_y as usize..max_y as usize {
            for x in min_x as usize..max_x as usize {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if distance_to_segment(p, a, b) <= half_width {
                    self.hits[(y - self.y0) * self.width + (x - self.x0)] = true;
                }
            }
        }
    }

    fn paint(&self, canvas: &mut Canvas, color: RgbColor, alpha: f32) {
        for (i, hit) in self.hits.iter().enumerate() {
            if !*hit {
                continue;
            }
            let x = (self.x0 + i % self.width) as i64;
            let y = (self.y0 + i / self.width) as i64;
            canvas.blend_pixel(x, y, color, alpha);
        }
    }
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

/// Stroke half-width that still hits at least the pixel under a hairline.
#[inline]
fn half_width(line_width: f64) -> f64 {
    (line_width / 2.0).max(0.5)
}

impl Canvas {
    /// Fill an axis-aligned rectangle. Negative extents flip the rectangle.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: RgbColor, alpha: f32) {
        let (x0, x1) = if w < 0.0 { (x + w, x) } else { (x, x + w) };
        let (y0, y1) = if h < 0.0 { (y + h, y) } else { (y, y + h) };

        let x_start = x0.round().max(0.0) as i64;
        let x_end = x1.round().min(self.width() as f64) as i64;
        let y_start = y0.round().max(0.0) as i64;
        let y_end = y1.round().min(self.height() as f64) as i64;

        for py in y_start..y_end {
            for px in x_start..x_end {
                self.blend_pixel(px, py, color, alpha);
            }
        }
    }

    /// Fill the whole surface with a top-to-bottom gradient.
    pub fn fill_vertical_gradient(&mut self, gradient: &Gradient, alpha: f32) {
        let span = self.height().saturating_sub(1).max(1) as f32;
        for y in 0..self.height() {
            let color = gradient.color_at(y as f32 / span);
            for x in 0..self.width() {
                self.blend_pixel(x as i64, y as i64, color, alpha);
            }
        }
    }

    /// Fill a disc. Radii at or below zero draw nothing.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: RgbColor, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let r_sq = radius * radius;
        let y_start = (cy - radius).floor().max(0.0) as i64;
        let y_end = (cy + radius).ceil().min(self.height() as f64) as i64;
        let x_start = (cx - radius).floor().max(0.0) as i64;
        let x_end = (cx + radius).ceil().min(self.width() as f64) as i64;

        for py in y_start..y_end {
            let dy = py as f64 + 0.5 - cy;
            for px in x_start..x_end {
                let dx = px as f64 + 0.5 - cx;
                if dx * dx + dy * dy <= r_sq {
                    self.blend_pixel(px, py, color, alpha);
                }
            }
        }
    }

    pub fn stroke_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        line_width: f64,
        color: RgbColor,
        alpha: f32,
    ) {
        self.stroke_polyline(&[from, to], false, line_width, color, alpha);
    }

    /// Stroke connected segments through `points`, optionally closing the path.
    pub fn stroke_polyline(
        &mut self,
        points: &[(f64, f64)],
        closed: bool,
        line_width: f64,
        color: RgbColor,
        alpha: f32,
    ) {
        if points.is_empty() {
            return;
        }
        let hw = half_width(line_width);
        let mut coverage = Coverage::around(points, hw, self.width(), self.height());

        if points.len() == 1 {
            coverage.mark_segment(points[0], points[0], hw);
        }
        for pair in points.windows(2) {
            coverage.mark_segment(pair[0], pair[1], hw);
        }
        if closed && points.len() > 2 {
            coverage.mark_segment(points[points.len() - 1], points[0], hw);
        }

        coverage.paint(self, color, alpha);
    }

    /// Stroke a circular arc from `start` to `end` (radians, clockwise in screen space).
    #[allow(clippy::too_many_arguments)]
    pub fn stroke_arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
        line_width: f64,
        color: RgbColor,
        alpha: f32,
    ) {
        let sweep = (end - start).min(TAU);
        if radius <= 0.0 || sweep <= 0.0 {
            return;
        }
        let steps = ((radius * sweep).ceil() as usize).max(8);
        let points: Vec<(f64, f64)> = (0..=steps)
            .map(|s| {
                let angle = start + sweep * s as f64 / steps as f64;
                (cx + angle.cos() * radius, cy + angle.sin() * radius)
            })
            .collect();
        self.stroke_polyline(&points, false, line_width, color, alpha);
    }
}
