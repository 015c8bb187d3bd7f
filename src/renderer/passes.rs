//! Geometric draw passes.
//!
//! Each pass paints straight onto the canvas; later passes cover earlier ones.
//! Everything that scales with a magnitude collapses to nothing on silence.

use chrono::Local;
use std::f64::consts::{FRAC_PI_2, TAU};

use super::canvas::Canvas;
use super::effects::{EffectConfig, Pass};
use super::layout::FrameLayout;
use super::params::RenderParameters;
use super::text;
use crate::color::{self, Gradient, RgbColor};

const MAX_MAGNITUDE: f64 = 255.0;

/// Read-only inputs shared by the geometric passes for one frame.
pub struct PassContext<'a> {
    pub magnitudes: &'a [u8],
    pub layout: &'a FrameLayout,
    pub config: &'a EffectConfig,
    pub params: &'a RenderParameters,
    pub rotation: f64,
    /// Base radius after bounce modulation.
    pub radius: f64,
}

impl PassContext<'_> {
    #[inline]
    fn bins(&self) -> usize {
        self.magnitudes.len()
    }

    /// Angle of bin `i` around the circle, starting at twelve o'clock.
    #[inline]
    fn bin_angle(&self, i: usize) -> f64 {
        -FRAC_PI_2 + i as f64 / self.bins() as f64 * TAU
    }

    #[inline]
    fn waveform_height(&self) -> Option<f64> {
        let h = self.params.waveform_height as f64;
        (h.is_finite() && h > 0.0).then_some(h)
    }
}

/// Whether the caller's flags switch `pass` on.
pub fn is_enabled(pass: Pass, params: &RenderParameters) -> bool {
    match pass {
        Pass::BarCircle => params.show_bar_circle,
        Pass::Bars => params.show_bars,
        Pass::Waveform => params.show_waveform,
        Pass::CircleWaveform => params.show_circle_waveform,
        Pass::Circles => params.show_circles,
        Pass::Progress => params.show_progress,
        Pass::Date => params.show_date,
        Pass::PixelEcho => params.show_pixels,
    }
}

/// Dispatch to the pass renderer.
pub fn run(pass: Pass, canvas: &mut Canvas, ctx: &PassContext) {
    if ctx.bins() == 0 {
        return;
    }
    match pass {
        Pass::BarCircle => bar_circle(canvas, ctx),
        Pass::Bars => bars(canvas, ctx),
        Pass::Waveform => waveform(canvas, ctx),
        Pass::CircleWaveform => circle_waveform(canvas, ctx),
        Pass::Circles => circles(canvas, ctx),
        Pass::Progress => progress(canvas, ctx),
        Pass::Date => date(canvas, ctx),
        Pass::PixelEcho => pixel_echo(canvas, ctx),
    }
}

/// Fade the previous frame toward black.
pub fn background(canvas: &mut Canvas, alpha: f32) {
    let (w, h) = (canvas.width() as f64, canvas.height() as f64);
    canvas.fill_rect(0.0, 0.0, w, h, RgbColor::BLACK, alpha);
}

pub fn gradient(canvas: &mut Canvas, gradient: &Gradient, alpha: f32) {
    canvas.fill_vertical_gradient(gradient, alpha);
}

/// Radial bars, one per bin, standing on the (bounced) base circle.
fn bar_circle(canvas: &mut Canvas, ctx: &PassContext) {
    let layout = ctx.layout;
    let sector = TAU * ctx.radius / ctx.bins() as f64;
    let thickness = (sector * ctx.config.bar_circle_fill).max(1.0);

    for (i, &magnitude) in ctx.magnitudes.iter().enumerate() {
        if magnitude == 0 {
            continue;
        }
        let length = magnitude as f64 / MAX_MAGNITUDE * layout.bar_circle_length;
        let angle = ctx.bin_angle(i);
        let (cos_a, sin_a) = (angle.cos(), angle.sin());
        let inner = (layout.cx + cos_a * ctx.radius, layout.cy + sin_a * ctx.radius);
        let outer = (
            layout.cx + cos_a * (ctx.radius + length),
            layout.cy + sin_a * (ctx.radius + length),
        );

        let hue = color::rotated_hue(angle + FRAC_PI_2, ctx.rotation);
        let rgb = color::hsl(hue, 1.0, 0.5);
        canvas.stroke_line(inner, outer, thickness, rgb, ctx.config.bar_alpha);
    }
}

/// Vertical bars along the bottom edge, lowest bin on the left.
fn bars(canvas: &mut Canvas, ctx: &PassContext) {
    let layout = ctx.layout;
    let bar_width = (layout.slot_width - ctx.config.bar_spacing).max(1.0);

    for (i, &magnitude) in ctx.magnitudes.iter().enumerate() {
        let height = magnitude as f64 / MAX_MAGNITUDE * layout.height * ctx.config.bar_height_scale;
        if height <= 0.0 {
            continue;
        }
        let x = i as f64 * layout.slot_width;
        let position = i as f64 / ctx.bins() as f64;
        let hue = color::rotated_hue(position * TAU, ctx.rotation);
        let rgb = color::hsl(hue, 0.9, 0.5);
        canvas.fill_rect(x, layout.height - height, bar_width, height, rgb, ctx.config.bar_alpha);
    }
}

fn waveform(canvas: &mut Canvas, ctx: &PassContext) {
    let Some(band) = ctx.waveform_height() else {
        return;
    };
    let layout = ctx.layout;
    let points: Vec<(f64, f64)> = ctx
        .magnitudes
        .iter()
        .enumerate()
        .map(|(i, &m)| (layout.waveform_x(i), layout.waveform_y(m, band)))
        .collect();

    let rgb = color::hsl(color::rotated_hue(0.0, ctx.rotation), 1.0, 0.7);
    canvas.stroke_polyline(&points, false, ctx.config.line_width, rgb, 1.0);
}

/// The waveform wrapped around the (bounced) base circle as a closed loop.
fn circle_waveform(canvas: &mut Canvas, ctx: &PassContext) {
    let Some(band) = ctx.waveform_height() else {
        return;
    };
    let layout = ctx.layout;
    let points: Vec<(f64, f64)> = ctx
        .magnitudes
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            let angle = ctx.bin_angle(i);
            let r = ctx.radius + layout.waveform_offset(m, band);
            (layout.cx + angle.cos() * r, layout.cy + angle.sin() * r)
        })
        .collect();

    let rgb = color::hsl(color::rotated_hue(std::f64::consts::PI, ctx.rotation), 1.0, 0.6);
    canvas.stroke_polyline(&points, true, ctx.config.line_width, rgb, 1.0);
}

/// Every fourth bin stacks its three disc variants on the canvas center.
/// Variants sharing a color are still painted separately.
fn circles(canvas: &mut Canvas, ctx: &PassContext) {
    let layout = ctx.layout;
    for &magnitude in ctx.magnitudes.iter().step_by(4) {
        let radius = magnitude as f64 / MAX_MAGNITUDE * layout.circle_max_radius;
        for variant in &ctx.config.circle_variants {
            canvas.fill_circle(
                layout.cx,
                layout.cy,
                radius * variant.scale,
                variant.color,
                ctx.config.circle_alpha,
            );
        }
    }
}

/// Playback arc starting at the current rotation angle.
fn progress(canvas: &mut Canvas, ctx: &PassContext) {
    let fraction = ctx.params.playback.map(|p| p.fraction()).unwrap_or(0.0);
    if fraction <= 0.0 {
        return;
    }
    let layout = ctx.layout;
    let start = ctx.rotation;
    let rgb = color::hsl(color::rotated_hue(0.0, ctx.rotation), 0.8, 0.6);
    canvas.stroke_arc(
        layout.cx,
        layout.cy,
        layout.progress_radius,
        start,
        start + TAU * fraction,
        ctx.config.progress_width,
        rgb,
        1.0,
    );
}

fn date(canvas: &mut Canvas, ctx: &PassContext) {
    let now = ctx
        .params
        .timestamp
        .unwrap_or_else(|| Local::now().naive_local());
    let date_line = now.format("%m/%d/%Y").to_string();
    let time_line = now.format("%H:%M:%S").to_string();

    let layout = ctx.layout;
    let scale = (3.0 * layout.height / 800.0).round().max(1.0) as usize;
    let line_height = (text::GLYPH_SIZE * scale) as f64;
    let rgb = color::hsl(color::rotated_hue(0.0, ctx.rotation * 10.0), 1.0, 0.6);

    text::draw_centered_line(canvas, &date_line, layout.cx, layout.cy - line_height * 0.75, scale, rgb, 1.0);
    text::draw_centered_line(canvas, &time_line, layout.cx, layout.cy + line_height * 0.75, scale, rgb, 1.0);
}

/// Lift a thin slice of the rendered frame at each waveform vertex, invert
/// it, and paste it a few pixels lower.
fn pixel_echo(canvas: &mut Canvas, ctx: &PassContext) {
    let layout = ctx.layout;
    let band = ctx.waveform_height().unwrap_or(0.0);
    let slice_width = layout.slot_width.ceil().max(1.0) as usize;
    let slice_height = ctx.config.echo_height.max(1);

    for (i, &magnitude) in ctx.magnitudes.iter().enumerate() {
        let x = (i as f64 * layout.slot_width).round() as i64;
        let y = layout.waveform_y(magnitude, band).round() as i64;

        let mut slice = canvas.get_image_data(x, y, slice_width, slice_height);
        for px in slice.data.chunks_exact_mut(4) {
            px[0] = 255 - px[0];
            px[1] = 255 - px[1];
            px[2] = 255 - px[2];
        }
        canvas.put_image_data(&slice, x, y + ctx.config.echo_drop as i64);
    }
}
