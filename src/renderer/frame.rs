use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::bounce::{self, Bounce};
use super::canvas::Canvas;
use super::effects::EffectConfig;
use super::layout::{compute_layout, FrameLayout};
use super::params::RenderParameters;
use super::passes::{self, PassContext};
use super::pixel;
use crate::audio::FrequencyDataSource;
use crate::color::Gradient;
use crate::error::SetupError;

/// Values carried from one frame to the next.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationState {
    /// Radians added to every hue; grows by `rotation_delta` per frame.
    pub color_rotation: f64,
    pub bounce_lerp_percent: f64,
}

/// Draws one layered frame per call onto an owned canvas.
///
/// The canvas is never cleared: each frame fades what is already there, so
/// earlier frames leave trails.
pub struct FrameRenderer<S: FrequencyDataSource> {
    canvas: Canvas,
    source: S,
    effects: EffectConfig,
    layout: FrameLayout,
    gradient: Gradient,
    magnitudes: Vec<u8>,
    state: AnimationState,
    rng: StdRng,
    last_bounce: Option<Bounce>,
    frames: u64,
}

impl<S: FrequencyDataSource> FrameRenderer<S> {
    /// Bind a canvas and a data source.
    ///
    /// The source is configured with the effect window size and must then
    /// report exactly half that many bins.
    pub fn initialize(canvas: Canvas, mut source: S, effects: EffectConfig) -> Result<Self, SetupError> {
        effects.validate()?;

        let (width, height) = (canvas.width(), canvas.height());
        if width == 0 || height == 0 {
            return Err(SetupError::EmptySurface { width, height });
        }

        source.configure(effects.window_size)?;
        let expected = effects.bin_count();
        let actual = source.frequency_bin_count();
        if actual != expected {
            return Err(SetupError::BinCountMismatch { expected, actual });
        }

        let layout = compute_layout(width, height, expected, &effects);
        let rng = match effects.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        info!(
            "Renderer ready: {}x{}, {} bins, passes [{}]",
            width,
            height,
            expected,
            effects
                .passes
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            canvas,
            source,
            effects,
            layout,
            gradient: Gradient::backdrop(),
            magnitudes: vec![0; expected],
            state: AnimationState::default(),
            rng,
            last_bounce: None,
            frames: 0,
        })
    }

    /// Render one frame with the given flags.
    pub fn render_frame(&mut self, params: &RenderParameters) {
        self.source.refresh(&mut self.magnitudes);

        passes::background(&mut self.canvas, self.effects.background_alpha);
        if params.show_gradient {
            passes::gradient(&mut self.canvas, &self.gradient, self.effects.gradient_alpha);
        }

        // Only the circular passes read the bounced radius.
        let circular = params.show_bar_circle || params.show_circle_waveform;
        self.last_bounce = if params.show_bounce && circular {
            Some(bounce::evaluate(
                &self.magnitudes,
                self.layout.base_radius,
                &mut self.state.bounce_lerp_percent,
                &self.effects,
            ))
        } else {
            None
        };

        let ctx = PassContext {
            magnitudes: &self.magnitudes,
            layout: &self.layout,
            config: &self.effects,
            params,
            rotation: self.state.color_rotation,
            radius: self
                .last_bounce
                .map_or(self.layout.base_radius, |b| b.radius),
        };
        for &pass in &self.effects.passes {
            if passes::is_enabled(pass, params) {
                passes::run(pass, &mut self.canvas, &ctx);
            }
        }

        // The pixel stage always round-trips the whole frame.
        let (width, height) = (self.canvas.width(), self.canvas.height());
        let mut image = self.canvas.get_image_data(0, 0, width, height);
        pixel::process_frame(&mut image.data, width, params, &mut self.rng);
        self.canvas.put_image_data(&image, 0, 0);

        self.state.color_rotation += self.effects.rotation_delta;
        self.frames += 1;

        if let Some(b) = self.last_bounce {
            debug!(
                "Frame {}: kick {:.1}, radius {:.1} -> {:.1}",
                self.frames, b.kick_average, b.target_radius, b.radius
            );
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn effects(&self) -> &EffectConfig {
        &self.effects
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// The magnitudes the last frame was drawn from.
    pub fn magnitudes(&self) -> &[u8] {
        &self.magnitudes
    }

    /// Bounce evaluated during the last frame, if any pass used it.
    pub fn last_bounce(&self) -> Option<Bounce> {
        self.last_bounce
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::FixedSpectrum;
    use crate::color::RgbColor;

    fn seeded() -> EffectConfig {
        EffectConfig {
            seed: Some(1),
            ..EffectConfig::default()
        }
    }

    fn kick_spectrum() -> FixedSpectrum {
        let mut magnitudes = vec![0u8; 128];
        magnitudes[..6].fill(255);
        FixedSpectrum::new(magnitudes)
    }

    #[test]
    fn saturated_kick_doubles_bounce_target() {
        let mut renderer = FrameRenderer::initialize(Canvas::new(200, 100), kick_spectrum(), seeded()).unwrap();
        let params = RenderParameters {
            show_bar_circle: true,
            show_bounce: true,
            ..RenderParameters::default()
        };
        renderer.render_frame(&params);

        let base = renderer.layout().base_radius;
        let bounce = renderer.last_bounce().expect("bounce evaluated");
        assert_eq!(bounce.kick_average, 255.0);
        assert!((bounce.target_radius - 2.0 * base).abs() < 1e-9);
        assert_eq!(renderer.state().bounce_lerp_percent, 1.0);
    }

    #[test]
    fn bounce_needs_a_circular_pass() {
        let mut renderer = FrameRenderer::initialize(Canvas::new(64, 64), kick_spectrum(), seeded()).unwrap();
        let params = RenderParameters {
            show_bounce: true,
            show_bars: true,
            ..RenderParameters::default()
        };
        renderer.render_frame(&params);
        assert!(renderer.last_bounce().is_none());
    }

    #[test]
    fn silence_keeps_base_radius() {
        let mut renderer =
            FrameRenderer::initialize(Canvas::new(64, 64), FixedSpectrum::silent(128), seeded()).unwrap();
        let params = RenderParameters {
            show_circle_waveform: true,
            show_bounce: true,
            waveform_height: 20.0,
            ..RenderParameters::default()
        };
        for _ in 0..30 {
            renderer.render_frame(&params);
            let bounce = renderer.last_bounce().unwrap();
            assert_eq!(bounce.radius, renderer.layout().base_radius);
        }
    }

    #[test]
    fn rotation_advances_every_frame() {
        let mut renderer =
            FrameRenderer::initialize(Canvas::new(32, 32), FixedSpectrum::silent(128), seeded()).unwrap();
        for _ in 0..250 {
            renderer.render_frame(&RenderParameters::default());
        }
        assert!((renderer.state().color_rotation - 0.25).abs() < 1e-9);
        assert_eq!(renderer.frames_rendered(), 250);
        assert_eq!(renderer.source().refreshes, 250);
    }

    #[test]
    fn background_fades_with_every_flag_off() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill(RgbColor::new(200, 200, 200));
        let mut renderer = FrameRenderer::initialize(canvas, FixedSpectrum::silent(128), seeded()).unwrap();
        renderer.render_frame(&RenderParameters::default());
        assert_eq!(renderer.canvas().get_pixel(3, 3), (160, 160, 160, 255));
    }

    #[test]
    fn gradient_overlays_the_backdrop_stops() {
        let mut canvas = Canvas::new(4, 5);
        canvas.fill(RgbColor::BLACK);
        let effects = EffectConfig {
            background_alpha: 0.0,
            gradient_alpha: 0.5,
            ..seeded()
        };
        let mut renderer = FrameRenderer::initialize(canvas, FixedSpectrum::silent(128), effects).unwrap();
        let params = RenderParameters {
            show_gradient: true,
            ..RenderParameters::default()
        };
        renderer.render_frame(&params);

        let canvas = renderer.canvas();
        for x in 0..4 {
            assert_eq!(canvas.get_pixel(x, 0), (128, 0, 128, 255));
            assert_eq!(canvas.get_pixel(x, 1), (0, 128, 0, 255));
            assert_eq!(canvas.get_pixel(x, 2), (128, 128, 0, 255));
            assert_eq!(canvas.get_pixel(x, 4), (128, 0, 128, 255));
        }
    }

    #[test]
    fn gradient_flag_off_leaves_backdrop_alone() {
        let mut canvas = Canvas::new(4, 5);
        canvas.fill(RgbColor::BLACK);
        let effects = EffectConfig {
            background_alpha: 0.0,
            gradient_alpha: 0.5,
            ..seeded()
        };
        let mut renderer = FrameRenderer::initialize(canvas, FixedSpectrum::silent(128), effects).unwrap();
        renderer.render_frame(&RenderParameters::default());
        assert_eq!(renderer.canvas().get_pixel(1, 2), (0, 0, 0, 255));
    }

    #[test]
    fn pixel_stage_runs_after_geometry() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill(RgbColor::new(200, 200, 200));
        let mut renderer = FrameRenderer::initialize(canvas, FixedSpectrum::silent(128), seeded()).unwrap();
        let params = RenderParameters {
            show_invert: true,
            ..RenderParameters::default()
        };
        renderer.render_frame(&params);
        // faded to 160, then inverted
        assert_eq!(renderer.canvas().get_pixel(0, 0), (95, 95, 95, 255));
    }

    #[test]
    fn magnitudes_follow_the_source() {
        let mut renderer = FrameRenderer::initialize(Canvas::new(16, 16), kick_spectrum(), seeded()).unwrap();
        assert!(renderer.magnitudes().iter().all(|&m| m == 0));
        renderer.render_frame(&RenderParameters::default());
        assert_eq!(&renderer.magnitudes()[..7], &[255, 255, 255, 255, 255, 255, 0]);
    }

    #[test]
    fn mismatched_bin_count_is_rejected() {
        let mut source = FixedSpectrum::silent(128);
        source.reported_bins = Some(100);
        let err = FrameRenderer::initialize(Canvas::new(16, 16), source, seeded()).err();
        assert_eq!(err, Some(SetupError::BinCountMismatch { expected: 128, actual: 100 }));
    }

    #[test]
    fn empty_surface_is_rejected() {
        let err = FrameRenderer::initialize(Canvas::new(0, 10), FixedSpectrum::silent(128), seeded()).err();
        assert_eq!(err, Some(SetupError::EmptySurface { width: 0, height: 10 }));
    }

    #[test]
    fn invalid_window_is_rejected() {
        let effects = EffectConfig {
            window_size: 100,
            ..seeded()
        };
        let err = FrameRenderer::initialize(Canvas::new(16, 16), FixedSpectrum::silent(50), effects).err();
        assert_eq!(err, Some(SetupError::InvalidWindowSize(100)));
    }

    #[test]
    fn same_seed_renders_same_noise() {
        let params = RenderParameters {
            show_noise: true,
            ..RenderParameters::default()
        };
        let render = || {
            let mut r = FrameRenderer::initialize(Canvas::new(32, 32), FixedSpectrum::silent(128), seeded()).unwrap();
            r.render_frame(&params);
            r.canvas().data().to_vec()
        };
        assert_eq!(render(), render());
    }
}
