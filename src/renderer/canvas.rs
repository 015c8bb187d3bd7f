//! Owned RGBA drawing surface.
//!
//! Pixels are stored as straight (non-premultiplied) RGBA, 4 bytes per pixel,
//! row-major. Drawing goes through [`Canvas::blend_pixel`], which composites
//! source-over; [`ImageData`] round-trips bypass compositing entirely.

use crate::color::RgbColor;

pub struct Canvas {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

/// A detached rectangle of raw RGBA bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl ImageData {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width * height * 4],
        }
    }
}

impl Canvas {
    /// A transparent black canvas.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0u8; width * height * 4],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Overwrite every pixel with an opaque color.
    pub fn fill(&mut self, color: RgbColor) {
        for px in self.data.chunks_exact_mut(4) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
            px[3] = 255;
        }
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some((y as usize * self.width + x as usize) * 4)
    }

    /// Read the RGBA values at (x, y); transparent black outside the surface.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> (u8, u8, u8, u8) {
        match self.index(x as i64, y as i64) {
            Some(idx) => (
                self.data[idx],
                self.data[idx + 1],
                self.data[idx + 2],
                self.data[idx + 3],
            ),
            None => (0, 0, 0, 0),
        }
    }

    /// Composite `color` at `alpha` over the pixel at (x, y). Out-of-bounds writes are dropped.
    #[inline]
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: RgbColor, alpha: f32) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let sa = alpha.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let da = self.data[idx + 3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);

        let mix = |src: u8, dst: u8| -> u8 {
            let v = (src as f32 * sa + dst as f32 * da * (1.0 - sa)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };

        self.data[idx] = mix(color.r, self.data[idx]);
        self.data[idx + 1] = mix(color.g, self.data[idx + 1]);
        self.data[idx + 2] = mix(color.b, self.data[idx + 2]);
        self.data[idx + 3] = (out_a * 255.0).round() as u8;
    }

    /// Copy a rectangle out of the surface. Areas outside the surface read as transparent black.
    pub fn get_image_data(&self, x: i64, y: i64, width: usize, height: usize) -> ImageData {
        let mut image = ImageData::new(width, height);
        for row in 0..height {
            for col in 0..width {
                if let Some(src) = self.index(x + col as i64, y + row as i64) {
                    let dst = (row * width + col) * 4;
                    image.data[dst..dst + 4].copy_from_slice(&self.data[src..src + 4]);
                }
            }
        }
        image
    }

    /// Write raw bytes back without compositing. Pixels that land outside the surface are dropped.
    pub fn put_image_data(&mut self, image: &ImageData, x: i64, y: i64) {
        for row in 0..image.height {
            for col in 0..image.width {
                if let Some(dst) = self.index(x + col as i64, y + row as i64) {
                    let src = (row * image.width + col) * 4;
                    self.data[dst..dst + 4].copy_from_slice(&image.data[src..src + 4]);
                }
            }
        }
    }
}
