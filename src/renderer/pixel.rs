//! Whole-frame pixel processing.
//!
//! Every pass works on raw RGBA bytes. Results are stored with wrapping byte
//! arithmetic, never clamped: emboss and sepia routinely produce values
//! outside 0..=255 and keep only the low eight bits.

use rand::Rng;

use super::params::RenderParameters;

/// Chance that the noise pass replaces any given pixel.
pub const NOISE_PROBABILITY: f64 = 0.05;

const EMBOSS_BIAS: i32 = 127;

/// Store an integer into a byte, keeping the value modulo 256.
#[inline]
fn wrap_byte(v: i64) -> u8 {
    v.rem_euclid(256) as u8
}

/// Store a real result into a byte: truncate toward negative infinity, then wrap.
#[inline]
fn wrap_real(v: f64) -> u8 {
    wrap_byte(v.floor() as i64)
}

/// In-place emboss over every color byte (alpha untouched).
///
/// `b[i] = 127 + 2·b[i] − b[i+4] − b[i+width·4]`. Right and lower neighbors
/// are read before they are themselves rewritten, so forward iteration sees
/// original values. Near the last row the lower neighbor lies past the end of
/// the buffer; that read has no value, and the byte is stored as 0.
pub fn emboss(data: &mut [u8], width: usize) {
    let stride = width * 4;
    for i in 0..data.len() {
        if i % 4 == 3 {
            continue;
        }
        let (Some(&right), Some(&below)) = (data.get(i + 4), data.get(i + stride)) else {
            data[i] = 0;
            continue;
        };
        let v = EMBOSS_BIAS + 2 * data[i] as i32 - right as i32 - below as i32;
        data[i] = wrap_byte(v as i64);
    }
}

#[inline]
pub fn invert(px: &mut [u8]) {
    px[0] = 255 - px[0];
    px[1] = 255 - px[1];
    px[2] = 255 - px[2];
}

/// ITU-R BT.709 luminance into all three channels.
#[inline]
pub fn grayscale(px: &mut [u8]) {
    let luma = 0.2126 * px[0] as f64 + 0.7152 * px[1] as f64 + 0.0722 * px[2] as f64;
    let v = luma.round() as u8;
    px[0] = v;
    px[1] = v;
    px[2] = v;
}

#[inline]
pub fn sepia(px: &mut [u8]) {
    let base = 0.3 * px[0] as f64 + 0.59 * px[1] as f64 + 0.11 * px[2] as f64;
    px[0] = wrap_real(base + 75.0);
    px[1] = wrap_real(base + 50.0);
    px[2] = wrap_real(base + 25.0);
}

#[inline]
fn noise(px: &mut [u8]) {
    px[0] = 255;
    px[1] = 255;
    px[2] = 0;
    px[3] = 255;
}

/// Run the enabled pixel passes over a full frame: emboss first as its own
/// sweep, then noise, invert, grayscale and sepia per pixel in that order.
pub fn process_frame<R: Rng>(
    data: &mut [u8],
    width: usize,
    params: &RenderParameters,
    rng: &mut R,
) {
    if params.show_emboss {
        emboss(data, width);
    }

    let per_pixel = params.show_noise || params.show_invert || params.show_grayscale || params.show_sepia;
    if !per_pixel {
        return;
    }

    for px in data.chunks_exact_mut(4) {
        if params.show_noise && rng.random_bool(NOISE_PROBABILITY) {
            noise(px);
        }
        if params.show_invert {
            invert(px);
        }
        if params.show_grayscale {
            grayscale(px);
        }
        if params.show_sepia {
            sepia(px);
        }
    }
}
