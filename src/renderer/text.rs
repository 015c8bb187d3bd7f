//! Bitmap font text for the pixel canvas.
//!
//! Glyphs are 8×8, one byte per row with the most significant bit on the
//! left, scaled by an integer factor. Lowercase letters render as uppercase.

use super::canvas::Canvas;
use crate::color::RgbColor;

pub const GLYPH_SIZE: usize = 8;

fn glyph(ch: char) -> Option<[u8; 8]> {
    let ch = ch.to_ascii_uppercase();
    Some(match ch {
        'A' => [0x18, 0x24, 0x42, 0x7E, 0x42, 0x42, 0x42, 0x00],
        'B' => [0x7C, 0x42, 0x7C, 0x42, 0x42, 0x42, 0x7C, 0x00],
        'C' => [0x3C, 0x42, 0x40, 0x40, 0x40, 0x42, 0x3C, 0x00],
        'D' => [0x78, 0x44, 0x42, 0x42, 0x42, 0x44, 0x78, 0x00],
        'E' => [0x7E, 0x40, 0x7C, 0x40, 0x40, 0x40, 0x7E, 0x00],
        'F' => [0x7E, 0x40, 0x7C, 0x40, 0x40, 0x40, 0x40, 0x00],
        'G' => [0x3C, 0x42, 0x40, 0x4E, 0x42, 0x42, 0x3C, 0x00],
        'H' => [0x42, 0x42, 0x7E, 0x42, 0x42, 0x42, 0x42, 0x00],
        'I' => [0x3E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x3E, 0x00],
        'J' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x44, 0x38, 0x00],
        'K' => [0x42, 0x44, 0x78, 0x48, 0x44, 0x42, 0x42, 0x00],
        'L' => [0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x7E, 0x00],
        'M' => [0x42, 0x66, 0x5A, 0x42, 0x42, 0x42, 0x42, 0x00],
        'N' => [0x42, 0x62, 0x52, 0x4A, 0x46, 0x42, 0x42, 0x00],
        'O' => [0x3C, 0x42, 0x42, 0x42, 0x42, 0x42, 0x3C, 0x00],
        'P' => [0x7C, 0x42, 0x42, 0x7C, 0x40, 0x40, 0x40, 0x00],
        'Q' => [0x3C, 0x42, 0x42, 0x42, 0x4A, 0x44, 0x3A, 0x00],
        'R' => [0x7C, 0x42, 0x42, 0x7C, 0x48, 0x44, 0x42, 0x00],
        'S' => [0x3C, 0x42, 0x30, 0x0C, 0x02, 0x42, 0x3C, 0x00],
        'T' => [0x7F, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00],
        'U' => [0x42, 0x42, 0x42, 0x42, 0x42, 0x42, 0x3C, 0x00],
        'V' => [0x42, 0x42, 0x42, 0x42, 0x24, 0x24, 0x18, 0x00],
        'W' => [0x42, 0x42, 0x42, 0x5A, 0x5A, 0x66, 0x42, 0x00],
        'X' => [0x42, 0x24, 0x18, 0x18, 0x24, 0x42, 0x42, 0x00],
        'Y' => [0x41, 0x22, 0x14, 0x08, 0x08, 0x08, 0x08, 0x00],
        'Z' => [0x7E, 0x04, 0x08, 0x10, 0x20, 0x40, 0x7E, 0x00],
        '0' => [0x3C, 0x42, 0x46, 0x5A, 0x62, 0x42, 0x3C, 0x00],
        '1' => [0x08, 0x18, 0x28, 0x08, 0x08, 0x08, 0x3E, 0x00],
        '2' => [0x3C, 0x42, 0x02, 0x0C, 0x30, 0x40, 0x7E, 0x00],
        '3' => [0x3C, 0x42, 0x02, 0x1C, 0x02, 0x42, 0x3C, 0x00],
        '4' => [0x04, 0x0C, 0x14, 0x24, 0x7E, 0x04, 0x04, 0x00],
        '5' => [0x7E, 0x40, 0x7C, 0x02, 0x02, 0x42, 0x3C, 0x00],
        '6' => [0x1C, 0x20, 0x40, 0x7C, 0x42, 0x42, 0x3C, 0x00],
        '7' => [0x7E, 0x02, 0x04, 0x08, 0x10, 0x10, 0x10, 0x00],
        '8' => [0x3C, 0x42, 0x42, 0x3C, 0x42, 0x42, 0x3C, 0x00],
        '9' => [0x3C, 0x42, 0x42, 0x3E, 0x02, 0x04, 0x38, 0x00],
        ' ' => [0x00; 8],
        '-' => [0x00, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x08, 0x10],
        ':' => [0x00, 0x18, 0x18, 0x00, 0x18, 0x18, 0x00, 0x00],
        '/' => [0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x00, 0x00],
        _ => return None,
    })
}

/// Pixel width of `text` at `scale`, one pixel of tracking per scale step.
pub fn text_width(text: &str, scale: usize) -> usize {
    let count = text.chars().count();
    if count == 0 {
        return 0;
    }
    count * GLYPH_SIZE * scale + (count - 1) * scale
}

/// Draw a glyph with its top-left corner at (x, y). Unknown characters are skipped.
pub fn draw_char(canvas: &mut Canvas, x: i64, y: i64, ch: char, scale: usize, color: RgbColor, alpha: f32) {
    let Some(bitmap) = glyph(ch) else {
        return;
    };
    let scale = scale as i64;

    for (row_idx, &row) in bitmap.iter().enumerate() {
        for col in 0..GLYPH_SIZE {
            if (row >> (7 - col)) & 1 == 0 {
                continue;
            }
            for sy in 0..scale {
                for sx in 0..scale {
                    let px = x + col as i64 * scale + sx;
                    let py = y + row_idx as i64 * scale + sy;
                    canvas.blend_pixel(px, py, color, alpha);
                }
            }
        }
    }
}

/// Draw one line of text horizontally centred on `cx`, vertically centred on `cy`.
pub fn draw_centered_line(
    canvas: &mut Canvas,
    text: &str,
    cx: f64,
    cy: f64,
    scale: usize,
    color: RgbColor,
    alpha: f32,
) {
    let scale = scale.max(1);
    let width = text_width(text, scale) as f64;
    let height = (GLYPH_SIZE * scale) as f64;
    let left = (cx - width / 2.0).round() as i64;
    let top = (cy - height / 2.0).round() as i64;
    let advance = ((GLYPH_SIZE + 1) * scale) as i64;

    for (i, ch) in text.chars().enumerate() {
        draw_char(canvas, left + i as i64 * advance, top, ch, scale, color, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_accounts_for_tracking() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("A", 1), 8);
        assert_eq!(text_width("12:00", 2), 5 * 16 + 4 * 2);
    }

    #[test]
    fn centered_text_stays_inside_canvas() {
        let mut canvas = Canvas::new(64, 16);
        draw_centered_line(&mut canvas, "12:34", 32.0, 8.0, 1, RgbColor::YELLOW, 1.0);
        let lit = canvas.data().chunks_exact(4).filter(|p| p[3] > 0).count();
        assert!(lit > 0);
        // the colon's top dot at column 3..5 of the third glyph
        let colon_left = 32 - 44 / 2 + 2 * 9;
        assert_eq!(canvas.get_pixel(colon_left + 3, 8 - 4 + 1).3, 255);
    }

    #[test]
    fn unknown_glyphs_are_skipped() {
        let mut canvas = Canvas::new(16, 16);
        draw_char(&mut canvas, 0, 0, '§', 1, RgbColor::YELLOW, 1.0);
        assert!(canvas.data().iter().all(|&b| b == 0));
    }
}
