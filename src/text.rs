//! Bitmap text rendering.
//!
//! Draws ASCII text from an embedded 5x7 font at integer scale factors, with
//! optional rotation. Rotated text is rasterized by inverse-mapping each
//! destination pixel back into the unrotated glyph strip, so 45 degree
//! labels stay solid.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

/// Glyph width in font pixels.
pub const GLYPH_W: u32 = 5;
/// Glyph height in font pixels.
pub const GLYPH_H: u32 = 7;
/// Horizontal advance per character (glyph plus one column of spacing).
pub const ADVANCE: u32 = 6;
/// Nominal line height used to convert point sizes into scale factors.
pub const LINE_H: u32 = 9;

/// Glyph rows for ASCII 32..=126; each row's lower 5 bits are pixels, MSB left.
#[rustfmt::skip]
const FONT_5X7: [[u8; 7]; 95] = [
    [0x00,0x00,0x00,0x00,0x00,0x00,0x00], // 32 ' '
    [0x04,0x04,0x04,0x04,0x04,0x00,0x04], // 33 '!'
    [0x0A,0x0A,0x0A,0x00,0x00,0x00,0x00], // 34 '"'
    [0x0A,0x0A,0x1F,0x0A,0x1F,0x0A,0x0A], // 35 '#'
    [0x04,0x0F,0x14,0x0E,0x05,0x1E,0x04], // 36 '$'
    [0x18,0x19,0x02,0x04,0x08,0x13,0x03], // 37 '%'
    [0x0C,0x12,0x14,0x08,0x15,0x12,0x0D], // 38 '&'
    [0x04,0x04,0x08,0x00,0x00,0x00,0x00], // 39 '''
    [0x02,0x04,0x08,0x08,0x08,0x04,0x02], // 40 '('
    [0x08,0x04,0x02,0x02,0x02,0x04,0x08], // 41 ')'
    [0x00,0x04,0x15,0x0E,0x15,0x04,0x00], // 42 '*'
    [0x00,0x04,0x04,0x1F,0x04,0x04,0x00], // 43 '+'
    [0x00,0x00,0x00,0x00,0x00,0x04,0x08], // 44 ','
    [0x00,0x00,0x00,0x1F,0x00,0x00,0x00], // 45 '-'
    [0x00,0x00,0x00,0x00,0x00,0x00,0x04], // 46 '.'
    [0x00,0x01,0x02,0x04,0x08,0x10,0x00], // 47 '/'
    [0x0E,0x11,0x13,0x15,0x19,0x11,0x0E], // 48 '0'
    [0x04,0x0C,0x04,0x04,0x04,0x04,0x0E], // 49 '1'
    [0x0E,0x11,0x01,0x02,0x04,0x08,0x1F], // 50 '2'
    [0x1F,0x02,0x04,0x02,0x01,0x11,0x0E], // 51 '3'
    [0x02,0x06,0x0A,0x12,0x1F,0x02,0x02], // 52 '4'
    [0x1F,0x10,0x1E,0x01,0x01,0x11,0x0E], // 53 '5'
    [0x06,0x08,0x10,0x1E,0x11,0x11,0x0E], // 54 '6'
    [0x1F,0x01,0x02,0x04,0x08,0x08,0x08], // 55 '7'
    [0x0E,0x11,0x11,0x0E,0x11,0x11,0x0E], // 56 '8'
    [0x0E,0x11,0x11,0x0F,0x01,0x02,0x0C], // 57 '9'
    [0x00,0x00,0x04,0x00,0x00,0x04,0x00], // 58 ':'
    [0x00,0x00,0x04,0x00,0x00,0x04,0x08], // 59 ';'
    [0x02,0x04,0x08,0x10,0x08,0x04,0x02], // 60 '<'
    [0x00,0x00,0x1F,0x00,0x1F,0x00,0x00], // 61 '='
    [0x08,0x04,0x02,0x01,0x02,0x04,0x08], // 62 '>'
    [0x0E,0x11,0x01,0x02,0x04,0x00,0x04], // 63 '?'
    [0x0E,0x11,0x17,0x15,0x17,0x10,0x0E], // 64 '@'
    [0x0E,0x11,0x11,0x1F,0x11,0x11,0x11], // 65 'A'
    [0x1E,0x11,0x11,0x1E,0x11,0x11,0x1E], // 66 'B'
    [0x0E,0x11,0x10,0x10,0x10,0x11,0x0E], // 67 'C'
    [0x1C,0x12,0x11,0x11,0x11,0x12,0x1C], // 68 'D'
    [0x1F,0x10,0x10,0x1E,0x10,0x10,0x1F], // 69 'E'
    [0x1F,0x10,0x10,0x1E,0x10,0x10,0x10], // 70 'F'
    [0x0E,0x11,0x10,0x17,0x11,0x11,0x0F], // 71 'G'
    [0x11,0x11,0x11,0x1F,0x11,0x11,0x11], // 72 'H'
    [0x0E,0x04,0x04,0x04,0x04,0x04,0x0E], // 73 'I'
    [0x07,0x02,0x02,0x02,0x02,0x12,0x0C], // 74 'J'
    [0x11,0x12,0x14,0x18,0x14,0x12,0x11], // 75 'K'
    [0x10,0x10,0x10,0x10,0x10,0x10,0x1F], // 76 'L'
    [0x11,0x1B,0x15,0x15,0x11,0x11,0x11], // 77 'M'
    [0x11,0x11,0x19,0x15,0x13,0x11,0x11], // 78 'N'
    [0x0E,0x11,0x11,0x11,0x11,0x11,0x0E], // 79 'O'
    [0x1E,0x11,0x11,0x1E,0x10,0x10,0x10], // 80 'P'
    [0x0E,0x11,0x11,0x11,0x15,0x12,0x0D], // 81 'Q'
    [0x1E,0x11,0x11,0x1E,0x14,0x12,0x11], // 82 'R'
    [0x0F,0x10,0x10,0x0E,0x01,0x01,0x1E], // 83 'S'
    [0x1F,0x04,0x04,0x04,0x04,0x04,0x04], // 84 'T'
    [0x11,0x11,0x11,0x11,0x11,0x11,0x0E], // 85 'U'
    [0x11,0x11,0x11,0x11,0x11,0x0A,0x04], // 86 'V'
    [0x11,0x11,0x11,0x15,0x15,0x1B,0x11], // 87 'W'
    [0x11,0x11,0x0A,0x04,0x0A,0x11,0x11], // 88 'X'
    [0x11,0x11,0x0A,0x04,0x04,0x04,0x04], // 89 'Y'
    [0x1F,0x01,0x02,0x04,0x08,0x10,0x1F], // 90 'Z'
    [0x0E,0x08,0x08,0x08,0x08,0x08,0x0E], // 91 '['
    [0x00,0x10,0x08,0x04,0x02,0x01,0x00], // 92 '\'
    [0x0E,0x02,0x02,0x02,0x02,0x02,0x0E], // 93 ']'
    [0x04,0x0A,0x11,0x00,0x00,0x00,0x00], // 94 '^'
    [0x00,0x00,0x00,0x00,0x00,0x00,0x1F], // 95 '_'
    [0x08,0x04,0x02,0x00,0x00,0x00,0x00], // 96 '`'
    [0x00,0x00,0x0E,0x01,0x0F,0x11,0x0F], // 97 'a'
    [0x10,0x10,0x16,0x19,0x11,0x11,0x1E], // 98 'b'
    [0x00,0x00,0x0E,0x10,0x10,0x11,0x0E], // 99 'c'
    [0x01,0x01,0x0D,0x13,0x11,0x11,0x0F], // 100 'd'
    [0x00,0x00,0x0E,0x11,0x1F,0x10,0x0E], // 101 'e'
    [0x06,0x09,0x08,0x1C,0x08,0x08,0x08], // 102 'f'
    [0x00,0x00,0x0F,0x11,0x0F,0x01,0x0E], // 103 'g'
    [0x10,0x10,0x16,0x19,0x11,0x11,0x11], // 104 'h'
    [0x04,0x00,0x0C,0x04,0x04,0x04,0x0E], // 105 'i'
    [0x02,0x00,0x06,0x02,0x02,0x12,0x0C], // 106 'j'
    [0x10,0x10,0x12,0x14,0x18,0x14,0x12], // 107 'k'
    [0x0C,0x04,0x04,0x04,0x04,0x04,0x0E], // 108 'l'
    [0x00,0x00,0x1A,0x15,0x15,0x11,0x11], // 109 'm'
    [0x00,0x00,0x16,0x19,0x11,0x11,0x11], // 110 'n'
    [0x00,0x00,0x0E,0x11,0x11,0x11,0x0E], // 111 'o'
    [0x00,0x00,0x1E,0x11,0x1E,0x10,0x10], // 112 'p'
    [0x00,0x00,0x0D,0x13,0x0F,0x01,0x01], // 113 'q'
    [0x00,0x00,0x16,0x19,0x10,0x10,0x10], // 114 'r'
    [0x00,0x00,0x0E,0x10,0x0E,0x01,0x1E], // 115 's'
    [0x08,0x08,0x1C,0x08,0x08,0x09,0x06], // 116 't'
    [0x00,0x00,0x11,0x11,0x11,0x13,0x0D], // 117 'u'
    [0x00,0x00,0x11,0x11,0x11,0x0A,0x04], // 118 'v'
    [0x00,0x00,0x11,0x11,0x15,0x15,0x0A], // 119 'w'
    [0x00,0x00,0x11,0x0A,0x04,0x0A,0x11], // 120 'x'
    [0x00,0x00,0x11,0x11,0x0F,0x01,0x0E], // 121 'y'
    [0x00,0x00,0x1F,0x02,0x04,0x08,0x1F], // 122 'z'
    [0x02,0x04,0x04,0x08,0x04,0x04,0x02], // 123 '{'
    [0x04,0x04,0x04,0x04,0x04,0x04,0x04], // 124 '|'
    [0x08,0x04,0x04,0x02,0x04,0x04,0x08], // 125 '}'
    [0x00,0x00,0x08,0x15,0x02,0x00,0x00], // 126 '~'
];

/// Counter-clockwise text rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// Horizontal, left to right.
    #[default]
    None,
    /// Rising to the right at 45 degrees.
    Deg45,
    /// Vertical, reading bottom to top.
    Deg90,
}

impl Rotation {
    fn radians(self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Deg45 => std::f32::consts::FRAC_PI_4,
            Self::Deg90 => std::f32::consts::FRAC_PI_2,
        }
    }
}

/// How text is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Ink color.
    pub color: Rgba,
    /// Integer magnification of the 5x7 font (>= 1).
    pub scale: u32,
    /// Rotation applied around the text's top-left corner.
    pub rotation: Rotation,
}

impl TextStyle {
    /// Horizontal text at the given scale.
    #[must_use]
    pub fn new(color: Rgba, scale: u32) -> Self {
        Self { color, scale: scale.max(1), rotation: Rotation::None }
    }

    /// Same style with a rotation.
    #[must_use]
    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Font scale for a size in points at the given DPI.
#[must_use]
pub fn scale_for_points(points: f32, dpi: u32) -> u32 {
    let px = points * dpi as f32 / 72.0;
    ((px / LINE_H as f32).floor() as u32).max(1)
}

/// Unrotated width and height of `text` in pixels.
#[must_use]
pub fn measure(text: &str, scale: u32) -> (u32, u32) {
    let n = text.chars().count() as u32;
    if n == 0 {
        return (0, 0);
    }
    (n * ADVANCE * scale - scale, GLYPH_H * scale)
}

/// Rotated bounding box of the text strip: (min_x, min_y, max_x, max_y)
/// relative to the unrotated top-left corner.
fn rotated_box(w: f32, h: f32, rotation: Rotation) -> (f32, f32, f32, f32) {
    let (sin, cos) = rotation.radians().sin_cos();
    let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)];
    corners.iter().fold(
        (f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        |(x0, y0, x1, y1), &(u, v)| {
            let dx = u * cos + v * sin;
            let dy = -u * sin + v * cos;
            (x0.min(dx), y0.min(dy), x1.max(dx), y1.max(dy))
        },
    )
}

/// Width and height of the rendered text after rotation.
#[must_use]
pub fn extent(text: &str, style: &TextStyle) -> (u32, u32) {
    let (w, h) = measure(text, style.scale);
    if w == 0 {
        return (0, 0);
    }
    let (x0, y0, x1, y1) = rotated_box(w as f32, h as f32, style.rotation);
    ((x1 - x0).round() as u32, (y1 - y0).round() as u32)
}

fn glyph_bits(ch: char) -> Option<&'static [u8; 7]> {
    let code = ch as u32;
    if (32..=126).contains(&code) {
        Some(&FONT_5X7[(code - 32) as usize])
    } else {
        None
    }
}

/// Whether the unrotated text strip is inked at font-space point (u, v).
fn ink_at(chars: &[char], scale: u32, u: f32, v: f32) -> bool {
    if u < 0.0 || v < 0.0 {
        return false;
    }
    let (u, v) = (u as u32 / scale, v as u32 / scale);
    let index = (u / ADVANCE) as usize;
    let col = u % ADVANCE;
    if col >= GLYPH_W || v >= GLYPH_H {
        return false;
    }
    chars
        .get(index)
        .and_then(|&ch| glyph_bits(ch))
        .is_some_and(|rows| rows[v as usize] & (0x10 >> col) != 0)
}

/// Draw `text` so that its rotated bounding box has its top-left at (x, y).
///
/// Characters outside printable ASCII render as blanks.
pub fn draw_text(fb: &mut Framebuffer, x: i32, y: i32, text: &str, style: &TextStyle) {
    let chars: Vec<char> = text.chars().collect();
    let (w, h) = measure(text, style.scale);
    if w == 0 {
        return;
    }

    if style.rotation == Rotation::None {
        for py in 0..h {
            for px in 0..w {
                if ink_at(&chars, style.scale, px as f32, py as f32) {
                    fb.set_pixel_i32(x + px as i32, y + py as i32, style.color);
                }
            }
        }
        return;
    }

    let (sin, cos) = style.rotation.radians().sin_cos();
    let (min_x, min_y, _, _) = rotated_box(w as f32, h as f32, style.rotation);
    let (box_w, box_h) = extent(text, style);

    for py in 0..=box_h {
        for px in 0..=box_w {
            let dx = px as f32 + 0.5 + min_x;
            let dy = py as f32 + 0.5 + min_y;
            let u = dx * cos - dy * sin;
            let v = dx * sin + dy * cos;
            if u < w as f32 && v < h as f32 && ink_at(&chars, style.scale, u, v) {
                fb.set_pixel_i32(x + px as i32, y + py as i32, style.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink_count(fb: &Framebuffer) -> usize {
        let mut n = 0;
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                if fb.get_pixel(x, y) == Some(Rgba::BLACK) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_measure() {
        assert_eq!(measure("", 1), (0, 0));
        assert_eq!(measure("Mon", 1), (17, 7));
        assert_eq!(measure("Mon", 2), (34, 14));
    }

    #[test]
    fn test_scale_for_points() {
        // 16.2pt at 64 dpi is ~14px: still the base font
        assert_eq!(scale_for_points(16.2, 64), 1);
        assert_eq!(scale_for_points(7.0, 64), 1);
        assert_eq!(scale_for_points(24.0, 72), 2);
    }

    #[test]
    fn test_extent_rotations() {
        let style = TextStyle::new(Rgba::BLACK, 1);
        assert_eq!(extent("Day", &style), (17, 7));
        assert_eq!(extent("Day", &style.rotated(Rotation::Deg90)), (7, 17));
        let (w, h) = extent("00:00", &style.rotated(Rotation::Deg45));
        assert_eq!(w, h);
        assert!(w > 20 && w < 30, "45 degree extent was {w}");
    }

    #[test]
    fn test_draw_text_inks_pixels() {
        let mut fb = Framebuffer::new(40, 12).unwrap();
        fb.clear(Rgba::WHITE);
        draw_text(&mut fb, 1, 1, "Mon", &TextStyle::new(Rgba::BLACK, 1));
        assert!(ink_count(&fb) > 20);
        // 'M' has its top-left pixel set
        assert_eq!(fb.get_pixel(1, 1), Some(Rgba::BLACK));
        // Nothing drawn right of the measured width
        assert_eq!(fb.get_pixel(19, 4), Some(Rgba::WHITE));
    }

    #[test]
    fn test_rotated_90_keeps_ink() {
        let style = TextStyle::new(Rgba::BLACK, 1);
        let mut flat = Framebuffer::new(40, 40).unwrap();
        flat.clear(Rgba::WHITE);
        draw_text(&mut flat, 0, 0, "Hour", &style);

        let mut vertical = Framebuffer::new(40, 40).unwrap();
        vertical.clear(Rgba::WHITE);
        draw_text(&mut vertical, 0, 0, "Hour", &style.rotated(Rotation::Deg90));

        assert_eq!(ink_count(&flat), ink_count(&vertical));
        let bounds = vertical.content_bounds(Rgba::WHITE).unwrap();
        assert!(bounds.width <= 7 && bounds.height <= 23);
    }

    #[test]
    fn test_rotated_45_stays_in_extent() {
        let style = TextStyle::new(Rgba::BLACK, 1).rotated(Rotation::Deg45);
        let mut fb = Framebuffer::new(60, 60).unwrap();
        fb.clear(Rgba::WHITE);
        draw_text(&mut fb, 10, 10, "12:00", &style);

        let (w, h) = extent("12:00", &style);
        let bounds = fb.content_bounds(Rgba::WHITE).unwrap();
        assert!(bounds.x >= 10 && bounds.y >= 10);
        assert!(bounds.right() <= 10 + w + 1 && bounds.bottom() <= 10 + h + 1);
        assert!(ink_count(&fb) > 15);
    }

    #[test]
    fn test_non_ascii_is_blank() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::WHITE);
        draw_text(&mut fb, 0, 0, "\u{e9}", &TextStyle::new(Rgba::BLACK, 1));
        assert_eq!(fb.content_bounds(Rgba::WHITE), None);
    }
}
