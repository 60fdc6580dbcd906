//! Test pattern generation
//!
//! Every pattern is a packed RGB8 buffer, deterministic for a given size
//! (and seed, for the random patterns).

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Test pattern types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPattern {
    /// Horizontal gray gradient, black at the left edge
    GradientH,
    /// Gray ramp through all 256 levels in pixel order
    Grayscale,
    /// The 8 corners of the RGB cube, repeated
    ColorCube,
    /// Hue ramp at full saturation
    HueRamp,
    /// Skin tone samples
    SkinTones,
    /// Flat 8x8 tiles of seeded random colours
    ///
    /// Tiles line up with JPEG blocks, so chroma subsampling leaves the
    /// tile interiors intact.
    Tiles(u64),
    /// Independent random pixels
    Random(u64),
    /// All 255
    White,
}

/// Generate a pattern as a packed RGB8 buffer
pub fn generate_pattern(pattern: TestPattern, width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut data = Vec::with_capacity(pixel_count * 3);

    match pattern {
        TestPattern::GradientH => {
            for _ in 0..height {
                for x in 0..width {
                    let v = (x * 255 / width.saturating_sub(1).max(1)) as u8;
                    data.extend_from_slice(&[v, v, v]);
                }
            }
        }
        TestPattern::Grayscale => {
            for i in 0..pixel_count {
                let v = (i % 256) as u8;
                data.extend_from_slice(&[v, v, v]);
            }
        }
        TestPattern::ColorCube => {
            for i in 0..pixel_count {
                let corner = i % 8;
                let bit = |n: usize| if corner & n != 0 { 255 } else { 0 };
                data.extend_from_slice(&[bit(1), bit(2), bit(4)]);
            }
        }
        TestPattern::HueRamp => {
            for i in 0..pixel_count {
                let hue = i as f32 / pixel_count.max(1) as f32 * 360.0;
                data.extend_from_slice(&hue_to_rgb(hue));
            }
        }
        TestPattern::SkinTones => {
            const TONES: [[u8; 3]; 6] = [
                [255, 224, 189],
                [241, 194, 125],
                [224, 172, 105],
                [198, 134, 66],
                [141, 85, 36],
                [89, 47, 42],
            ];
            for i in 0..pixel_count {
                data.extend_from_slice(&TONES[i % TONES.len()]);
            }
        }
        TestPattern::Tiles(seed) => {
            let tiles_x = width.div_ceil(8);
            let tiles_y = height.div_ceil(8);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let colors: Vec<[u8; 3]> = (0..tiles_x * tiles_y).map(|_| rng.r#gen()).collect();
            for y in 0..height {
                for x in 0..width {
                    data.extend_from_slice(&colors[(y / 8) * tiles_x + x / 8]);
                }
            }
        }
        TestPattern::Random(seed) => {
            data.resize(pixel_count * 3, 0);
            ChaCha8Rng::seed_from_u64(seed).fill_bytes(&mut data);
        }
        TestPattern::White => data.resize(pixel_count * 3, 255),
    }

    data
}

/// Fully saturated, half-lightness colour at `hue` degrees
fn hue_to_rgb(hue: f32) -> [u8; 3] {
    let h = (hue % 360.0) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// Standard test sizes
pub mod sizes {
    pub const TINY: (usize, usize) = (8, 8);
    pub const SMALL: (usize, usize) = (64, 64);
    /// One A4 fax line at 200 dpi, a few lines deep
    pub const FAX_STRIP: (usize, usize) = (1728, 16);
}
