//! Colorimetric transforms between sRGB and ITU Lab
//!
//! The forward path is 8-bit sRGB → linear → XYZ (D65 matrix) → relative XYZ
//! → CIELAB → ITU Lab code. The inverse runs the same stages backwards.
//! Per-pixel functions are exposed for inspection; the batch functions are
//! what the pipelines call once per scanline.

use multiversion::multiversion;

use crate::color::{Lab, Xyz};
use crate::math::gamma::{
    linear_to_srgb_u8, linear_to_srgb_u8_lut, srgb_u8_to_linear, srgb_u8_to_linear_lut,
};
use crate::math::{SRGB_TO_XYZ, XYZ_TO_SRGB};
use crate::params::LabParams;
use crate::{Error, Result};

/// Options for the transform engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// Use precomputed gamma tables instead of evaluating `powf` per sample.
    ///
    /// The two paths agree within one code step.
    pub use_lookup_tables: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            use_lookup_tables: true,
        }
    }
}

/// Dequantize an ITU Lab code to CIELAB
#[inline]
pub fn code_to_lab(params: &LabParams, code: [u8; 3]) -> Lab {
    let [range_l, range_a, range_b] = params.range();
    let [offset_l, offset_a, offset_b] = params.offset();

    let (mut a, mut b) = (code[1], code[2]);
    if params.ab_are_signed() {
        a = a.wrapping_add(128);
        b = b.wrapping_add(128);
    }

    Lab::new(
        range_l * (code[0] as f64 - offset_l),
        range_a * (a as f64 - offset_a),
        range_b * (b as f64 - offset_b),
    )
}

/// Quantize CIELAB to an ITU Lab code, saturating at 0 and 255
#[inline]
pub fn lab_to_code(params: &LabParams, lab: Lab) -> [u8; 3] {
    let [range_l, range_a, range_b] = params.range();
    let [offset_l, offset_a, offset_b] = params.offset();

    let l = quantize(lab.l, range_l, offset_l);
    let mut a = quantize(lab.a, range_a, offset_a);
    let mut b = quantize(lab.b, range_b, offset_b);
    if params.ab_are_signed() {
        a = a.wrapping_sub(128);
        b = b.wrapping_sub(128);
    }
    [l, a, b]
}

#[inline]
fn quantize(value: f64, range: f64, offset: f64) -> u8 {
    // NaN falls through the clamp and casts to 0
    (value / range + offset).floor().clamp(0.0, 255.0) as u8
}

/// Convert one 8-bit sRGB pixel to CIELAB under the configured white
#[inline]
pub fn srgb_pixel_to_lab(params: &LabParams, rgb: [u8; 3], options: TransformOptions) -> Lab {
    let decode = if options.use_lookup_tables {
        srgb_u8_to_linear_lut
    } else {
        srgb_u8_to_linear
    };
    let linear = [decode(rgb[0]), decode(rgb[1]), decode(rgb[2])];

    let xyz = Xyz::from_array(SRGB_TO_XYZ.multiply_vec(linear));
    Lab::from_relative_xyz(xyz.relative_to(&params.white_point()))
}

/// Convert CIELAB to one 8-bit sRGB pixel, clipping out-of-gamut colours
#[inline]
pub fn lab_to_srgb_pixel(params: &LabParams, lab: Lab, options: TransformOptions) -> [u8; 3] {
    let xyz = lab.to_relative_xyz().absolute_from(&params.white_point());
    let linear = XYZ_TO_SRGB.multiply_vec(xyz.to_array());

    let encode = if options.use_lookup_tables {
        linear_to_srgb_u8_lut
    } else {
        linear_to_srgb_u8
    };
    [encode(linear[0]), encode(linear[1]), encode(linear[2])]
}

/// Convert packed sRGB samples to ITU Lab codes
///
/// `src` holds whole RGB triples; `dst` must be at least as long. Only the
/// first `src.len()` bytes of `dst` are written.
pub fn srgb_to_itulab(
    params: &LabParams,
    src: &[u8],
    dst: &mut [u8],
    options: TransformOptions,
) -> Result<()> {
    let (src, dst) = pixel_views(src, dst)?;
    convert_pixels(src, dst, |rgb| {
        lab_to_code(params, srgb_pixel_to_lab(params, rgb, options))
    });
    Ok(())
}

/// Convert packed ITU Lab codes to sRGB samples
///
/// Same buffer rules as [`srgb_to_itulab`].
pub fn itulab_to_srgb(
    params: &LabParams,
    src: &[u8],
    dst: &mut [u8],
    options: TransformOptions,
) -> Result<()> {
    let (src, dst) = pixel_views(src, dst)?;
    convert_pixels(src, dst, |code| {
        lab_to_srgb_pixel(params, code_to_lab(params, code), options)
    });
    Ok(())
}

fn pixel_views<'a, 'b>(
    src: &'a [u8],
    dst: &'b mut [u8],
) -> Result<(&'a [[u8; 3]], &'b mut [[u8; 3]])> {
    if src.len() % 3 != 0 {
        return Err(Error::InvalidInput(format!(
            "buffer of {} bytes does not hold whole 3-channel pixels",
            src.len()
        )));
    }
    if dst.len() < src.len() {
        return Err(Error::BufferSize {
            expected: src.len(),
            actual: dst.len(),
        });
    }

    let dst = &mut dst[..src.len()];
    Ok((bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst)))
}

#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
fn convert_pixels<F>(src: &[[u8; 3]], dst: &mut [[u8; 3]], convert: F)
where
    F: Fn([u8; 3]) -> [u8; 3],
{
    for (input, output) in src.iter().zip(dst.iter_mut()) {
        *output = convert(*input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::GamutBounds;

    const DIRECT: TransformOptions = TransformOptions {
        use_lookup_tables: false,
    };

    fn d65_params(gamut: &GamutBounds) -> LabParams {
        let mut params = LabParams::default();
        params.set_illuminant_from_tag(b"\0D65").unwrap();
        params.set_gamut_by_bounds(gamut, false).unwrap();
        params
    }

    fn max_diff(a: [u8; 3], b: [u8; 3]) -> i32 {
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| (x as i32 - y as i32).abs())
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_white_under_d65() {
        let params = d65_params(&GamutBounds::T42_DEFAULT);
        for options in [TransformOptions::default(), DIRECT] {
            let lab = srgb_pixel_to_lab(&params, [255, 255, 255], options);
            assert!((lab.l - 100.0).abs() < 1e-9, "L = {}", lab.l);
            assert!(lab.a.abs() < 0.05);
            assert!(lab.b.abs() < 0.05);
            assert_eq!(lab_to_code(&params, lab)[0], 255);
        }
    }

    #[test]
    fn test_black_is_code_zero() {
        let params = d65_params(&GamutBounds::T42_DEFAULT);
        let lab = srgb_pixel_to_lab(&params, [0, 0, 0], DIRECT);
        assert!(lab.approx_eq(&Lab::new(0.0, 0.0, 0.0), 1e-9));
        assert_eq!(lab_to_code(&params, lab), [0, 127, 95]);
    }

    #[test]
    fn test_quantize_default_gamut() {
        let params = LabParams::default();
        assert_eq!(lab_to_code(&params, Lab::new(50.0, 0.0, 0.0)), [127, 127, 95]);
    }

    #[test]
    fn test_quantize_saturates() {
        let params = LabParams::default();
        assert_eq!(
            lab_to_code(&params, Lab::new(-5.0, -200.0, 300.0)),
            [0, 0, 255]
        );
        assert_eq!(
            lab_to_code(&params, Lab::new(1000.0, 1000.0, -1000.0)),
            [255, 255, 0]
        );
        assert_eq!(lab_to_code(&params, Lab::new(f64::NAN, 0.0, 0.0))[0], 0);
    }

    #[test]
    fn test_signed_codes_wrap() {
        let mut params = LabParams::default();
        params
            .set_gamut_by_bounds(&GamutBounds::FULL_RANGE, true)
            .unwrap();

        assert_eq!(lab_to_code(&params, Lab::new(0.0, 0.0, 0.0)), [0, 0, 0]);
        // -1 is stored as two's complement
        assert_eq!(lab_to_code(&params, Lab::new(0.0, -1.0, 5.0)), [0, 255, 5]);

        let lab = code_to_lab(&params, [0, 255, 5]);
        assert!(lab.approx_eq(&Lab::new(0.0, -1.0, 5.0), 1e-9));
    }

    #[test]
    fn test_code_lab_code_within_one() {
        let params = d65_params(&GamutBounds::FULL_RANGE);
        for l in 0..=255u8 {
            for a in (0..=255u8).step_by(5) {
                let code = [l, a, 255 - a];
                let back = lab_to_code(&params, code_to_lab(&params, code));
                assert!(max_diff(code, back) <= 1, "{:?} -> {:?}", code, back);
            }
        }
    }

    #[test]
    fn test_full_range_roundtrip() {
        let params = d65_params(&GamutBounds::FULL_RANGE);
        for options in [TransformOptions::default(), DIRECT] {
            for r in (0..=255u8).step_by(17) {
                for g in (0..=255u8).step_by(17) {
                    for b in (0..=255u8).step_by(17) {
                        let code = lab_to_code(&params, srgb_pixel_to_lab(&params, [r, g, b], options));
                        let rgb = lab_to_srgb_pixel(&params, code_to_lab(&params, code), options);
                        let back = lab_to_code(&params, srgb_pixel_to_lab(&params, rgb, options));
                        assert!(
                            max_diff(code, back) <= 1,
                            "rgb {:?}: {:?} -> {:?}",
                            [r, g, b],
                            code,
                            back
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_lookup_tables_match_direct() {
        let params = LabParams::default();
        for l in (0..=255u8).step_by(15) {
            for a in (0..=255u8).step_by(15) {
                for b in (0..=255u8).step_by(15) {
                    let lab = code_to_lab(&params, [l, a, b]);
                    let table = lab_to_srgb_pixel(&params, lab, TransformOptions::default());
                    let direct = lab_to_srgb_pixel(&params, lab, DIRECT);
                    assert!(max_diff(table, direct) <= 1);
                }
            }
        }
    }

    #[test]
    fn test_batch_gray_ramp() {
        let params = d65_params(&GamutBounds::T42_DEFAULT);
        let src: Vec<u8> = (0..=255u8).flat_map(|v| [v, v, v]).collect();
        let mut lab = vec![0u8; src.len()];
        let mut rgb = vec![0u8; src.len()];

        srgb_to_itulab(&params, &src, &mut lab, TransformOptions::default()).unwrap();
        itulab_to_srgb(&params, &lab, &mut rgb, TransformOptions::default()).unwrap();

        for (i, (&orig, &back)) in src.iter().zip(rgb.iter()).enumerate() {
            assert!(
                (orig as i32 - back as i32).abs() <= 3,
                "sample {}: {} -> {}",
                i,
                orig,
                back
            );
        }
    }

    #[test]
    fn test_batch_matches_per_pixel() {
        let params = LabParams::default();
        let src = [10u8, 200, 30, 255, 0, 128];
        let mut dst = [0u8; 6];
        srgb_to_itulab(&params, &src, &mut dst, DIRECT).unwrap();

        for (pixel, out) in src.chunks_exact(3).zip(dst.chunks_exact(3)) {
            let expected = lab_to_code(
                &params,
                srgb_pixel_to_lab(&params, [pixel[0], pixel[1], pixel[2]], DIRECT),
            );
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn test_batch_zero_pixels() {
        let params = LabParams::default();
        let mut dst: [u8; 0] = [];
        srgb_to_itulab(&params, &[], &mut dst, TransformOptions::default()).unwrap();
        itulab_to_srgb(&params, &[], &mut dst, TransformOptions::default()).unwrap();
    }

    #[test]
    fn test_batch_length_checks() {
        let params = LabParams::default();
        let mut dst = [0u8; 6];
        assert!(matches!(
            srgb_to_itulab(&params, &[0u8; 4], &mut dst, TransformOptions::default()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            itulab_to_srgb(&params, &[0u8; 9], &mut dst, TransformOptions::default()),
            Err(Error::BufferSize {
                expected: 9,
                actual: 6
            })
        ));
    }

    #[test]
    fn test_longer_destination_tail_untouched() {
        let params = LabParams::default();
        let mut dst = [7u8; 6];
        srgb_to_itulab(&params, &[255, 255, 255], &mut dst, DIRECT).unwrap();
        assert_eq!(&dst[3..], &[7, 7, 7]);
    }
}
