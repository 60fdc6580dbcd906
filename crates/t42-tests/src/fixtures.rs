//! Fixture JPEG streams
//!
//! Plain sRGB and grayscale files come straight from `jpeg-encoder` so
//! they carry no G3FAX records. Lab files are produced by the engine.

use anyhow::{Context, Result};
use jpeg_encoder::{ColorType, Density, Encoder};
use t42_core::{ConvertOptions, LabParams, srgb_to_itulab_jpeg};

/// Baseline sRGB JPEG with a JFIF density, no G3FAX records
pub fn srgb_jpeg(rgb: &[u8], width: u16, height: u16, dpi: u16) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut encoder = Encoder::new(&mut out, 95);
    encoder.set_density(Density::Inch { x: dpi, y: dpi });
    encoder
        .encode(rgb, width, height, ColorType::Rgb)
        .context("encoding sRGB fixture")?;
    Ok(out)
}

/// Single-component grayscale JPEG
pub fn gray_jpeg(luma: &[u8], width: u16, height: u16) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    Encoder::new(&mut out, 95)
        .encode(luma, width, height, ColorType::Luma)
        .context("encoding grayscale fixture")?;
    Ok(out)
}

/// Three-component JPEG holding raw codes with no G3FAX marker
///
/// The samples are stored as given, the way an ITU Lab file would carry
/// them, but nothing identifies the file as a fax.
pub fn untagged_code_jpeg(codes: &[u8], width: u16, height: u16) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    Encoder::new(&mut out, 100)
        .encode(codes, width, height, ColorType::Ycbcr)
        .context("encoding untagged fixture")?;
    Ok(out)
}

/// ITU Lab JPEG produced by the engine from raw sRGB
pub fn itulab_jpeg(
    params: &LabParams,
    rgb: &[u8],
    width: u32,
    height: u32,
    options: &ConvertOptions,
) -> Result<Vec<u8>> {
    srgb_to_itulab_jpeg(params, rgb, width, height, options).context("encoding ITU Lab fixture")
}

/// Decode any JPEG with `jpeg-decoder` defaults, returning pixels and size
pub fn decode(data: &[u8]) -> Result<(Vec<u8>, u16, u16)> {
    let mut decoder = jpeg_decoder::Decoder::new(data);
    let pixels = decoder.decode().context("decoding fixture")?;
    let info = decoder.info().context("fixture has no frame header")?;
    Ok((pixels, info.width, info.height))
}
