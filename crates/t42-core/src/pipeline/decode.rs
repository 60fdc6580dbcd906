//! Pipelines that read ITU Lab JPEGs

use tracing::{debug, instrument};

use super::{ConvertOptions, DecodedImage, enforce_marker_policy, scanline_buffer};
use crate::jpeg::{DecodeMode, JpegSink, JpegSource, SampleLayout, read_header};
use crate::marker::scan_markers;
use crate::params::LabParams;
use crate::transform::itulab_to_srgb;
use crate::Result;

/// Re-encode an ITU Lab JPEG as an sRGB JPEG
///
/// G3FAX records in the source update `params` before any pixel is
/// converted. Dimensions, density, and luma sampling are carried over.
#[instrument(skip_all, fields(src_len = src.len()))]
pub fn itulab_jpeg_to_srgb_jpeg(
    params: &mut LabParams,
    src: &[u8],
    options: &ConvertOptions,
) -> Result<Vec<u8>> {
    let header = read_header(src)?;
    let scan = scan_markers(&header.app_segments, params);
    enforce_marker_policy(&scan, options.marker_policy)?;

    let source = JpegSource::decode(src, DecodeMode::PassThrough)?;
    let mut sink = JpegSink::new(
        source.width() as u32,
        source.height() as u32,
        SampleLayout::Rgb,
        options.quality,
    )?;
    sink.copy_critical_parameters(&header);

    let params = &*params;
    let out = sink.encode_with(source.pixels(), |line, row| {
        itulab_to_srgb(params, line, row, options.transform)
    })?;
    debug!(
        width = source.width(),
        height = source.height(),
        out_len = out.len(),
        "ITU Lab JPEG re-encoded as sRGB"
    );
    Ok(out)
}

/// Decode an ITU Lab JPEG to raw interleaved sRGB
#[instrument(skip_all, fields(src_len = src.len()))]
pub fn itulab_jpeg_to_srgb(
    params: &mut LabParams,
    src: &[u8],
    options: &ConvertOptions,
) -> Result<DecodedImage> {
    let header = read_header(src)?;
    let scan = scan_markers(&header.app_segments, params);
    enforce_marker_policy(&scan, options.marker_policy)?;

    let source = JpegSource::decode(src, DecodeMode::PassThrough)?;
    let stride = source.row_stride();
    let mut pixels = scanline_buffer(stride * source.height() as usize)?;
    for (line, out) in source.scanlines().zip(pixels.chunks_exact_mut(stride)) {
        itulab_to_srgb(params, line, out, options.transform)?;
    }

    debug!(
        width = source.width(),
        height = source.height(),
        "ITU Lab JPEG decoded to sRGB"
    );
    Ok(DecodedImage {
        pixels,
        width: source.width() as u32,
        height: source.height() as u32,
    })
}
