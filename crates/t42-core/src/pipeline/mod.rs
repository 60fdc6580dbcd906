//! Conversion pipelines
//!
//! Each pipeline connects the JPEG codec boundary to the transform engine,
//! one scanline at a time as the encoder pulls rows:
//!
//! | Function | Input | Output |
//! |----------|-------|--------|
//! | [`itulab_jpeg_to_srgb_jpeg`] | ITU Lab JPEG | sRGB JPEG |
//! | [`itulab_jpeg_to_srgb`] | ITU Lab JPEG | raw sRGB pixels |
//! | [`srgb_jpeg_to_itulab_jpeg`] | sRGB JPEG | ITU Lab JPEG |
//! | [`srgb_to_itulab_jpeg`] | raw sRGB pixels | ITU Lab JPEG |
//! | [`itulab_to_itulab_jpeg`] | raw ITU Lab pixels | ITU Lab JPEG |
//!
//! Lab-input pipelines read the G3FAX records first and let them update the
//! caller's [`LabParams`]. Lab-output pipelines write a G3FAX version record
//! ahead of the image data.

mod decode;
mod encode;

pub use decode::{itulab_jpeg_to_srgb, itulab_jpeg_to_srgb_jpeg};
pub use encode::{itulab_to_itulab_jpeg, srgb_jpeg_to_itulab_jpeg, srgb_to_itulab_jpeg};

use tracing::warn;

use crate::jpeg::JpegSink;
use crate::marker::{DEFAULT_RESOLUTION_DPI, G3FAX_APP_MARKER, MarkerScan, header_records};
use crate::params::LabParams;
use crate::transform::TransformOptions;
use crate::{Error, Result};

/// What to do with a Lab-input JPEG that carries no G3FAX record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerPolicy {
    /// Fail with [`Error::NotItuFax`]
    #[default]
    Require,
    /// Log a warning and convert with the current parameters
    Lenient,
}

/// Options shared by every pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// JPEG quality for encoded output, 1..=100
    pub quality: u8,
    pub transform: TransformOptions,
    pub marker_policy: MarkerPolicy,
    /// Resolution advertised in the G3FAX version record
    pub resolution_dpi: u16,
    /// Also write gamut and illuminant records describing the parameters
    pub advertise_lab_params: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            quality: 75,
            transform: TransformOptions::default(),
            marker_policy: MarkerPolicy::default(),
            resolution_dpi: DEFAULT_RESOLUTION_DPI,
            advertise_lab_params: false,
        }
    }
}

/// Raw pixels decoded from a JPEG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Interleaved RGB, `width * height * 3` bytes
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

fn enforce_marker_policy(scan: &MarkerScan, policy: MarkerPolicy) -> Result<()> {
    if scan.is_itu_fax() {
        return Ok(());
    }
    match policy {
        MarkerPolicy::Require => Err(Error::NotItuFax),
        MarkerPolicy::Lenient => {
            warn!("no G3FAX marker, converting with current parameters");
            Ok(())
        }
    }
}

fn write_g3fax_records(
    sink: &mut JpegSink,
    params: &LabParams,
    options: &ConvertOptions,
) -> Result<()> {
    for record in header_records(params, options.resolution_dpi, options.advertise_lab_params) {
        sink.write_marker(G3FAX_APP_MARKER, &record.encode())?;
    }
    Ok(())
}

/// Zeroed scratch row, failing instead of aborting when memory is short
fn scanline_buffer(len: usize) -> Result<Vec<u8>> {
    let mut row = Vec::new();
    row.try_reserve_exact(len)?;
    row.resize(len, 0);
    Ok(row)
}

/// Check a raw buffer against its declared size and return the row stride
fn raw_row_stride(src: &[u8], width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 || width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(Error::Dimensions { width, height });
    }
    let stride = width as usize * 3;
    let expected = stride * height as usize;
    if src.len() != expected {
        return Err(Error::BufferSize {
            expected,
            actual: src.len(),
        });
    }
    Ok(stride)
}
