//! Encoding side of the codec boundary
//!
//! [`JpegSink`] holds application segments and the frame parameters copied
//! from a source image. Pixels never get a second full-size copy: the
//! encoder pulls scanlines from the caller's buffer through an
//! [`ImageBuffer`], and each one is converted into a single scratch row just
//! before it is coded.

use std::cell::RefCell;

use jpeg_encoder::{Density, Encoder, ImageBuffer, JpegColorType, SamplingFactor, rgb_to_ycbcr};
use tracing::debug;

use crate::jpeg::segments::{DensityUnit, JfifDensity, JpegHeader};
use crate::{Error, Result};

/// Largest APPn payload a segment length field can describe
pub const MAX_SEGMENT_PAYLOAD: usize = 65533;

/// How the sink interprets the samples it is given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLayout {
    /// RGB, converted to YCbCr row by row before coding
    Rgb,
    /// Stored as the three components without conversion (ITU Lab)
    PassThrough,
}

/// JPEG writer fed from a caller-owned scanline buffer
#[derive(Debug)]
pub struct JpegSink {
    width: u16,
    height: u16,
    layout: SampleLayout,
    quality: u8,
    density: Option<JfifDensity>,
    sampling: Option<(u8, u8)>,
    segments: Vec<(u8, Vec<u8>)>,
}

impl JpegSink {
    /// Create a sink for a `width` × `height` image
    ///
    /// `quality` is clamped to 1..=100.
    pub fn new(width: u32, height: u32, layout: SampleLayout, quality: u8) -> Result<Self> {
        let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => return Err(Error::Dimensions { width, height }),
        };

        Ok(Self {
            width: w,
            height: h,
            layout,
            quality: quality.clamp(1, 100),
            density: None,
            sampling: None,
            segments: Vec::new(),
        })
    }

    /// Bytes expected per scanline
    pub fn row_stride(&self) -> usize {
        self.width as usize * 3
    }

    pub fn set_density(&mut self, density: JfifDensity) {
        self.density = Some(density);
    }

    /// Use the given luma sampling factors
    ///
    /// Returns false, keeping the encoder default, for factor pairs the
    /// encoder cannot produce.
    pub fn set_sampling(&mut self, h: u8, v: u8) -> bool {
        if sampling_factor(h, v).is_none() {
            debug!(h, v, "unsupported sampling factors, using encoder default");
            return false;
        }
        self.sampling = Some((h, v));
        true
    }

    /// Carry density and sampling over from a source image
    pub fn copy_critical_parameters(&mut self, header: &JpegHeader) {
        if let Some(density) = header.density {
            self.set_density(density);
        }
        if let Some((h, v)) = header.frame.luma_sampling() {
            self.set_sampling(h, v);
        }
    }

    /// Queue an APPn segment; `marker` is the full code, 0xE1 through 0xEF
    ///
    /// APP0 is reserved for the JFIF header the encoder writes itself.
    pub fn write_marker(&mut self, marker: u8, data: &[u8]) -> Result<()> {
        if !(0xE1..=0xEF).contains(&marker) {
            return Err(Error::InvalidInput(format!(
                "0xFF{marker:02X} is not a writable application marker"
            )));
        }
        if data.len() > MAX_SEGMENT_PAYLOAD {
            return Err(Error::InvalidInput(format!(
                "APP{} payload of {} bytes exceeds {MAX_SEGMENT_PAYLOAD}",
                marker - 0xE0,
                data.len()
            )));
        }
        self.segments.push((marker, data.to_vec()));
        Ok(())
    }

    /// Encode `rows`, top to bottom, with samples stored as given
    pub fn encode(self, rows: &[u8]) -> Result<Vec<u8>> {
        self.encode_with(rows, |line, out| {
            out.copy_from_slice(line);
            Ok(())
        })
    }

    /// Encode `rows`, passing each scanline through `convert` as the
    /// encoder reaches it
    ///
    /// `rows` must hold `height` scanlines of [`row_stride`](Self::row_stride)
    /// bytes. The first error returned by `convert` fails the whole encode.
    pub fn encode_with<F>(self, rows: &[u8], convert: F) -> Result<Vec<u8>>
    where
        F: Fn(&[u8], &mut [u8]) -> Result<()>,
    {
        let stride = self.row_stride();
        let expected = stride * self.height as usize;
        if rows.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: rows.len(),
            });
        }

        let mut scratch = Vec::new();
        scratch.try_reserve_exact(stride)?;
        scratch.resize(stride, 0);
        let failure = RefCell::new(None);
        let feed = RowFeed {
            rows,
            width: self.width,
            height: self.height,
            layout: self.layout,
            convert,
            scratch: RefCell::new(scratch),
            failure: &failure,
        };

        let mut out = Vec::new();
        let mut encoder = Encoder::new(&mut out, self.quality);
        if let Some(density) = self.density {
            encoder.set_density(encoder_density(density));
        }
        if let Some(factor) = self.sampling.and_then(|(h, v)| sampling_factor(h, v)) {
            encoder.set_sampling_factor(factor);
        }
        for (marker, data) in &self.segments {
            encoder.add_app_segment(marker - 0xE0, data)?;
        }
        encoder.encode_image(feed)?;

        if let Some(err) = failure.into_inner() {
            return Err(err);
        }
        Ok(out)
    }
}

/// Scanline source handed to the encoder
///
/// The encoder asks for rows in order and may repeat the last one to pad
/// the final MCU row.
struct RowFeed<'a, F> {
    rows: &'a [u8],
    width: u16,
    height: u16,
    layout: SampleLayout,
    convert: F,
    scratch: RefCell<Vec<u8>>,
    failure: &'a RefCell<Option<Error>>,
}

impl<F> ImageBuffer for RowFeed<'_, F>
where
    F: Fn(&[u8], &mut [u8]) -> Result<()>,
{
    fn get_jpeg_color_type(&self) -> JpegColorType {
        JpegColorType::Ycbcr
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn fill_buffers(&self, y: u16, buffers: &mut [Vec<u8>; 4]) {
        let stride = self.width as usize * 3;
        let start = y as usize * stride;
        let mut scratch = self.scratch.borrow_mut();

        let mut failure = self.failure.borrow_mut();
        if failure.is_none() {
            let converted = match self.rows.get(start..start + stride) {
                Some(line) => (self.convert)(line, &mut scratch),
                None => Err(Error::InvalidInput(format!("scanline {y} out of range"))),
            };
            if let Err(err) = converted {
                *failure = Some(err);
            }
        }

        for px in scratch.chunks_exact(3) {
            let (c0, c1, c2) = match self.layout {
                SampleLayout::Rgb => rgb_to_ycbcr(px[0], px[1], px[2]),
                SampleLayout::PassThrough => (px[0], px[1], px[2]),
            };
            buffers[0].push(c0);
            buffers[1].push(c1);
            buffers[2].push(c2);
        }
    }
}

fn sampling_factor(h: u8, v: u8) -> Option<SamplingFactor> {
    match (h, v) {
        (1, 1) => Some(SamplingFactor::F_1_1),
        (2, 1) => Some(SamplingFactor::F_2_1),
        (1, 2) => Some(SamplingFactor::F_1_2),
        (2, 2) => Some(SamplingFactor::F_2_2),
        (4, 1) => Some(SamplingFactor::F_4_1),
        _ => None,
    }
}

fn encoder_density(density: JfifDensity) -> Density {
    match density.unit {
        DensityUnit::PerInch => Density::Inch {
            x: density.x,
            y: density.y,
        },
        DensityUnit::PerCentimeter => Density::Centimeter {
            x: density.x,
            y: density.y,
        },
        DensityUnit::AspectRatio => Density::None,
    }
}
