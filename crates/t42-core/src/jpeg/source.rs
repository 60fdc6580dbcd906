//! Decoding side of the codec boundary

use jpeg_decoder::{ColorTransform, Decoder, PixelFormat};
use tracing::debug;

use crate::{Error, Result};

/// How decoded samples relate to the stored components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Component values exactly as stored, no YCbCr conversion.
    ///
    /// ITU Lab images store L*, a*, b* where a JFIF file would store Y, Cb,
    /// Cr, so any colour conversion would corrupt them. The decoder's RGB
    /// transform is the one that interleaves three components untouched;
    /// its `None` transform does not interleave.
    PassThrough,
    /// The codec's usual conversion to RGB; grayscale is widened to RGB
    Rgb,
}

/// A fully decoded 3-channel image, read one scanline at a time
#[derive(Debug)]
pub struct JpegSource {
    pixels: Vec<u8>,
    width: u16,
    height: u16,
}

impl JpegSource {
    /// Decode `data`, producing 3 interleaved samples per pixel
    pub fn decode(data: &[u8], mode: DecodeMode) -> Result<Self> {
        let mut decoder = Decoder::new(data);
        if mode == DecodeMode::PassThrough {
            decoder.set_color_transform(ColorTransform::RGB);
        }
        decoder.read_info()?;
        let info = decoder
            .info()
            .ok_or_else(|| Error::Codec("no image info after reading header".into()))?;

        if info.width == 0 || info.height == 0 {
            return Err(Error::Dimensions {
                width: info.width as u32,
                height: info.height as u32,
            });
        }

        let pixels = match (info.pixel_format, mode) {
            (PixelFormat::RGB24, _) => decoder.decode()?,
            (PixelFormat::L8, DecodeMode::Rgb) => {
                let gray = decoder.decode()?;
                debug!("widening grayscale JPEG to RGB");
                let mut rgb = Vec::new();
                rgb.try_reserve_exact(gray.len() * 3)?;
                rgb.extend(gray.iter().flat_map(|&v| [v, v, v]));
                rgb
            }
            (format, _) => {
                return Err(Error::Unsupported(format!(
                    "{format:?} JPEG in {mode:?} mode, expected 3 components"
                )));
            }
        };

        let expected = info.width as usize * info.height as usize * 3;
        if pixels.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            pixels,
            width: info.width,
            height: info.height,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per scanline
    pub fn row_stride(&self) -> usize {
        self.width as usize * 3
    }

    /// All samples, `height` scanlines of [`row_stride`](Self::row_stride) bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Scanlines from top to bottom
    pub fn scanlines(&self) -> std::slice::ChunksExact<'_, u8> {
        self.pixels.chunks_exact(self.row_stride())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpeg_encoder::{ColorType, Encoder};

    fn encode(data: &[u8], width: u16, height: u16, color: ColorType) -> Vec<u8> {
        let mut out = Vec::new();
        Encoder::new(&mut out, 100)
            .encode(data, width, height, color)
            .unwrap();
        out
    }

    #[test]
    fn test_decode_rgb() {
        let data: Vec<u8> = [200u8, 40, 40].repeat(8 * 4);
        let source = JpegSource::decode(&encode(&data, 8, 4, ColorType::Rgb), DecodeMode::Rgb)
            .unwrap();

        assert_eq!((source.width(), source.height()), (8, 4));
        assert_eq!(source.scanlines().len(), 4);
        for row in source.scanlines() {
            assert_eq!(row.len(), 24);
            for px in row.chunks_exact(3) {
                assert!((px[0] as i32 - 200).abs() <= 4);
                assert!((px[1] as i32 - 40).abs() <= 4);
            }
        }
    }

    #[test]
    fn test_pass_through_keeps_components() {
        // Stored as YCbCr without conversion, read back untouched
        let data: Vec<u8> = [180u8, 60, 220].repeat(8 * 8);
        let jpeg = encode(&data, 8, 8, ColorType::Ycbcr);
        let source = JpegSource::decode(&jpeg, DecodeMode::PassThrough).unwrap();
        for px in source.scanlines().flat_map(|row| row.chunks_exact(3)) {
            assert!((px[0] as i32 - 180).abs() <= 2);
            assert!((px[1] as i32 - 60).abs() <= 2);
            assert!((px[2] as i32 - 220).abs() <= 2);
        }
    }

    #[test]
    fn test_pass_through_odd_width_keeps_components() {
        // 13 columns leave the decoder's padded row wider than the image
        let data: Vec<u8> = [200u8, 90, 30].repeat(13 * 5);
        let jpeg = encode(&data, 13, 5, ColorType::Ycbcr);
        let source = JpegSource::decode(&jpeg, DecodeMode::PassThrough).unwrap();

        assert_eq!((source.width(), source.height()), (13, 5));
        for px in source.scanlines().flat_map(|row| row.chunks_exact(3)) {
            assert!(px[0].abs_diff(200) <= 2, "{:?}", px);
            assert!(px[1].abs_diff(90) <= 2, "{:?}", px);
            assert!(px[2].abs_diff(30) <= 2, "{:?}", px);
        }
    }

    #[test]
    fn test_pass_through_two_by_one() {
        let jpeg = encode(&[255u8, 127, 95, 255, 127, 95], 2, 1, ColorType::Ycbcr);
        let source = JpegSource::decode(&jpeg, DecodeMode::PassThrough).unwrap();
        let pixels: Vec<u8> = source.scanlines().flatten().copied().collect();
        assert_eq!(pixels.len(), 6);
        for px in pixels.chunks_exact(3) {
            assert!(px[0] >= 254, "{:?}", px);
            assert!(px[1].abs_diff(127) <= 1 && px[2].abs_diff(95) <= 1, "{:?}", px);
        }
    }

    #[test]
    fn test_gray_widened_to_rgb() {
        let data = vec![128u8; 8 * 8];
        let jpeg = encode(&data, 8, 8, ColorType::Luma);
        let source = JpegSource::decode(&jpeg, DecodeMode::Rgb).unwrap();
        assert_eq!(source.row_stride(), 24);
        for px in source.scanlines().flat_map(|row| row.chunks_exact(3)) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn test_gray_rejected_in_pass_through() {
        let jpeg = encode(&[0u8; 64], 8, 8, ColorType::Luma);
        assert!(matches!(
            JpegSource::decode(&jpeg, DecodeMode::PassThrough),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_garbage_is_codec_error() {
        assert!(matches!(
            JpegSource::decode(b"\xFF\xD8\xFF\xC0\x00", DecodeMode::Rgb),
            Err(Error::Codec(_))
        ));
    }
}
