//! Pipelines that produce ITU Lab JPEGs

use tracing::{debug, instrument};

use super::{ConvertOptions, raw_row_stride, write_g3fax_records};
use crate::jpeg::{DecodeMode, JpegSink, JpegSource, SampleLayout, read_header};
use crate::marker::{G3FAX_APP_MARKER, build_marker_with_resolution};
use crate::params::LabParams;
use crate::transform::srgb_to_itulab;
use crate::Result;

/// Re-encode an sRGB (or grayscale) JPEG as an ITU Lab JPEG
#[instrument(skip_all, fields(src_len = src.len()))]
pub fn srgb_jpeg_to_itulab_jpeg(
    params: &LabParams,
    src: &[u8],
    options: &ConvertOptions,
) -> Result<Vec<u8>> {
    let header = read_header(src)?;
    let source = JpegSource::decode(src, DecodeMode::Rgb)?;

    let mut sink = JpegSink::new(
        source.width() as u32,
        source.height() as u32,
        SampleLayout::PassThrough,
        options.quality,
    )?;
    sink.copy_critical_parameters(&header);
    write_g3fax_records(&mut sink, params, options)?;

    let out = sink.encode_with(source.pixels(), |line, row| {
        srgb_to_itulab(params, line, row, options.transform)
    })?;
    debug!(
        width = source.width(),
        height = source.height(),
        out_len = out.len(),
        "sRGB JPEG re-encoded as ITU Lab"
    );
    Ok(out)
}

/// Encode raw interleaved sRGB as an ITU Lab JPEG
///
/// `src` must hold exactly `width * height * 3` bytes.
#[instrument(skip_all, fields(width = width, height = height))]
pub fn srgb_to_itulab_jpeg(
    params: &LabParams,
    src: &[u8],
    width: u32,
    height: u32,
    options: &ConvertOptions,
) -> Result<Vec<u8>> {
    raw_row_stride(src, width, height)?;
    let mut sink = JpegSink::new(width, height, SampleLayout::PassThrough, options.quality)?;
    write_g3fax_records(&mut sink, params, options)?;

    let out = sink.encode_with(src, |line, row| {
        srgb_to_itulab(params, line, row, options.transform)
    })?;
    debug!(out_len = out.len(), "raw sRGB encoded as ITU Lab");
    Ok(out)
}

/// Encode raw ITU Lab codes as an ITU Lab JPEG without conversion
///
/// Only the version record is written; the caller's codes are assumed to
/// use whatever gamut the receiver expects.
#[instrument(skip_all, fields(width = width, height = height))]
pub fn itulab_to_itulab_jpeg(
    src: &[u8],
    width: u32,
    height: u32,
    options: &ConvertOptions,
) -> Result<Vec<u8>> {
    raw_row_stride(src, width, height)?;
    let mut sink = JpegSink::new(width, height, SampleLayout::PassThrough, options.quality)?;
    sink.write_marker(
        G3FAX_APP_MARKER,
        &build_marker_with_resolution(options.resolution_dpi),
    )?;

    let out = sink.encode(src)?;
    debug!(out_len = out.len(), "raw ITU Lab encoded");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::marker::{IlluminantCode, MarkerRecord, scan_markers};
    use crate::params::GamutBounds;
    use jpeg_encoder::{ColorType, Encoder};

    fn g3fax_records(jpeg: &[u8]) -> Vec<MarkerRecord> {
        read_header(jpeg)
            .unwrap()
            .app_segments
            .iter()
            .filter(|s| s.marker == G3FAX_APP_MARKER)
            .filter_map(|s| MarkerRecord::parse(&s.data))
            .collect()
    }

    #[test]
    fn test_raw_srgb_carries_version_marker() {
        let params = LabParams::default();
        let src = [90u8, 160, 220].repeat(12 * 5);
        let jpeg = srgb_to_itulab_jpeg(&params, &src, 12, 5, &ConvertOptions::default()).unwrap();

        let header = read_header(&jpeg).unwrap();
        assert_eq!((header.frame.width, header.frame.height), (12, 5));
        assert_eq!(
            g3fax_records(&jpeg),
            vec![MarkerRecord::Version {
                version: 1994,
                resolution: 200
            }]
        );

        let mut scanned = LabParams::default();
        assert!(scan_markers(&header.app_segments, &mut scanned).is_itu_fax());
    }

    #[test]
    fn test_advertised_parameters() {
        let mut params = LabParams::default();
        params
            .set_gamut_by_bounds(&GamutBounds::FULL_RANGE, false)
            .unwrap();
        params.set_illuminant_from_tag(b"\0D65").unwrap();
        let options = ConvertOptions {
            advertise_lab_params: true,
            resolution_dpi: 300,
            ..ConvertOptions::default()
        };

        let jpeg = srgb_to_itulab_jpeg(&params, &[0u8; 3 * 4], 2, 2, &options).unwrap();
        let records = g3fax_records(&jpeg);
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            MarkerRecord::Version {
                version: 1994,
                resolution: 300
            }
        );
        assert_eq!(records[1], MarkerRecord::Gamut(params.gamut_pq().unwrap()));
        assert_eq!(
            records[2],
            MarkerRecord::Illuminant(IlluminantCode::Tag(*b"\0D65"))
        );
    }

    #[test]
    fn test_raw_buffer_size_checked() {
        let params = LabParams::default();
        let options = ConvertOptions::default();
        assert!(matches!(
            srgb_to_itulab_jpeg(&params, &[0u8; 10], 2, 2, &options),
            Err(Error::BufferSize {
                expected: 12,
                actual: 10
            })
        ));
        assert!(matches!(
            itulab_to_itulab_jpeg(&[], 0, 0, &options),
            Err(Error::Dimensions { .. })
        ));
    }

    #[test]
    fn test_itulab_passthrough_keeps_codes() {
        let src = [140u8, 100, 170].repeat(8 * 8);
        let jpeg = itulab_to_itulab_jpeg(&src, 8, 8, &ConvertOptions {
            quality: 100,
            ..ConvertOptions::default()
        })
        .unwrap();

        let source = JpegSource::decode(&jpeg, DecodeMode::PassThrough).unwrap();
        for px in source.scanlines().flat_map(|row| row.chunks_exact(3)) {
            assert!((px[0] as i32 - 140).abs() <= 2);
            assert!((px[1] as i32 - 100).abs() <= 2);
            assert!((px[2] as i32 - 170).abs() <= 2);
        }
        assert_eq!(g3fax_records(&jpeg).len(), 1);
    }

    #[test]
    fn test_srgb_jpeg_copies_density() {
        let mut src = Vec::new();
        let mut encoder = Encoder::new(&mut src, 90);
        encoder.set_density(jpeg_encoder::Density::Inch { x: 150, y: 150 });
        encoder
            .encode(&[200u8; 3 * 16 * 16], 16, 16, ColorType::Rgb)
            .unwrap();

        let out = srgb_jpeg_to_itulab_jpeg(&LabParams::default(), &src, &ConvertOptions::default())
            .unwrap();
        let header = read_header(&out).unwrap();
        assert_eq!((header.frame.width, header.frame.height), (16, 16));
        let density = header.density.unwrap();
        assert_eq!((density.x, density.y), (150, 150));
        assert_eq!(g3fax_records(&out).len(), 1);
    }

    #[test]
    fn test_gray_jpeg_accepted() {
        let mut src = Vec::new();
        Encoder::new(&mut src, 90)
            .encode(&[77u8; 8 * 8], 8, 8, ColorType::Luma)
            .unwrap();
        let out = srgb_jpeg_to_itulab_jpeg(&LabParams::default(), &src, &ConvertOptions::default())
            .unwrap();
        assert_eq!(read_header(&out).unwrap().frame.components.len(), 3);
    }
}
