//! JPEG marker chain reader
//!
//! Walks the stream from SOI up to the first SOS and keeps what the
//! pipelines need before any pixel is decoded: every APPn payload, the
//! frame header, and the JFIF pixel density.

use crate::{Error, Result};

const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;
const TEM: u8 = 0x01;
const APP0: u8 = 0xE0;
const APP15: u8 = 0xEF;

const JFIF_SIGNATURE: &[u8; 5] = b"JFIF\0";

/// A saved application segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSegment {
    /// Marker code, 0xE0 (APP0) through 0xEF (APP15)
    pub marker: u8,
    /// Payload without the length field
    pub data: Vec<u8>,
}

impl AppSegment {
    /// The n in APPn, or `None` when `marker` is not an APPn code
    pub fn app_index(&self) -> Option<u8> {
        match self.marker {
            APP0..=APP15 => Some(self.marker - APP0),
            _ => None,
        }
    }
}

/// Sampling factors of one frame component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentInfo {
    pub id: u8,
    pub h_sampling: u8,
    pub v_sampling: u8,
}

/// Start-of-frame header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    /// SOFn marker code
    pub marker: u8,
    pub precision: u8,
    pub width: u16,
    pub height: u16,
    pub components: Vec<ComponentInfo>,
}

impl FrameInfo {
    /// Sampling factors of the first component, if any
    pub fn luma_sampling(&self) -> Option<(u8, u8)> {
        self.components
            .first()
            .map(|c| (c.h_sampling, c.v_sampling))
    }
}

/// Unit of the JFIF density fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityUnit {
    /// Fields only give the pixel aspect ratio
    AspectRatio,
    PerInch,
    PerCentimeter,
}

/// JFIF APP0 pixel density
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JfifDensity {
    pub unit: DensityUnit,
    pub x: u16,
    pub y: u16,
}

/// Everything in front of the first scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegHeader {
    /// APPn segments in stream order
    pub app_segments: Vec<AppSegment>,
    pub frame: FrameInfo,
    pub density: Option<JfifDensity>,
}

/// Read the marker chain of a JPEG stream up to its first scan
pub fn read_header(data: &[u8]) -> Result<JpegHeader> {
    if data.is_empty() {
        return Err(Error::InvalidInput("empty JPEG stream".into()));
    }
    if data.len() < 2 || data[0] != 0xFF || data[1] != SOI {
        return Err(Error::InvalidInput("stream does not start with SOI".into()));
    }

    let mut app_segments = Vec::new();
    let mut frame = None;
    let mut density = None;
    let mut pos = 2;

    loop {
        let marker = next_marker(data, &mut pos)?;
        match marker {
            TEM | 0xD0..=0xD7 => continue,
            SOI | EOI => {
                return Err(Error::Malformed(format!(
                    "unexpected marker 0xFF{marker:02X} before first scan"
                )));
            }
            _ => {}
        }

        let payload = segment_payload(data, &mut pos, marker)?;
        match marker {
            SOS => {
                let frame = frame.ok_or_else(|| {
                    Error::Malformed("scan starts before frame header".into())
                })?;
                return Ok(JpegHeader {
                    app_segments,
                    frame,
                    density,
                });
            }
            APP0..=APP15 => {
                if marker == APP0 && density.is_none() {
                    density = parse_jfif_density(payload);
                }
                app_segments.push(AppSegment {
                    marker,
                    data: payload.to_vec(),
                });
            }
            m if is_sof(m) => frame = Some(parse_frame(m, payload)?),
            _ => {}
        }
    }
}

/// Advance past fill bytes and return the next marker code
fn next_marker(data: &[u8], pos: &mut usize) -> Result<u8> {
    if data.get(*pos) != Some(&0xFF) {
        return Err(Error::Malformed(format!("expected marker at offset {}", *pos)));
    }
    while data.get(*pos) == Some(&0xFF) {
        *pos += 1;
    }
    let marker = *data
        .get(*pos)
        .ok_or_else(|| Error::Malformed("stream ends inside marker".into()))?;
    *pos += 1;
    Ok(marker)
}

fn segment_payload<'a>(data: &'a [u8], pos: &mut usize, marker: u8) -> Result<&'a [u8]> {
    let start = *pos;
    let header = data.get(start..start + 2).ok_or_else(|| {
        Error::Malformed(format!("truncated length of segment 0xFF{marker:02X}"))
    })?;
    let length = u16::from_be_bytes([header[0], header[1]]) as usize;
    if length < 2 {
        return Err(Error::Malformed(format!(
            "segment 0xFF{marker:02X} has invalid length {length}"
        )));
    }
    let payload = data.get(start + 2..start + length).ok_or_else(|| {
        Error::Malformed(format!(
            "segment 0xFF{marker:02X} runs past end of stream"
        ))
    })?;
    *pos = start + length;
    Ok(payload)
}

fn is_sof(marker: u8) -> bool {
    // DHT, JPG and DAC share the 0xC_ range
    matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

fn parse_frame(marker: u8, payload: &[u8]) -> Result<FrameInfo> {
    if payload.len() < 6 {
        return Err(Error::Malformed("truncated frame header".into()));
    }
    let precision = payload[0];
    let height = u16::from_be_bytes([payload[1], payload[2]]);
    let width = u16::from_be_bytes([payload[3], payload[4]]);
    let count = payload[5] as usize;

    let table = payload
        .get(6..6 + count * 3)
        .ok_or_else(|| Error::Malformed("truncated frame component table".into()))?;
    let components = table
        .chunks_exact(3)
        .map(|c| ComponentInfo {
            id: c[0],
            h_sampling: c[1] >> 4,
            v_sampling: c[1] & 0x0F,
        })
        .collect();

    Ok(FrameInfo {
        marker,
        precision,
        width,
        height,
        components,
    })
}

fn parse_jfif_density(payload: &[u8]) -> Option<JfifDensity> {
    let body = payload.strip_prefix(JFIF_SIGNATURE.as_slice())?;
    // version (2), units (1), x density (2), y density (2)
    if body.len() < 7 {
        return None;
    }
    let unit = match body[2] {
        1 => DensityUnit::PerInch,
        2 => DensityUnit::PerCentimeter,
        _ => DensityUnit::AspectRatio,
    };
    Some(JfifDensity {
        unit,
        x: u16::from_be_bytes([body[3], body[4]]),
        y: u16::from_be_bytes([body[5], body[6]]),
    })
}
