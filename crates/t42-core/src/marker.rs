//! G3FAX application marker protocol
//!
//! T.42 colour fax JPEGs carry one or more APP1 segments whose payload
//! starts with the ASCII signature `G3FAX` followed by a sub-type byte:
//!
//! | Type | Body | Meaning |
//! |------|------|---------|
//! | 0 | version u16, resolution u16 | Identifies the image as ITU fax |
//! | 1 | L_P, L_Q, a_P, a_Q, b_P, b_Q (u16 each) | Gamut in P/Q form |
//! | 2 | `CT` + u16, or a 4-byte code | Illuminant |
//! | 3 | u16 | Palette table index |
//!
//! All multi-byte fields are big-endian. Records are applied in the order
//! they appear, so a later record overrides an earlier one.

use tracing::{debug, trace, warn};

use crate::color::Illuminant;
use crate::jpeg::AppSegment;
use crate::params::{GamutPq, LabParams};

/// Payload signature shared by every record
pub const SIGNATURE: &[u8; 5] = b"G3FAX";

/// JPEG marker code of the segment that carries G3FAX records
pub const G3FAX_APP_MARKER: u8 = 0xE1;

/// Version advertised in the type 0 record
pub const T42_VERSION: u16 = 1994;

/// Resolution advertised when the caller does not choose one
pub const DEFAULT_RESOLUTION_DPI: u16 = 200;

const TYPE_VERSION: u8 = 0;
const TYPE_GAMUT: u8 = 1;
const TYPE_ILLUMINANT: u8 = 2;
const TYPE_PALETTE: u8 = 3;

/// Illuminant record body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IlluminantCode {
    /// Correlated colour temperature in kelvin
    ColorTemperature(u16),
    /// 4-byte illuminant code from the illuminant table
    Tag([u8; 4]),
}

/// One decoded G3FAX record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRecord {
    Version { version: u16, resolution: u16 },
    Gamut(GamutPq),
    Illuminant(IlluminantCode),
    Palette { index: u16 },
}

impl MarkerRecord {
    /// Decode an APP1 payload
    ///
    /// Returns `None` for payloads that are not G3FAX records, are too short
    /// for their sub-type, or use a sub-type this implementation does not
    /// know.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        let body = payload.strip_prefix(SIGNATURE.as_slice())?;
        let (&record_type, body) = body.split_first()?;

        let needed = match record_type {
            TYPE_VERSION => 4,
            TYPE_GAMUT => 12,
            TYPE_ILLUMINANT => 4,
            TYPE_PALETTE => 2,
            other => {
                trace!(record_type = other, "ignoring unknown G3FAX record type");
                return None;
            }
        };
        if body.len() < needed {
            warn!(
                record_type,
                len = body.len(),
                needed,
                "truncated G3FAX record"
            );
            return None;
        }

        let record = match record_type {
            TYPE_VERSION => MarkerRecord::Version {
                version: be_u16(body, 0),
                resolution: be_u16(body, 2),
            },
            TYPE_GAMUT => MarkerRecord::Gamut(GamutPq {
                l_p: be_u16(body, 0),
                l_q: be_u16(body, 2),
                a_p: be_u16(body, 4),
                a_q: be_u16(body, 6),
                b_p: be_u16(body, 8),
                b_q: be_u16(body, 10),
            }),
            TYPE_ILLUMINANT => {
                let code = [body[0], body[1], body[2], body[3]];
                if code.starts_with(b"CT") {
                    MarkerRecord::Illuminant(IlluminantCode::ColorTemperature(be_u16(body, 2)))
                } else {
                    MarkerRecord::Illuminant(IlluminantCode::Tag(code))
                }
            }
            _ => MarkerRecord::Palette {
                index: be_u16(body, 0),
            },
        };
        Some(record)
    }

    /// Encode as an APP1 payload, signature included
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(18);
        out.extend_from_slice(SIGNATURE);
        match *self {
            MarkerRecord::Version {
                version,
                resolution,
            } => {
                out.push(TYPE_VERSION);
                out.extend_from_slice(&version.to_be_bytes());
                out.extend_from_slice(&resolution.to_be_bytes());
            }
            MarkerRecord::Gamut(pq) => {
                out.push(TYPE_GAMUT);
                for value in [pq.l_p, pq.l_q, pq.a_p, pq.a_q, pq.b_p, pq.b_q] {
                    out.extend_from_slice(&value.to_be_bytes());
                }
            }
            MarkerRecord::Illuminant(IlluminantCode::ColorTemperature(kelvin)) => {
                out.push(TYPE_ILLUMINANT);
                out.extend_from_slice(b"CT");
                out.extend_from_slice(&kelvin.to_be_bytes());
            }
            MarkerRecord::Illuminant(IlluminantCode::Tag(tag)) => {
                out.push(TYPE_ILLUMINANT);
                out.extend_from_slice(&tag);
            }
            MarkerRecord::Palette { index } => {
                out.push(TYPE_PALETTE);
                out.extend_from_slice(&index.to_be_bytes());
            }
        }
        out
    }
}

#[inline]
fn be_u16(data: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([data[at], data[at + 1]])
}

/// What a marker scan found
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerScan {
    itu_fax: bool,
    /// Version from the last type 0 record
    pub version: Option<u16>,
    /// Resolution in dpi from the last type 0 record
    pub resolution: Option<u16>,
    /// Gamut from the last accepted type 1 record
    pub gamut: Option<GamutPq>,
    /// Illuminant from the last recognised type 2 code
    pub illuminant: Option<&'static Illuminant>,
    /// Colour temperature from the last `CT` type 2 record
    pub color_temperature: Option<u16>,
    /// Index from the last type 3 record
    pub palette_index: Option<u16>,
}

impl MarkerScan {
    /// Whether a version, gamut, or illuminant record was present
    ///
    /// A palette record alone does not mark the image as ITU fax.
    pub fn is_itu_fax(&self) -> bool {
        self.itu_fax
    }
}

/// Scan saved APPn segments for G3FAX records, applying them to `params`
///
/// Only APP1 segments are considered. Gamut and illuminant records update
/// `params` as they are met; records that would leave the parameters
/// invalid are logged and skipped.
pub fn scan_markers(segments: &[AppSegment], params: &mut LabParams) -> MarkerScan {
    let mut scan = MarkerScan::default();

    for segment in segments.iter().filter(|s| s.marker == G3FAX_APP_MARKER) {
        if !segment.data.starts_with(SIGNATURE) {
            trace!(len = segment.data.len(), "APP1 segment is not G3FAX");
            continue;
        }
        let Some(record) = MarkerRecord::parse(&segment.data) else {
            continue;
        };

        match record {
            MarkerRecord::Version {
                version,
                resolution,
            } => {
                debug!(version, resolution, "G3FAX version");
                scan.version = Some(version);
                scan.resolution = Some(resolution);
                scan.itu_fax = true;
            }
            MarkerRecord::Gamut(pq) => {
                debug!(?pq, "G3FAX gamut");
                match params.set_gamut_by_pq(&pq) {
                    Ok(()) => scan.gamut = Some(pq),
                    Err(err) => warn!(%err, "ignoring G3FAX gamut"),
                }
                scan.itu_fax = true;
            }
            MarkerRecord::Illuminant(IlluminantCode::ColorTemperature(kelvin)) => {
                // Colour temperatures are reported but not converted to a white point
                debug!(kelvin, "G3FAX illuminant colour temperature");
                scan.color_temperature = Some(kelvin);
                scan.itu_fax = true;
            }
            MarkerRecord::Illuminant(IlluminantCode::Tag(tag)) => {
                match params.set_illuminant_from_tag(&tag) {
                    Some(illuminant) => {
                        debug!(name = illuminant.name, "G3FAX illuminant");
                        scan.illuminant = Some(illuminant);
                    }
                    None => warn!(?tag, "unrecognised G3FAX illuminant"),
                }
                scan.itu_fax = true;
            }
            MarkerRecord::Palette { index } => {
                debug!(index, "G3FAX colour palette");
                scan.palette_index = Some(index);
            }
        }
    }

    scan
}

/// The version record with the default resolution
pub fn build_marker() -> [u8; 10] {
    build_marker_with_resolution(DEFAULT_RESOLUTION_DPI)
}

/// The version record advertising `resolution` dpi
pub fn build_marker_with_resolution(resolution: u16) -> [u8; 10] {
    let [v0, v1] = T42_VERSION.to_be_bytes();
    let [r0, r1] = resolution.to_be_bytes();
    [b'G', b'3', b'F', b'A', b'X', TYPE_VERSION, v0, v1, r0, r1]
}

/// Records a producer writes ahead of the image data
///
/// Always the version record. With `advertise_lab_params`, also the gamut
/// when it has a P/Q encoding and the illuminant when it came from a tagged
/// table entry.
pub fn header_records(
    params: &LabParams,
    resolution: u16,
    advertise_lab_params: bool,
) -> Vec<MarkerRecord> {
    let mut records = vec![MarkerRecord::Version {
        version: T42_VERSION,
        resolution,
    }];
    if advertise_lab_params {
        match params.gamut_pq() {
            Some(pq) => records.push(MarkerRecord::Gamut(pq)),
            None => debug!("gamut has no P/Q form, not advertised"),
        }
        if let Some(tag) = params.illuminant_tag() {
            records.push(MarkerRecord::Illuminant(IlluminantCode::Tag(tag)));
        }
    }
    records
}
