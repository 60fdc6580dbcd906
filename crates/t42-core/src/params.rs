//! Gamut and illuminant parameters
//!
//! [`LabParams`] holds everything the transform engine needs to map between
//! CIELAB and 8-bit ITU Lab codes: the reference white and, for each channel,
//! the Lab units per code step and the code value at zero.
//!
//! A G3FAX marker scan mutates a caller-owned `LabParams` in place; the
//! setters validate first so a rejected update leaves the previous state
//! untouched.

use crate::color::{Illuminant, Xyz, lookup_illuminant};
use crate::{Error, Result};

/// Lab channel bounds mapped onto codes 0..=255
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamutBounds {
    pub l_min: f64,
    pub l_max: f64,
    pub a_min: f64,
    pub a_max: f64,
    pub b_min: f64,
    pub b_max: f64,
}

impl GamutBounds {
    /// The T.42 default gamut: L* [0,100], a* [-85,85], b* [-75,125]
    pub const T42_DEFAULT: Self = Self::new(0.0, 100.0, -85.0, 85.0, -75.0, 125.0);

    /// Full 8-bit range: L* [0,100], a* and b* [-128,127]
    pub const FULL_RANGE: Self = Self::new(0.0, 100.0, -128.0, 127.0, -128.0, 127.0);

    pub const fn new(l_min: f64, l_max: f64, a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> Self {
        Self {
            l_min,
            l_max,
            a_min,
            a_max,
            b_min,
            b_max,
        }
    }
}

impl Default for GamutBounds {
    fn default() -> Self {
        Self::T42_DEFAULT
    }
}

/// Gamut in the T.42 wire form
///
/// For each channel, P is the code at Lab zero and Q is the Lab span
/// covered by 255 code steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GamutPq {
    pub l_p: u16,
    pub l_q: u16,
    pub a_p: u16,
    pub a_q: u16,
    pub b_p: u16,
    pub b_q: u16,
}

/// Parameters for the ITU Lab transform
#[derive(Debug, Clone, PartialEq)]
pub struct LabParams {
    x_n: f64,
    y_n: f64,
    z_n: f64,

    range_l: f64,
    range_a: f64,
    range_b: f64,

    offset_l: f64,
    offset_a: f64,
    offset_b: f64,

    ab_are_signed: bool,
    illuminant_tag: Option<[u8; 4]>,
}

impl Default for LabParams {
    /// D50 white with the T.42 default gamut, unsigned
    fn default() -> Self {
        let d50 = Xyz::new(0.96422, 1.0, 0.82521);
        let mut params = Self {
            x_n: d50.x,
            y_n: d50.y,
            z_n: d50.z,
            range_l: 1.0,
            range_a: 1.0,
            range_b: 1.0,
            offset_l: 0.0,
            offset_a: 0.0,
            offset_b: 0.0,
            ab_are_signed: false,
            illuminant_tag: Some(*b"\0D50"),
        };
        params.apply_bounds(&GamutBounds::T42_DEFAULT, false);
        params
    }
}

impl LabParams {
    /// Build parameters from an illuminant and gamut bounds
    pub fn new(illuminant: &Illuminant, gamut: &GamutBounds, ab_are_signed: bool) -> Result<Self> {
        let mut params = Self::default();
        params.set_gamut_by_bounds(gamut, ab_are_signed)?;
        params.apply_illuminant(illuminant);
        Ok(params)
    }

    /// Set the reference white from tristimulus values
    ///
    /// Percent-scale input (Yn > 10) is divided by 100. The remembered
    /// illuminant tag is cleared.
    pub fn set_illuminant(&mut self, xn: f64, yn: f64, zn: f64) -> Result<()> {
        let (xn, yn, zn) = if yn > 10.0 {
            (xn / 100.0, yn / 100.0, zn / 100.0)
        } else {
            (xn, yn, zn)
        };

        for (name, value) in [("Xn", xn), ("Yn", yn), ("Zn", zn)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidWhitePoint(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }

        self.x_n = xn;
        self.y_n = yn;
        self.z_n = zn;
        self.illuminant_tag = None;
        Ok(())
    }

    /// Set the reference white from a T.42 illuminant code
    ///
    /// Returns the matched table entry, or `None` without touching the
    /// parameters when the code is unknown.
    pub fn set_illuminant_from_tag(&mut self, tag: &[u8; 4]) -> Option<&'static Illuminant> {
        let illuminant = lookup_illuminant(tag)?;
        self.apply_illuminant(illuminant);
        Some(illuminant)
    }

    /// Set the reference white from a table entry, remembering its code
    pub fn apply_illuminant(&mut self, illuminant: &Illuminant) {
        let white = illuminant.white_point();
        self.x_n = white.x;
        self.y_n = white.y;
        self.z_n = white.z;
        self.illuminant_tag = illuminant.tag;
    }

    /// Set the gamut from per-channel Lab bounds
    pub fn set_gamut_by_bounds(&mut self, gamut: &GamutBounds, ab_are_signed: bool) -> Result<()> {
        for (name, min, max) in [
            ("L*", gamut.l_min, gamut.l_max),
            ("a*", gamut.a_min, gamut.a_max),
            ("b*", gamut.b_min, gamut.b_max),
        ] {
            if !min.is_finite() || !max.is_finite() {
                return Err(Error::InvalidGamut(format!(
                    "{name} bounds must be finite, got [{min}, {max}]"
                )));
            }
            if max == min {
                return Err(Error::InvalidGamut(format!(
                    "{name} bounds are empty: min == max == {min}"
                )));
            }
        }

        self.apply_bounds(gamut, ab_are_signed);
        Ok(())
    }

    /// Set the gamut from the T.42 P/Q form; a* and b* become unsigned
    pub fn set_gamut_by_pq(&mut self, gamut: &GamutPq) -> Result<()> {
        if gamut.l_q == 0 || gamut.a_q == 0 || gamut.b_q == 0 {
            return Err(Error::InvalidGamut(format!("zero Q in {gamut:?}")));
        }

        self.range_l = gamut.l_q as f64 / 255.0;
        self.range_a = gamut.a_q as f64 / 255.0;
        self.range_b = gamut.b_q as f64 / 255.0;
        self.offset_l = gamut.l_p as f64;
        self.offset_a = gamut.a_p as f64;
        self.offset_b = gamut.b_p as f64;
        self.ab_are_signed = false;
        Ok(())
    }

    /// The current gamut in P/Q form, if it can be expressed that way
    ///
    /// Signed a*/b* codes, fractional offsets, and spans that are not whole
    /// Lab units have no P/Q encoding.
    pub fn gamut_pq(&self) -> Option<GamutPq> {
        if self.ab_are_signed {
            return None;
        }
        let (l_p, l_q) = channel_pq(self.range_l, self.offset_l)?;
        let (a_p, a_q) = channel_pq(self.range_a, self.offset_a)?;
        let (b_p, b_q) = channel_pq(self.range_b, self.offset_b)?;
        Some(GamutPq {
            l_p,
            l_q,
            a_p,
            a_q,
            b_p,
            b_q,
        })
    }

    /// Normalized reference white (Yn = 1 for table illuminants)
    #[inline]
    pub fn white_point(&self) -> Xyz {
        Xyz::new(self.x_n, self.y_n, self.z_n)
    }

    /// Lab units per code step for L*, a*, b*
    #[inline]
    pub fn range(&self) -> [f64; 3] {
        [self.range_l, self.range_a, self.range_b]
    }

    /// Code value at Lab zero for L*, a*, b*
    #[inline]
    pub fn offset(&self) -> [f64; 3] {
        [self.offset_l, self.offset_a, self.offset_b]
    }

    /// Whether a* and b* codes are stored as two's complement
    #[inline]
    pub fn ab_are_signed(&self) -> bool {
        self.ab_are_signed
    }

    /// T.42 code of the illuminant that set the white point, if any
    #[inline]
    pub fn illuminant_tag(&self) -> Option<[u8; 4]> {
        self.illuminant_tag
    }

    fn apply_bounds(&mut self, gamut: &GamutBounds, ab_are_signed: bool) {
        (self.range_l, self.offset_l) = channel_scale(gamut.l_min, gamut.l_max);
        (self.range_a, self.offset_a) = channel_scale(gamut.a_min, gamut.a_max);
        (self.range_b, self.offset_b) = channel_scale(gamut.b_min, gamut.b_max);
        self.ab_are_signed = ab_are_signed;
    }
}

fn channel_scale(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    (span / 255.0, -255.0 * min / span)
}

fn channel_pq(range: f64, offset: f64) -> Option<(u16, u16)> {
    const EPS: f64 = 1e-9;
    let q = range * 255.0;
    let (q_int, p_int) = (q.round(), offset.round());
    if (q - q_int).abs() > EPS || (offset - p_int).abs() > EPS {
        return None;
    }
    if !(1.0..=u16::MAX as f64).contains(&q_int) || !(0.0..=u16::MAX as f64).contains(&p_int) {
        return None;
    }
    Some((p_int as u16, q_int as u16))
}
