//! CIELAB (L*a*b*) Color Space
//!
//! - L*: Lightness (0 = black, 100 = white)
//! - a*: Green-red axis (negative = green, positive = red)
//! - b*: Blue-yellow axis (negative = blue, positive = yellow)
//!
//! The transfer constants are the rounded ones used by T.42 implementations
//! (0.008856, 7.787, 0.2068, 0.1284) rather than the exact 6/29 forms, so
//! that quantized ITU Lab codes agree with other fax terminals.

use crate::color::Xyz;

/// Forward threshold: values at or below use the linear segment
const FORWARD_THRESHOLD: f64 = 0.008856;
/// Slope of the forward linear segment
const FORWARD_SLOPE: f64 = 7.787;
/// Offset of the forward linear segment
const FORWARD_OFFSET: f64 = 16.0 / 116.0;

/// Inverse threshold on the L-derived value
const INVERSE_THRESHOLD: f64 = 0.2068;
/// Slope of the inverse linear segment
const INVERSE_SLOPE: f64 = 0.1284;
/// Offset of the inverse linear segment
const INVERSE_OFFSET: f64 = 0.1379;

/// CIELAB color coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    /// Lightness (0 to 100)
    pub l: f64,
    /// Green-red axis
    pub a: f64,
    /// Blue-yellow axis
    pub b: f64,
}

impl Lab {
    /// Create a new Lab color
    #[inline]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Create Lab from an array
    #[inline]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self {
            l: arr[0],
            a: arr[1],
            b: arr[2],
        }
    }

    /// Convert to array
    #[inline]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.l, self.a, self.b]
    }

    /// Convert from XYZ already divided by the white point
    pub fn from_relative_xyz(xyz: Xyz) -> Self {
        let fx = lab_f(xyz.x);
        let fy = lab_f(xyz.y);
        let fz = lab_f(xyz.z);

        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    /// Convert to XYZ relative to the white point (white = 1, 1, 1)
    pub fn to_relative_xyz(&self) -> Xyz {
        let fy = (self.l + 16.0) / 116.0;
        let fx = fy + self.a / 500.0;
        let fz = fy - self.b / 200.0;

        Xyz::new(lab_f_inv(fx), lab_f_inv(fy), lab_f_inv(fz))
    }

    /// Check if approximately equal to another Lab color
    #[inline]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.l - other.l).abs() < epsilon
            && (self.a - other.a).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
    }
}

/// Lab forward function: f(t) for XYZ → Lab conversion
#[inline]
fn lab_f(t: f64) -> f64 {
    if t <= FORWARD_THRESHOLD {
        FORWARD_SLOPE * t + FORWARD_OFFSET
    } else {
        t.cbrt()
    }
}

/// Lab inverse function: f⁻¹(t) for Lab → XYZ conversion
#[inline]
fn lab_f_inv(t: f64) -> f64 {
    if t <= INVERSE_THRESHOLD {
        INVERSE_SLOPE * (t - INVERSE_OFFSET)
    } else {
        t * t * t
    }
}

impl From<[f64; 3]> for Lab {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Lab> for [f64; 3] {
    fn from(lab: Lab) -> Self {
        lab.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    #[test]
    fn test_white_is_100() {
        let lab = Lab::from_relative_xyz(Xyz::new(1.0, 1.0, 1.0));
        assert!((lab.l - 100.0).abs() < EPSILON);
        assert!(lab.a.abs() < EPSILON);
        assert!(lab.b.abs() < EPSILON);
    }

    #[test]
    fn test_black_is_0() {
        let lab = Lab::from_relative_xyz(Xyz::new(0.0, 0.0, 0.0));
        assert!(lab.l.abs() < EPSILON);
        assert!(lab.a.abs() < EPSILON);
        assert!(lab.b.abs() < EPSILON);
    }

    #[test]
    fn test_roundtrip_cube_region() {
        let original = Lab::new(50.0, 25.0, -30.0);
        let roundtrip = Lab::from_relative_xyz(original.to_relative_xyz());

        assert!(
            original.approx_eq(&roundtrip, 1e-9),
            "Roundtrip failed: {:?} vs {:?}",
            original,
            roundtrip
        );
    }

    #[test]
    fn test_roundtrip_linear_region() {
        // L* = 5 sits well inside the linear segment of both directions
        let original = Lab::new(5.0, 0.0, 0.0);
        let roundtrip = Lab::from_relative_xyz(original.to_relative_xyz());
        assert!(original.approx_eq(&roundtrip, 0.01));
    }

    #[test]
    fn test_threshold_continuity() {
        let below = lab_f(FORWARD_THRESHOLD);
        let above = lab_f(FORWARD_THRESHOLD + 1e-9);
        assert!((below - above).abs() < 1e-3);
    }
}
