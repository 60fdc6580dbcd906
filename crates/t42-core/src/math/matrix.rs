//! 3x3 Matrix operations for sRGB ↔ XYZ
//!
//! The engine uses the 4-digit IEC 61966-2-1 matrices verbatim. They are not
//! exact inverses of each other; fax terminals quantize with these values, so
//! substituting higher-precision primaries would shift ITU Lab codes.

/// A 3x3 matrix for color space transformations
///
/// Stored in row-major order: m[row][col]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3x3 {
    /// Matrix elements in row-major order
    pub m: [[f64; 3]; 3],
}

/// Linear sRGB (D65) to CIE XYZ
pub const SRGB_TO_XYZ: Matrix3x3 = Matrix3x3::new([
    [0.4124, 0.3576, 0.1805],
    [0.2126, 0.7152, 0.0722],
    [0.0193, 0.1192, 0.9505],
]);

/// CIE XYZ to linear sRGB (D65)
pub const XYZ_TO_SRGB: Matrix3x3 = Matrix3x3::new([
    [3.2406, -1.5372, -0.4986],
    [-0.9689, 1.8758, 0.0415],
    [0.0557, -0.2040, 1.0570],
]);

impl Matrix3x3 {
    /// Create a new matrix from row-major elements
    #[inline]
    pub const fn new(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    /// Create an identity matrix
    #[inline]
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Multiply this matrix by a 3-element vector
    ///
    /// Returns M × v
    #[inline]
    pub fn multiply_vec(&self, v: [f64; 3]) -> [f64; 3] {
        [
            self.m[0][0] * v[0] + self.m[0][1] * v[1] + self.m[0][2] * v[2],
            self.m[1][0] * v[0] + self.m[1][1] * v[1] + self.m[1][2] * v[2],
            self.m[2][0] * v[0] + self.m[2][1] * v[1] + self.m[2][2] * v[2],
        ]
    }

    /// Multiply this matrix by another matrix
    ///
    /// Returns self × other
    #[inline]
    pub fn multiply(&self, other: &Self) -> Self {
        let mut result = Self::new([[0.0; 3]; 3]);
        for i in 0..3 {
            for j in 0..3 {
                result.m[i][j] = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j];
            }
        }
        result
    }

    /// Check if approximately equal to another matrix
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() < epsilon)
    }
}

impl Default for Matrix3x3 {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply_vec_identity() {
        let v = [0.25, 0.5, 0.75];
        assert_eq!(Matrix3x3::identity().multiply_vec(v), v);
    }

    #[test]
    fn test_srgb_white_is_d65() {
        let white = SRGB_TO_XYZ.multiply_vec([1.0, 1.0, 1.0]);
        assert!((white[0] - 0.9505).abs() < 1e-12);
        assert_eq!(white[1], 1.0);
        assert!((white[2] - 1.089).abs() < 1e-12);
    }

    #[test]
    fn test_matrices_nearly_inverse() {
        // Four-digit rounding keeps the product within 1e-3 of identity
        let product = XYZ_TO_SRGB.multiply(&SRGB_TO_XYZ);
        assert!(product.approx_eq(&Matrix3x3::identity(), 1e-3));
    }
}
