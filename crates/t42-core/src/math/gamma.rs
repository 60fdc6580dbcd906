//! sRGB transfer function
//!
//! This module provides:
//! - IEC 61966-2-1 gamma encode/decode
//! - 8-bit entry points used by the transform engine
//! - Precomputed lookup tables for both directions

use std::sync::LazyLock;

/// Number of entries in the linear → sRGB table
pub const LINEAR_TABLE_SIZE: usize = 4096;

/// sRGB gamma decode (encoded → linear)
///
/// Converts sRGB-encoded value [0,1] to linear light [0,1].
/// Uses the IEC 61966-2-1 transfer function.
#[inline]
pub fn srgb_gamma_decode(encoded: f64) -> f64 {
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB gamma encode (linear → encoded)
///
/// Converts linear light [0,1] to sRGB-encoded value [0,1].
/// Uses the IEC 61966-2-1 transfer function.
#[inline]
pub fn srgb_gamma_encode(linear: f64) -> f64 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Decode an 8-bit sRGB sample to linear light
#[inline]
pub fn srgb_u8_to_linear(encoded: u8) -> f64 {
    srgb_gamma_decode(encoded as f64 / 255.0)
}

/// Encode linear light to an 8-bit sRGB sample, rounding to nearest
#[inline]
pub fn linear_to_srgb_u8(linear: f64) -> u8 {
    let encoded = srgb_gamma_encode(linear).clamp(0.0, 1.0);
    (encoded * 255.0 + 0.5) as u8
}

static SRGB_TO_LINEAR: LazyLock<[f64; 256]> = LazyLock::new(|| {
    let mut table = [0.0; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = srgb_u8_to_linear(i as u8);
    }
    table
});

static LINEAR_TO_SRGB: LazyLock<[u8; LINEAR_TABLE_SIZE]> = LazyLock::new(|| {
    let mut table = [0u8; LINEAR_TABLE_SIZE];
    for (i, entry) in table.iter_mut().enumerate() {
        // Sample each bin at its centre
        *entry = linear_to_srgb_u8((i as f64 + 0.5) / LINEAR_TABLE_SIZE as f64);
    }
    table
});

/// The 256-entry sRGB → linear table
pub fn srgb_to_linear_table() -> &'static [f64; 256] {
    &SRGB_TO_LINEAR
}

/// The 4096-entry linear → sRGB table
pub fn linear_to_srgb_table() -> &'static [u8; LINEAR_TABLE_SIZE] {
    &LINEAR_TO_SRGB
}

/// Table-driven [`srgb_u8_to_linear`]; bit-identical to the direct path
#[inline]
pub fn srgb_u8_to_linear_lut(encoded: u8) -> f64 {
    SRGB_TO_LINEAR[encoded as usize]
}

/// Table-driven [`linear_to_srgb_u8`]
///
/// The linear value is scaled to a 12-bit index and clamped to the table's
/// domain, so anything at or below zero maps to 0 and anything at or above
/// 4095/4096 maps to the last entry. NaN maps to 0.
#[inline]
pub fn linear_to_srgb_u8_lut(linear: f64) -> u8 {
    let max_index = (LINEAR_TABLE_SIZE - 1) as f64;
    let index = (linear * LINEAR_TABLE_SIZE as f64).clamp(0.0, max_index) as usize;
    LINEAR_TO_SRGB[index]
}
