//! Mathematical operations for the T.42 colour engine
//!
//! This module provides:
//! - 3x3 matrix operations for sRGB↔XYZ transforms
//! - sRGB transfer function evaluation, direct and table-driven

pub mod gamma;
pub mod matrix;

pub use gamma::{
    linear_to_srgb_u8, linear_to_srgb_u8_lut, srgb_gamma_decode, srgb_gamma_encode,
    srgb_u8_to_linear, srgb_u8_to_linear_lut,
};
pub use matrix::{Matrix3x3, SRGB_TO_XYZ, XYZ_TO_SRGB};
