//! Color space types and conversions
//!
//! This module provides:
//! - CIE XYZ color space
//! - CIELAB (L*a*b*) color space with T.42 transfer constants
//! - The standard illuminant registry

pub mod illuminant;
pub mod lab;
pub mod xyz;

pub use illuminant::{ILLUMINANTS, Illuminant, lookup_illuminant, lookup_illuminant_by_name};
pub use lab::Lab;
pub use xyz::Xyz;
