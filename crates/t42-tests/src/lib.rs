//! # t42-tests
//!
//! Test harness for t42-core.
//!
//! This crate provides:
//! - Deterministic RGB test patterns
//! - Reference CIELAB values from `palette`, independent of the engine
//! - Code and perceptual difference statistics
//! - Fixture JPEGs with and without G3FAX markers
//!
//! ## Test Categories
//!
//! 1. **Engine round trips**: sRGB ⇄ ITU Lab code stability
//! 2. **Marker protocol**: G3FAX records inside real JPEG streams
//! 3. **Pipelines**: all five conversion entry points end to end
//! 4. **Reference parity**: float Lab against `palette`

pub mod accuracy;
pub mod fixtures;
pub mod patterns;

pub use accuracy::{CodeDiffStats, DeltaEStats, compare_codes, compare_rgb_buffers, reference_lab};
pub use patterns::{TestPattern, generate_pattern};
