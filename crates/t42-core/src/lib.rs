//! # t42 - ITU-T T.42 colour fax engine
//!
//! Converts colour facsimile images between device sRGB, CIE L\*a\*b\*, and
//! the 8-bit ITU Lab encoding carried in JPEG files tagged with the `G3FAX`
//! application marker.
//!
//! ## Layers
//!
//! - [`color`]: illuminant table, XYZ and Lab primitives
//! - [`params`]: gamut and white point model driven by G3FAX records
//! - [`transform`]: per-pixel and per-scanline sRGB ⇄ ITU Lab conversion
//! - [`marker`]: G3FAX record parsing, scanning, and construction
//! - [`jpeg`]: codec boundary over `jpeg-decoder` and `jpeg-encoder`
//! - [`pipeline`]: the five JPEG/raw conversion entry points
//!
//! ## Quick Start
//!
//! ```no_run
//! use t42_core::{ConvertOptions, LabParams, itulab_jpeg_to_srgb_jpeg};
//!
//! let fax_jpeg = std::fs::read("page.jpg").unwrap();
//!
//! // G3FAX records in the file update the parameters before conversion
//! let mut params = LabParams::default();
//! let srgb_jpeg =
//!     itulab_jpeg_to_srgb_jpeg(&mut params, &fax_jpeg, &ConvertOptions::default()).unwrap();
//! ```
//!
//! Converting single pixels:
//!
//! ```
//! use t42_core::{LabParams, TransformOptions, lab_to_code, srgb_pixel_to_lab};
//!
//! let mut params = LabParams::default();
//! params.set_illuminant_from_tag(b"\0D65").unwrap();
//!
//! let lab = srgb_pixel_to_lab(&params, [255, 255, 255], TransformOptions::default());
//! assert!((lab.l - 100.0).abs() < 1e-6);
//! assert_eq!(lab_to_code(&params, lab)[0], 255);
//! ```

pub mod color;
pub mod error;
pub mod jpeg;
pub mod marker;
pub mod math;
pub mod params;
pub mod pipeline;
pub mod transform;

pub use color::{ILLUMINANTS, Illuminant, Lab, Xyz, lookup_illuminant, lookup_illuminant_by_name};
pub use error::{Error, Result};
pub use marker::{
    IlluminantCode, MarkerRecord, MarkerScan, build_marker, build_marker_with_resolution,
    scan_markers,
};
pub use params::{GamutBounds, GamutPq, LabParams};
pub use pipeline::{
    ConvertOptions, DecodedImage, MarkerPolicy, itulab_jpeg_to_srgb, itulab_jpeg_to_srgb_jpeg,
    itulab_to_itulab_jpeg, srgb_jpeg_to_itulab_jpeg, srgb_to_itulab_jpeg,
};
pub use transform::{
    TransformOptions, code_to_lab, itulab_to_srgb, lab_to_code, lab_to_srgb_pixel,
    srgb_pixel_to_lab, srgb_to_itulab,
};

/// Version of t42-core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
