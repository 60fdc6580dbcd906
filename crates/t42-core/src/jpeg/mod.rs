//! JPEG codec boundary
//!
//! Entropy coding is delegated to `jpeg-decoder` and `jpeg-encoder`. This
//! module adds what those crates do not expose: the saved APPn chain and
//! frame parameters of a source stream, pass-through (no YCbCr conversion)
//! decoding and encoding, and a writer that converts scanlines as the
//! encoder pulls them.

pub mod segments;
pub mod sink;
pub mod source;

pub use segments::{
    AppSegment, ComponentInfo, DensityUnit, FrameInfo, JfifDensity, JpegHeader, read_header,
};
pub use sink::{JpegSink, SampleLayout};
pub use source::{DecodeMode, JpegSource};
