//! Pixel-format translation.
//!
//! A [`FormatCode`] is the abstract, caller-facing description of a pixel layout. Parsing it
//! yields a [`FormatDesc`] carrying everything the command encoder needs: hardware format,
//! swizzle, channel masks and the planar YUV layout.

mod code;
mod desc;
mod pixel;

pub use code::{ColorSpace, FormatCode};
pub use desc::{Channel, FormatDesc, HwFormat, Swizzle, YuvLayout, parse_format};
pub use pixel::{decode_pixel, encode_pixel, premultiply};
