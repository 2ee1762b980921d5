//! Color model shared between parameters, uniforms and the render surface.
//!
//! Colors are stored in linear space. Hex strings coming from the control
//! surface are sRGB and are converted on parse.

pub mod color;

pub use color::{Color, ColorParseError};
