//! The halftone material: shader sources, the uniform set, and the shared handle.
//!
//! There is exactly one material per scene. Every renderable part holds a
//! [`MaterialHandle`] clone pointing at it, so a uniform push is seen by all of
//! them on the next render.

mod error;
mod halftone;
pub mod shading;
mod uniforms;

pub use error::{MaterialError, ShaderStage};
pub use halftone::{HalftoneMaterial, MaterialHandle, ShaderSources};
pub use uniforms::{HalftoneUniforms, UniformSlot, UniformValue};
