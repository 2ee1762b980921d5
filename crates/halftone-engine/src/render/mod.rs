//! GPU rendering subsystem.
//!
//! [`HalftoneRenderer`] turns a [`SceneView`](crate::animation::SceneView) into
//! one depth-tested pass. It owns its GPU resources (pipeline, uniform buffers,
//! depth target, mesh buffers) and creates them lazily on first use.
//!
//! Bind groups:
//! - group 0: halftone material block (fragment)
//! - group 1: camera (vertex)
//! - group 2: per-part transforms (vertex, dynamic offset)

mod ctx;
mod halftone;
mod uniforms;

pub use ctx::{RenderCtx, RenderTarget};
pub use halftone::{HalftoneRenderer, DEPTH_FORMAT};
pub use uniforms::{CameraUniform, PartUniform};
