//! Perspective camera and orbit controls.
//!
//! World space is right-handed, +Y up. Projection maps depth to `[0, 1]` (wgpu).

mod orbit;
mod perspective;

pub use orbit::{OrbitControls, OrbitSettings};
pub use perspective::{CameraConfig, PerspectiveCamera};
