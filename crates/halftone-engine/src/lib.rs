//! Halftone engine crate.
//!
//! Platform + GPU runtime pieces (device, window, input, time, logging) and the
//! halftone scene model driven by them: viewport, camera, material, parameters,
//! scene composition, asset loading, and the per-frame animation loop.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod paint;
pub mod viewport;
pub mod camera;
pub mod material;
pub mod params;
pub mod scene;
pub mod asset;
pub mod animation;
pub mod context;
pub mod render;
