//! GPU device + surface management.
//!
//! Creates the wgpu Instance/Adapter/Device/Queue and the window surface,
//! resizes the surface on request, and hands out one `GpuFrame` per tick.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
