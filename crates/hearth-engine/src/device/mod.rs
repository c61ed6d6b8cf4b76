//! GPU device, swapchain and the graphics module.
//!
//! [`Gpu`] owns the wgpu instance objects and the surface; [`WgpuGraphics`]
//! wraps it in the frame protocol the lifecycle drives: acquire lazily,
//! clear, draw, present.

mod error;
mod frame;
mod gpu;
mod graphics;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use graphics::WgpuGraphics;
pub use init::GpuInit;
