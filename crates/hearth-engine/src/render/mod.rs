//! GPU rendering.
//!
//! Renderers consume recorded draw lists and issue wgpu commands. Each
//! renderer owns its pipelines and buffers.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - The vertex shader converts to NDC using a viewport uniform.
//! - Scissor rects are physical pixels: logical times `scale` per axis.

mod ctx;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
