/// A frame acquired from the surface.
///
/// Holding the surface texture blocks acquisition of the next one; the frame
/// must be submitted and presented (or dropped) within the same tick.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
