use anyhow::{Context, Result};

use crate::module::GraphicsModule;
use crate::paint::Color;
use crate::render::RenderTarget;
use crate::window::WinitDisplay;

use super::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};

/// Graphics module backed by wgpu.
///
/// A frame is acquired lazily, by the first caller of
/// [`WgpuGraphics::with_frame`] in a tick or by `present` itself, and starts
/// cleared to the configured clear color. `present` submits and presents it.
pub struct WgpuGraphics {
    init: GpuInit,
    gpu: Option<Gpu>,
    frame: Option<GpuFrame>,
    clear_color: Color,
    fatal: bool,
    presented: u64,
    skipped: u64,
}

impl Default for WgpuGraphics {
    fn default() -> Self {
        Self::new(GpuInit::default())
    }
}

impl WgpuGraphics {
    pub fn new(init: GpuInit) -> Self {
        let clear_color = init.clear_color;
        Self {
            init,
            gpu: None,
            frame: None,
            clear_color,
            fatal: false,
            presented: 0,
            skipped: 0,
        }
    }

    #[inline]
    pub fn gpu(&self) -> Option<&Gpu> {
        self.gpu.as_ref()
    }

    pub fn adapter_info(&self) -> Option<wgpu::AdapterInfo> {
        self.gpu.as_ref().map(Gpu::adapter_info)
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Applies from the next acquired frame.
    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Frames presented and frames skipped because of surface errors or a
    /// collapsed window.
    #[inline]
    pub fn frame_stats(&self) -> (u64, u64) {
        (self.presented, self.skipped)
    }

    /// Runs `f` against this tick's frame, acquiring it first if needed.
    /// Returns `None` when no frame can be acquired this tick.
    pub fn with_frame<R>(&mut self, f: impl FnOnce(&Gpu, &mut RenderTarget<'_>) -> R) -> Option<R> {
        self.acquire();
        let gpu = self.gpu.as_ref()?;
        let frame = self.frame.as_mut()?;
        let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
        Some(f(gpu, &mut target))
    }

    fn acquire(&mut self) {
        if self.frame.is_some() || self.fatal {
            return;
        }
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        if !gpu.can_render() {
            return;
        }

        match gpu.begin_frame() {
            Ok(mut frame) => {
                clear(&mut frame, self.clear_color);
                self.frame = Some(frame);
            }
            Err(err) => match gpu.handle_surface_error(&err) {
                SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                    log::debug!("surface unavailable this frame: {err}");
                }
                SurfaceErrorAction::Fatal => {
                    log::error!("fatal surface error: {err}; presentation stopped");
                    self.fatal = true;
                }
            },
        }
    }
}

fn clear(frame: &mut GpuFrame, color: Color) {
    let _pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("hearth clear pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: &frame.view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(color.to_wgpu()),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
}

impl GraphicsModule for WgpuGraphics {
    type Display = WinitDisplay;

    fn init(&mut self, display: &WinitDisplay) -> Result<()> {
        debug_assert!(self.gpu.is_none(), "graphics initialized twice");
        let window = display
            .window()
            .context("display has no window to bind a surface to")?
            .clone();

        let gpu = pollster::block_on(Gpu::new(window, self.init.clone()))?;
        let info = gpu.adapter_info();
        log::info!(
            "gpu: {} ({:?}, {:?}), surface {:?}",
            info.name,
            info.backend,
            info.device_type,
            gpu.surface_format()
        );

        self.gpu = Some(gpu);
        self.frame = None;
        self.fatal = false;
        self.presented = 0;
        self.skipped = 0;
        Ok(())
    }

    fn quit(&mut self) {
        debug_assert!(self.gpu.is_some(), "graphics quit without init");
        self.frame = None;
        self.gpu = None;
    }

    fn notify_resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = self.gpu.as_mut() {
            if gpu.size() != (width, height) {
                log::debug!("drawable resized to {width}x{height}");
                gpu.resize(width, height);
            }
        }
    }

    fn present(&mut self) {
        self.acquire();
        match (self.gpu.as_ref(), self.frame.take()) {
            (Some(gpu), Some(frame)) => {
                gpu.submit(frame);
                self.presented += 1;
            }
            _ => self.skipped += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_graphics_has_no_frame_stats() {
        let graphics = WgpuGraphics::default();
        assert_eq!(graphics.frame_stats(), (0, 0));
        assert!(graphics.adapter_info().is_none());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "graphics quit without init")]
    fn quit_without_init_panics() {
        WgpuGraphics::default().quit();
    }
}
