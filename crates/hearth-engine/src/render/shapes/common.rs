//! GPU types shared by the shape renderers.

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Vec2, Viewport};

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    pub(super) fn new(viewport: Viewport) -> Self {
        Self {
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            _pad: [0.0; 2],
        }
    }

    pub(super) fn binding_size() -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new(std::mem::size_of::<Self>() as u64)
    }
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── scissor ───────────────────────────────────────────────────────────────

/// Converts a logical clip rect to a physical scissor `(x, y, w, h)` clamped
/// to the viewport. `None` clip means the full viewport; a zero-area result
/// returns `None` and the draw is skipped.
pub(super) fn logical_clip_to_scissor(
    clip: Option<Rect>,
    viewport: Viewport,
    scale: Vec2,
) -> Option<(u32, u32, u32, u32)> {
    let vw = (viewport.width * scale.x).max(1.0) as u32;
    let vh = (viewport.height * scale.y).max(1.0) as u32;

    let (x, y, w, h) = match clip {
        None => (0, 0, vw, vh),
        Some(r) => {
            let px = |v: f32, s: f32, max: u32| ((v * s).max(0.0) as u32).min(max);
            let x = px(r.origin.x, scale.x, vw);
            let y = px(r.origin.y, scale.y, vh);
            let x2 = px(r.origin.x + r.size.x, scale.x, vw);
            let y2 = px(r.origin.y + r.size.y, scale.y, vh);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };

    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport::new(100.0, 50.0);

    #[test]
    fn no_clip_covers_the_physical_viewport() {
        assert_eq!(
            logical_clip_to_scissor(None, VP, Vec2::splat(2.0)),
            Some((0, 0, 200, 100))
        );
    }

    #[test]
    fn clip_is_scaled_and_clamped() {
        let clip = Rect::new(10.0, 10.0, 200.0, 20.0);
        assert_eq!(
            logical_clip_to_scissor(Some(clip), VP, Vec2::splat(2.0)),
            Some((20, 20, 180, 40))
        );
    }

    #[test]
    fn axes_scale_independently() {
        let clip = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(
            logical_clip_to_scissor(Some(clip), VP, Vec2::new(2.0, 1.0)),
            Some((20, 10, 40, 20))
        );
        assert_eq!(
            logical_clip_to_scissor(None, VP, Vec2::new(1.0, 3.0)),
            Some((0, 0, 100, 150))
        );
    }

    #[test]
    fn empty_or_offscreen_clip_skips_the_draw() {
        let one = Vec2::splat(1.0);
        assert_eq!(logical_clip_to_scissor(Some(Rect::default()), VP, one), None);
        let off = Rect::new(150.0, 0.0, 10.0, 10.0);
        assert_eq!(logical_clip_to_scissor(Some(off), VP, one), None);
    }

    #[test]
    fn viewport_uniform_never_divides_by_zero() {
        let u = ViewportUniform::new(Viewport::new(0.0, 0.0));
        assert_eq!(u.viewport, [1.0, 1.0]);
        assert_eq!(ViewportUniform::binding_size().map(|s| s.get()), Some(16));
    }
}
