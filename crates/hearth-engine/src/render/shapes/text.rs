use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};
use wgpu::util::DeviceExt;

use crate::render::RenderCtx;
use crate::text::FontSystem;
use crate::ui::TextRun;

use super::common::{premul_alpha_blend, QuadVertex, ViewportUniform, QUAD_INDICES, QUAD_VERTICES};

// ── atlas ─────────────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1;

/// Shelf allocator for the square glyph atlas.
#[derive(Debug, Clone, PartialEq)]
struct ShelfPacker {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    fn new(size: u32) -> Self {
        Self {
            size,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
        }
    }

    /// Top-left of a free `w x h` cell, or `None` once the atlas is full.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full {
            return None;
        }

        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }
        if self.cursor_x + w + GLYPH_PADDING > self.size
            || self.cursor_y + h + GLYPH_PADDING > self.size
        {
            self.full = true;
            return None;
        }

        let at = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(at)
    }
}

#[derive(Debug, Copy, Clone)]
struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Instanced glyph renderer backed by an R8 coverage atlas.
///
/// Glyphs are laid out and rasterized at physical pixel size by fontdue on
/// first use and cached by `GlyphRasterConfig` (font, glyph, pixel size).
/// When the atlas fills up, the cache is dropped at the start of the next
/// frame and glyphs are rasterized again.
///
/// Per frame: [`TextRenderer::clear`], [`TextRenderer::push_run`] each line,
/// [`TextRenderer::prepare`] once, then [`TextRenderer::draw`] glyph ranges.
pub struct TextRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    atlas_texture: Option<wgpu::Texture>,
    atlas_view: Option<wgpu::TextureView>,
    packer: ShelfPacker,
    glyph_cache: HashMap<GlyphRasterConfig, CachedGlyph>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,
    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    layout: Layout<()>,
    placed: Vec<PlacedGlyph>,
    instances: Vec<GlyphInstance>,
}

/// Glyph position from layout, physical pixels.
#[derive(Debug, Copy, Clone)]
struct PlacedGlyph {
    key: GlyphRasterConfig,
    x: f32,
    y: f32,
    w: usize,
    h: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
            sampler: None,
            atlas_texture: None,
            atlas_view: None,
            packer: ShelfPacker::new(ATLAS_SIZE),
            glyph_cache: HashMap::new(),
            quad_vbo: None,
            quad_ibo: None,
            instance_vbo: None,
            instance_capacity: 0,
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            placed: Vec::new(),
            instances: Vec::new(),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        if self.packer.full {
            log::debug!("glyph atlas full; recycling");
            self.glyph_cache.clear();
            self.packer = ShelfPacker::new(ATLAS_SIZE);
        }
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Lays out `run` and queues one instance per visible glyph, rasterizing
    /// new glyphs into the atlas. Returns the new instance count.
    pub fn push_run(&mut self, ctx: &RenderCtx<'_>, fonts: &FontSystem, run: &TextRun) -> u32 {
        let Some(font) = fonts.get(run.font) else {
            log::warn!("unknown font {:?}; text skipped", run.font);
            return self.len();
        };
        self.ensure_atlas(ctx);

        let sx = ctx.scale.x.max(0.01);
        let sy = ctx.scale.y.max(0.01);

        self.layout.reset(&LayoutSettings {
            x: (run.origin.x * sx).round(),
            y: (run.origin.y * sy).round(),
            ..LayoutSettings::default()
        });
        self.layout
            .append(&[font], &TextStyle::new(&run.text, run.size * sy, 0));

        let mut placed = std::mem::take(&mut self.placed);
        placed.clear();
        placed.extend(
            self.layout
                .glyphs()
                .iter()
                .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
                .map(|g| PlacedGlyph {
                    key: g.key,
                    x: g.x.round(),
                    y: g.y.round(),
                    w: g.width,
                    h: g.height,
                }),
        );

        let color = run.color.to_array();
        for g in &placed {
            if !self.glyph_cache.contains_key(&g.key) {
                let (metrics, bitmap) = font.rasterize_config(g.key);
                if metrics.width == 0 || metrics.height == 0 {
                    continue;
                }
                let Some(entry) =
                    self.upload_glyph(ctx, &bitmap, metrics.width as u32, metrics.height as u32)
                else {
                    continue;
                };
                self.glyph_cache.insert(g.key, entry);
            }

            let Some(cached) = self.glyph_cache.get(&g.key) else {
                continue;
            };
            self.instances.push(GlyphInstance {
                dst_min: [g.x / sx, g.y / sy],
                dst_max: [(g.x + g.w as f32) / sx, (g.y + g.h as f32) / sy],
                uv_min: cached.uv_min,
                uv_max: cached.uv_max,
                color,
            });
        }

        self.placed = placed;
        self.len()
    }

    /// Creates GPU resources as needed and uploads the queued instances.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>) {
        if self.instances.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_sampler(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        self.write_viewport_uniform(ctx);
        self.ensure_instance_capacity(ctx, self.instances.len());

        if let Some(vbo) = self.instance_vbo.as_ref() {
            ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.instances));
        }
    }

    /// Draws prepared glyph instances `range`. Binds its own pipeline.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, range: Range<u32>) {
        let (Some(pipeline), Some(bind_group), Some(quad_vbo), Some(quad_ibo), Some(instance_vbo)) = (
            self.pipeline.as_ref(),
            self.bind_group.as_ref(),
            self.quad_vbo.as_ref(),
            self.quad_ibo.as_ref(),
            self.instance_vbo.as_ref(),
        ) else {
            return;
        };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, range);
    }

    fn upload_glyph(
        &mut self,
        ctx: &RenderCtx<'_>,
        bitmap: &[u8],
        w: u32,
        h: u32,
    ) -> Option<CachedGlyph> {
        let was_full = self.packer.full;
        let Some((gx, gy)) = self.packer.place(w, h) else {
            if !was_full {
                log::warn!("glyph atlas is full ({ATLAS_SIZE}x{ATLAS_SIZE}); some glyphs skipped this frame");
            }
            return None;
        };
        let atlas = self.atlas_texture.as_ref()?;

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );

        let size = ATLAS_SIZE as f32;
        Some(CachedGlyph {
            uv_min: [gx as f32 / size, gy as f32 / size],
            uv_max: [(gx + w) as f32 / size, (gy + h) as f32 / size],
        })
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("hearth text shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/text.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("hearth text bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: ViewportUniform::binding_size(),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("hearth text pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("hearth text pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), GlyphInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas_texture.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("hearth glyph atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.atlas_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.atlas_texture = Some(texture);
        self.packer = ShelfPacker::new(ATLAS_SIZE);
        self.glyph_cache.clear();
        self.bind_group = None;
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("hearth glyph sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }

        let (Some(bgl), Some(atlas_view), Some(sampler)) = (
            self.bind_group_layout.as_ref(),
            self.atlas_view.as_ref(),
            self.sampler.as_ref(),
        ) else {
            return;
        };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hearth text viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("hearth text bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hearth text quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hearth text quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_viewport_uniform(&mut self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform::new(ctx.viewport);
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(64);
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hearth text instance vbo"),
            size: (new_cap * std::mem::size_of::<GlyphInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// 48 bytes: destination box (logical px), atlas UV box, premultiplied color.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shelves_fill_left_to_right_then_wrap() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(6, 4), Some((1, 1)));
        assert_eq!(p.place(6, 3), Some((8, 1)));
        // 15 + 6 + 1 > 16: next shelf, below the tallest glyph of the row.
        assert_eq!(p.place(6, 2), Some((1, 6)));
    }

    #[test]
    fn packer_reports_full_and_stays_full() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(14, 14), Some((1, 1)));
        assert_eq!(p.place(2, 2), None);
        assert!(p.full);
        assert_eq!(p.place(1, 1), None);
    }

    #[test]
    fn oversized_glyph_does_not_fit() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(20, 2), None);
    }

    #[test]
    fn instance_is_48_bytes() {
        assert_eq!(std::mem::size_of::<GlyphInstance>(), 48);
    }
}
