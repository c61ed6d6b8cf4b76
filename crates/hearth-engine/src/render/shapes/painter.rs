use std::ops::Range;

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::text::FontSystem;
use crate::ui::{DrawList, Primitive};

use super::common::logical_clip_to_scissor;
use super::rect::RectRenderer;
use super::text::TextRenderer;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Batch {
    Rects,
    Text,
}

/// Consecutive instances of one renderer under one clip.
#[derive(Debug, Clone, PartialEq)]
struct Run {
    batch: Batch,
    range: Range<u32>,
    clip: Option<Rect>,
}

/// Appends `range` to the last run when it continues it, else starts a run.
fn extend_runs(runs: &mut Vec<Run>, batch: Batch, range: Range<u32>, clip: Option<Rect>) {
    if range.is_empty() {
        return;
    }
    if let Some(last) = runs.last_mut() {
        if last.batch == batch && last.clip == clip && last.range.end == range.start {
            last.range.end = range.end;
            return;
        }
    }
    runs.push(Run { batch, range, clip });
}

/// Draws a [`DrawList`] in paint order in a single pass, switching between
/// the rect and text pipelines as the primitive kind or clip changes.
#[derive(Default)]
pub struct Painter {
    rects: RectRenderer,
    text: TextRenderer,
    runs: Vec<Run>,
}

impl Painter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `draw_list` into `target` on top of its current contents.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        self.rects.clear();
        self.text.clear();
        self.runs.clear();

        for item in draw_list.iter_in_paint_order() {
            let (batch, range) = match &item.prim {
                Primitive::Rect { rect, color } => {
                    let i = self.rects.push(*rect, *color);
                    (Batch::Rects, i..i + 1)
                }
                Primitive::Text(run) => {
                    let start = self.text.len();
                    let end = self.text.push_run(ctx, fonts, run);
                    (Batch::Text, start..end)
                }
            };
            extend_runs(&mut self.runs, batch, range, item.clip);
        }
        if self.runs.is_empty() {
            return;
        }

        self.rects.prepare(ctx);
        self.text.prepare(ctx);

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("hearth ui pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for run in &self.runs {
            let Some((x, y, w, h)) = logical_clip_to_scissor(run.clip, ctx.viewport, ctx.scale)
            else {
                continue;
            };
            rpass.set_scissor_rect(x, y, w, h);
            match run.batch {
                Batch::Rects => self.rects.draw(&mut rpass, run.range.clone()),
                Batch::Text => self.text.draw(&mut rpass, run.range.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(parts: &[(Batch, Range<u32>, Option<Rect>)]) -> Vec<Run> {
        let mut out = Vec::new();
        for (batch, range, clip) in parts.iter().cloned() {
            extend_runs(&mut out, batch, range, clip);
        }
        out
    }

    #[test]
    fn same_batch_and_clip_merge() {
        let out = runs(&[
            (Batch::Rects, 0..1, None),
            (Batch::Rects, 1..2, None),
            (Batch::Rects, 2..3, None),
        ]);
        assert_eq!(out, vec![Run { batch: Batch::Rects, range: 0..3, clip: None }]);
    }

    #[test]
    fn switching_kind_keeps_paint_order() {
        let out = runs(&[
            (Batch::Rects, 0..1, None),
            (Batch::Text, 0..5, None),
            (Batch::Rects, 1..2, None),
        ]);
        let batches: Vec<_> = out.iter().map(|r| (r.batch, r.range.clone())).collect();
        assert_eq!(
            batches,
            vec![(Batch::Rects, 0..1), (Batch::Text, 0..5), (Batch::Rects, 1..2)]
        );
    }

    #[test]
    fn clip_change_splits_a_run() {
        let a = Some(Rect::new(0.0, 0.0, 5.0, 5.0));
        let out = runs(&[
            (Batch::Rects, 0..1, None),
            (Batch::Rects, 1..2, a),
            (Batch::Rects, 2..3, a),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], Run { batch: Batch::Rects, range: 1..3, clip: a });
    }

    #[test]
    fn text_without_visible_glyphs_adds_nothing() {
        let out = runs(&[(Batch::Text, 4..4, None)]);
        assert!(out.is_empty());
    }
}
