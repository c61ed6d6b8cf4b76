use core::cmp::Ordering;

use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::text::FontId;

/// Draw layer. Higher values appear on top of lower values.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ZIndex(pub i32);

/// Stable paint-order key: layer ascending, then insertion order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub order: u32,
}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.z.cmp(&other.z).then(self.order.cmp(&other.order))
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A single line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: FontId,
    /// Font size in logical pixels.
    pub size: f32,
    pub color: Color,
    /// Top-left of the line in logical pixels.
    pub origin: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect { rect: Rect, color: Color },
    Text(TextRun),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub prim: Primitive,
    /// Scissor rect in logical pixels. `None` draws everywhere.
    pub clip: Option<Rect>,
}

impl DrawItem {
    /// The rectangle, for rect items.
    pub fn rect(&self) -> Option<Rect> {
        match self.prim {
            Primitive::Rect { rect, .. } => Some(rect),
            Primitive::Text(_) => None,
        }
    }
}

/// Primitives recorded for one UI frame.
///
/// Paint-order iteration reuses an internal index buffer, so no per-frame
/// allocation once warmed.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted: Vec<usize>,
    sorted_dirty: bool,

    /// Effective clips, each already intersected with its parent.
    clip_stack: Vec<Rect>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears items and clips, keeping capacity.
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted.clear();
        self.sorted_dirty = true;
        self.clip_stack.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Records a rectangle under the current clip. Empty rectangles and
    /// fully transparent colors are dropped.
    pub fn push_rect(&mut self, z: ZIndex, rect: Rect, color: Color) {
        let rect = rect.normalized();
        if rect.is_empty() || color.a <= 0.0 {
            return;
        }
        self.push(z, Primitive::Rect { rect, color });
    }

    /// Records a text line under the current clip. Blank or invisible text
    /// is dropped.
    pub fn push_text(&mut self, z: ZIndex, run: TextRun) {
        if run.text.trim().is_empty() || run.color.a <= 0.0 || run.size <= 0.0 {
            return;
        }
        self.push(z, Primitive::Text(run));
    }

    fn push(&mut self, z: ZIndex, prim: Primitive) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey { z, order },
            prim,
            clip: self.clip_stack.last().copied(),
        });
        self.sorted_dirty = true;
    }

    /// Clip depth; 0 outside any clip.
    #[inline]
    pub fn clip_depth(&self) -> usize {
        self.clip_stack.len()
    }

    /// Clips every rectangle recorded until the matching [`DrawList::pop_clip`]
    /// to `rect`, intersected with any enclosing clip.
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect,
            Some(&parent) => parent.intersect(rect).unwrap_or_default(),
        };
        self.clip_stack.push(effective);
    }

    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip without push_clip");
        self.clip_stack.pop();
    }

    /// Items back-to-front.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.sorted.clear();
            self.sorted.extend(0..self.items.len());
            let items = &self.items;
            self.sorted.sort_by_key(|&i| items[i].key);
            self.sorted_dirty = false;
        }
        self.sorted.iter().map(|&i| &self.items[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::from_premul(1.0, 0.0, 0.0, 1.0);

    fn r(x: f32) -> Rect {
        Rect::new(x, 0.0, 1.0, 1.0)
    }

    #[test]
    fn paint_order_is_layer_then_insertion() {
        let mut list = DrawList::new();
        list.push_rect(ZIndex(1), r(0.0), RED);
        list.push_rect(ZIndex(0), r(1.0), RED);
        list.push_rect(ZIndex(1), r(2.0), RED);
        list.push_rect(ZIndex(0), r(3.0), RED);

        let xs: Vec<f32> = list
            .iter_in_paint_order()
            .filter_map(|i| i.rect())
            .map(|r| r.origin.x)
            .collect();
        assert_eq!(xs, vec![1.0, 3.0, 0.0, 2.0]);
    }

    #[test]
    fn invisible_rects_are_dropped() {
        let mut list = DrawList::new();
        list.push_rect(ZIndex(0), Rect::new(0.0, 0.0, 0.0, 5.0), RED);
        list.push_rect(ZIndex(0), r(0.0), Color::TRANSPARENT);
        assert!(list.is_empty());
    }

    fn run(text: &str) -> TextRun {
        TextRun {
            text: text.to_owned(),
            font: FontId(0),
            size: 12.0,
            color: RED,
            origin: Vec2::ZERO,
        }
    }

    #[test]
    fn text_interleaves_with_rects() {
        let mut list = DrawList::new();
        list.push_rect(ZIndex(0), r(0.0), RED);
        list.push_text(ZIndex(0), run("hi"));
        list.push_text(ZIndex(0), run("   "));
        list.push_rect(ZIndex(0), r(1.0), RED);

        let kinds: Vec<bool> = list
            .iter_in_paint_order()
            .map(|i| matches!(i.prim, Primitive::Text(_)))
            .collect();
        assert_eq!(kinds, vec![false, true, false]);
    }

    #[test]
    fn nested_clips_intersect() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        list.push_clip(Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(list.clip_depth(), 2);
        list.push_rect(ZIndex(0), r(6.0), RED);
        list.pop_clip();
        list.push_rect(ZIndex(0), r(1.0), RED);
        list.pop_clip();
        list.push_rect(ZIndex(0), r(2.0), RED);

        let clips: Vec<_> = list.items().iter().map(|i| i.clip).collect();
        assert_eq!(
            clips,
            vec![
                Some(Rect::new(5.0, 5.0, 5.0, 5.0)),
                Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
                None,
            ]
        );
    }

    #[test]
    fn disjoint_clip_becomes_empty() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 1.0, 1.0));
        list.push_clip(Rect::new(5.0, 5.0, 1.0, 1.0));
        list.push_rect(ZIndex(0), r(0.0), RED);
        assert_eq!(list.items()[0].clip, Some(Rect::default()));
    }

    #[test]
    fn clear_resets_everything() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 1.0, 1.0));
        list.push_rect(ZIndex(0), r(0.0), RED);
        list.clear();
        list.push_rect(ZIndex(0), r(0.0), RED);
        assert_eq!(list.len(), 1);
        assert_eq!(list.items()[0].clip, None);
        assert_eq!(list.items()[0].key.order, 0);
    }
}
