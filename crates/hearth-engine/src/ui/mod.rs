//! Immediate-mode UI overlay.
//!
//! Widgets are rectangles and text runs recorded into a [`DrawList`] each
//! frame and drawn in paint order by the shape painter. Labels are shaped
//! with fontdue once a font is loaded; until then a built-in block font
//! draws them as rectangles.

mod draw;
mod glyphs;
mod immediate;

pub use draw::{DrawItem, DrawList, Primitive, SortKey, TextRun, ZIndex};
pub use immediate::{ImmediateUi, Style};
