//! Font loading and text measurement.
//!
//! Fonts are parsed with fontdue and owned by a [`FontSystem`]. Glyphs are
//! rasterized lazily by the text renderer.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem};
