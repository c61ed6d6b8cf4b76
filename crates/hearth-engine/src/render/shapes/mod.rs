//! Shape renderers.

mod common;
mod painter;

pub mod rect;
pub mod text;

pub use painter::Painter;
