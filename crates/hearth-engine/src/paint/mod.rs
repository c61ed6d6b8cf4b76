//! Color model shared between the UI and the renderers.

pub mod color;

pub use color::Color;
