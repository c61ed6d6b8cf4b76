use std::fmt;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::coords::Vec2;

/// Line height used when a font is missing or the text is empty.
const FALLBACK_LINE: f32 = 1.2;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Loaded fonts. Immutable once loaded.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl fmt::Debug for FontSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSystem")
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TrueType or OpenType font.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        if bytes.is_empty() {
            return Err(FontLoadError("empty font data".to_owned()));
        }
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Size of `text` set at `size` logical pixels, laid out at `size * scale`
    /// physical pixels the way the text renderer does, in logical pixels.
    pub fn measure_text(&self, text: &str, id: FontId, size: f32, scale: f32) -> Vec2 {
        let empty = Vec2::new(0.0, size * FALLBACK_LINE);
        let Some(font) = self.get(id) else {
            return empty;
        };

        let scale = scale.max(0.01);
        let px = size * scale;

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, px, 0));

        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return empty;
        }

        // Pen position after each glyph, not the bitmap edge, so trailing
        // spaces and side bearings count.
        let w = glyphs
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, px);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        let h = layout.height().max(px);
        Vec2::new(w / scale, h / scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(&[]).is_err());
        assert!(fonts.load_font(b"not a font").is_err());
        assert!(fonts.is_empty());
    }

    #[test]
    fn unknown_font_measures_one_empty_line() {
        let fonts = FontSystem::new();
        assert_eq!(fonts.measure_text("abc", FontId(3), 10.0, 1.0), Vec2::new(0.0, 12.0));
    }

    #[test]
    fn load_error_names_the_cause() {
        let err = FontLoadError("bad table".into());
        assert_eq!(err.to_string(), "font load error: bad table");
    }
}
