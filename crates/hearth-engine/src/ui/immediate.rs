use anyhow::Result;

use crate::coords::{Rect, Vec2, Viewport};
use crate::device::WgpuGraphics;
use crate::input::{EventCategory, InputEvent, MouseButton, MouseButtonState};
use crate::module::{PlatformEvent, UiModule};
use crate::paint::Color;
use crate::render::shapes::Painter;
use crate::render::RenderCtx;
use crate::text::{FontId, FontLoadError, FontSystem};

use super::draw::{DrawList, TextRun, ZIndex};
use super::glyphs;

/// Widget colors and metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub panel: Color,
    pub button: Color,
    pub button_hover: Color,
    pub button_active: Color,
    pub text: Color,
    /// Label size in logical pixels when a font is loaded.
    pub text_size: f32,
    /// Logical pixels per cell of the built-in block font, used while no
    /// font is loaded.
    pub text_cell: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            panel: Color::from_srgb_u8(40, 42, 54, 235),
            button: Color::from_srgb_u8(68, 71, 90, 255),
            button_hover: Color::from_srgb_u8(98, 114, 164, 255),
            button_active: Color::from_srgb_u8(139, 233, 253, 255),
            text: Color::from_srgb_u8(248, 248, 242, 255),
            text_size: 16.0,
            text_cell: 3.0,
        }
    }
}

/// Immediate-mode overlay UI.
///
/// Widgets are recorded between `begin_frame` and `end_frame` and drawn by
/// `submit_draw`. Pointer state comes from the events offered through
/// `process_event`; the UI observes every event but claims only:
/// - pointer events while the mouse is captured or over last frame's widgets
/// - keyboard events while the keyboard is captured
///
/// Releases and modifier changes are never claimed, so held state in the
/// input module cannot get stuck. Raw pointer deltas are claimed only under
/// explicit mouse capture: the cursor is locked while they flow, so hover
/// says nothing about them.
///
/// Labels use the first loaded font and fall back to a built-in block font.
/// Fonts and style survive `init`/`quit`.
#[derive(Default)]
pub struct ImmediateUi {
    initialized: bool,
    style: Style,
    fonts: FontSystem,
    font: Option<FontId>,

    viewport: Viewport,
    scale: Vec2,
    recording: bool,
    layer: ZIndex,

    list: DrawList,
    widgets: Vec<Rect>,
    last_widgets: Vec<Rect>,

    pointer: Option<Vec2>,
    pointer_down: bool,
    press_origin: Option<Vec2>,
    pressed: bool,
    released: bool,

    capture_mouse: bool,
    capture_keyboard: bool,

    painter: Painter,
}

impl ImmediateUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: Style) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    #[inline]
    pub fn style(&self) -> &Style {
        &self.style
    }

    #[inline]
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    /// Logical size recorded by the last `begin_frame`.
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Drawable/logical ratio per axis recorded by the last `begin_frame`.
    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Parses a font. The first font loaded becomes the label font.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let id = self.fonts.load_font(bytes)?;
        self.font.get_or_insert(id);
        Ok(id)
    }

    /// Label font; `None` selects the block font.
    pub fn set_font(&mut self, font: Option<FontId>) {
        self.font = font;
    }

    #[inline]
    pub fn font(&self) -> Option<FontId> {
        self.font
    }

    #[inline]
    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    #[inline]
    pub fn draw_list(&self) -> &DrawList {
        &self.list
    }

    /// Claims all pointer events while enabled.
    pub fn set_capture_mouse(&mut self, capture: bool) {
        self.capture_mouse = capture;
    }

    /// Claims all keyboard events while enabled.
    pub fn set_capture_keyboard(&mut self, capture: bool) {
        self.capture_keyboard = capture;
    }

    pub fn want_capture_mouse(&self) -> bool {
        self.capture_mouse || self.last_widgets.iter().any(|&r| self.hovered(r))
    }

    #[inline]
    pub fn want_capture_keyboard(&self) -> bool {
        self.capture_keyboard
    }

    /// Layer for subsequent widgets. Reset to 0 by `begin_frame`.
    pub fn set_layer(&mut self, z: i32) {
        self.layer = ZIndex(z);
    }

    #[inline]
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn hovered(&self, rect: Rect) -> bool {
        self.pointer.is_some_and(|p| rect.contains(p))
    }

    /// Decorative fill. Does not block the pointer.
    pub fn fill(&mut self, rect: Rect, color: Color) {
        debug_assert!(self.recording, "widget recorded outside begin/end_frame");
        self.list.push_rect(self.layer, rect, color);
    }

    /// Background panel. Blocks the pointer from reaching input.
    pub fn panel(&mut self, rect: Rect) {
        let color = self.style.panel;
        self.fill(rect, color);
        self.widgets.push(rect);
    }

    /// Panel whose contents are clipped to it. Close with
    /// [`ImmediateUi::end_panel`].
    pub fn begin_panel(&mut self, rect: Rect) {
        self.panel(rect);
        self.list.push_clip(rect);
    }

    pub fn end_panel(&mut self) {
        self.list.pop_clip();
    }

    /// Size of `text` drawn by [`ImmediateUi::label`].
    pub fn label_size(&self, text: &str) -> Vec2 {
        if let Some(font) = self.font {
            return self
                .fonts
                .measure_text(text, font, self.style.text_size, self.scale.y);
        }
        let cell = self.style.text_cell;
        Vec2::new(
            glyphs::text_cells(text) as f32 * cell,
            glyphs::GLYPH_H as f32 * cell,
        )
    }

    /// Draws `text` with its top-left corner at `at`; returns its bounds.
    pub fn label(&mut self, at: Vec2, text: &str) -> Rect {
        let color = self.style.text;
        self.label_colored(at, text, color)
    }

    pub fn label_colored(&mut self, at: Vec2, text: &str, color: Color) -> Rect {
        debug_assert!(self.recording, "widget recorded outside begin/end_frame");
        let bounds = Rect {
            origin: at,
            size: self.label_size(text),
        };

        if let Some(font) = self.font {
            self.list.push_text(
                self.layer,
                TextRun {
                    text: text.to_owned(),
                    font,
                    size: self.style.text_size,
                    color,
                    origin: at,
                },
            );
            return bounds;
        }

        let cell = self.style.text_cell;
        for (i, c) in text.chars().enumerate() {
            let x0 = at.x + (i as u32 * glyphs::ADVANCE) as f32 * cell;
            for (col, row) in glyphs::cells(c) {
                let cell_rect = Rect::new(
                    x0 + col as f32 * cell,
                    at.y + row as f32 * cell,
                    cell,
                    cell,
                );
                self.fill(cell_rect, color);
            }
        }
        bounds
    }

    /// Push button with a centered label. Returns `true` on the frame the
    /// left button is released over it after being pressed over it.
    pub fn button(&mut self, rect: Rect, text: &str) -> bool {
        let hovered = self.hovered(rect);
        let armed = self.press_origin.is_some_and(|p| rect.contains(p));

        let color = if hovered && armed && self.pointer_down {
            self.style.button_active
        } else if hovered {
            self.style.button_hover
        } else {
            self.style.button
        };
        self.fill(rect, color);
        self.widgets.push(rect);

        let size = self.label_size(text);
        self.label(rect.center() - size * 0.5, text);

        hovered && armed && self.released
    }

    fn observe(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerMoved { x, y } => self.pointer = Some(Vec2::new(*x, *y)),
            InputEvent::PointerLeft => self.pointer = None,
            InputEvent::PointerButton(b) if b.button == MouseButton::Left => {
                let at = Vec2::new(b.x, b.y);
                self.pointer = Some(at);
                match b.state {
                    MouseButtonState::Pressed => {
                        self.pointer_down = true;
                        self.pressed = true;
                        self.press_origin = Some(at);
                    }
                    MouseButtonState::Released => {
                        self.pointer_down = false;
                        self.released = true;
                    }
                }
            }
            InputEvent::Focused(false) => {
                self.pointer_down = false;
                self.press_origin = None;
            }
            _ => {}
        }
    }

    /// Drops frame, pointer and GPU state. Style and fonts are kept.
    fn reset(&mut self) {
        let kept = Self {
            style: std::mem::take(&mut self.style),
            fonts: std::mem::take(&mut self.fonts),
            font: self.font,
            ..Self::default()
        };
        *self = kept;
    }
}

impl UiModule for ImmediateUi {
    type Graphics = WgpuGraphics;

    fn init(&mut self) -> Result<()> {
        debug_assert!(!self.initialized, "ui initialized twice");
        self.reset();
        self.initialized = true;
        Ok(())
    }

    fn quit(&mut self) {
        debug_assert!(self.initialized, "ui quit without init");
        // Drops GPU resources before the device goes away.
        self.reset();
    }

    fn begin_frame(&mut self, width: u32, height: u32, scale_x: f32, scale_y: f32) {
        self.list.clear();
        self.widgets.clear();
        self.viewport = Viewport::new(width as f32, height as f32);
        self.scale = Vec2::new(scale_x, scale_y);
        self.layer = ZIndex::default();
        self.recording = true;
    }

    fn end_frame(&mut self) {
        debug_assert_eq!(self.list.clip_depth(), 0, "begin_panel without end_panel");
        self.recording = false;
        std::mem::swap(&mut self.widgets, &mut self.last_widgets);
        self.widgets.clear();

        self.pressed = false;
        self.released = false;
        if !self.pointer_down {
            self.press_origin = None;
        }
    }

    fn process_event(&mut self, event: &PlatformEvent) -> bool {
        let Some(ev) = event.as_input() else {
            return false;
        };
        self.observe(ev);

        if ev.is_release() || matches!(ev, InputEvent::ModifiersChanged(_)) {
            return false;
        }
        match ev.category() {
            EventCategory::Pointer => match ev {
                InputEvent::PointerLeft => false,
                InputEvent::PointerDelta { .. } => self.capture_mouse,
                _ => self.want_capture_mouse(),
            },
            EventCategory::Keyboard => self.want_capture_keyboard(),
            EventCategory::Other => false,
        }
    }

    fn submit_draw(&mut self, graphics: &mut WgpuGraphics) {
        if self.list.is_empty() || !self.viewport.is_valid() {
            return;
        }

        let (viewport, scale) = (self.viewport, self.scale);
        let (painter, list, fonts) = (&mut self.painter, &mut self.list, &self.fonts);
        graphics.with_frame(|gpu, target| {
            let ctx = RenderCtx::new(
                gpu.device(),
                gpu.queue(),
                gpu.surface_format(),
                viewport,
                scale,
            );
            painter.render(&ctx, target, list, fonts);
        });
    }
}
