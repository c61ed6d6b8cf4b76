use std::ops::{BitOr, BitOrAssign};

/// Window behaviour flags.
///
/// Stored as a raw bitmask so applications can pass combined values through
/// configuration. Unknown bits are ignored by the display module.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct WindowFlags(pub u32);

impl WindowFlags {
    pub const NONE: Self = Self(0);
    pub const RESIZABLE: Self = Self(1 << 0);
    pub const HIDDEN: Self = Self(1 << 1);
    pub const BORDERLESS: Self = Self(1 << 2);
    pub const MAXIMIZED: Self = Self(1 << 3);
    pub const FULLSCREEN: Self = Self(1 << 4);
    pub const ALWAYS_ON_TOP: Self = Self(1 << 5);

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for WindowFlags {
    type Output = WindowFlags;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for WindowFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Application configuration returned by `App::setup`.
///
/// `x`/`y` are ignored when `centered` is set. Sizes are logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSetup {
    pub title: String,
    pub centered: bool,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub flags: WindowFlags,
}

impl Default for AppSetup {
    fn default() -> Self {
        Self {
            title: "hearth".to_string(),
            centered: true,
            x: 0,
            y: 0,
            width: 800,
            height: 600,
            flags: WindowFlags::NONE,
        }
    }
}

impl AppSetup {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Place the window at `(x, y)` instead of centering it.
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.centered = false;
        self.x = x;
        self.y = y;
        self
    }

    pub fn flags(mut self, flags: WindowFlags) -> Self {
        self.flags = flags;
        self
    }
}
