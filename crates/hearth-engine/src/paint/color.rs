/// Linear premultiplied RGBA color.
///
/// Invariant: `r`, `g`, `b` are already multiplied by `a`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_premul(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from linear straight-alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Creates a color from straight-alpha sRGB bytes, e.g. a hex literal.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(
            srgb_to_linear(r as f32 / 255.0),
            srgb_to_linear(g as f32 / 255.0),
            srgb_to_linear(b as f32 / 255.0),
            a as f32 / 255.0,
        )
    }

    /// Same color with alpha scaled by `factor`.
    #[inline]
    pub fn faded(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self::from_premul(self.r * f, self.g * f, self.b * f, self.a * f)
    }

    /// Clear value for a render pass. wgpu clears with straight alpha.
    pub fn to_wgpu(self) -> wgpu::Color {
        let (r, g, b) = if self.a <= 0.0 {
            (0.0, 0.0, 0.0)
        } else {
            (self.r / self.a, self.g / self.a, self.b / self.a)
        };
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: self.a as f64,
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
