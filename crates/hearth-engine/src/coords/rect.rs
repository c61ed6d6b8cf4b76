use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of `size` centered on `center`.
    #[inline]
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            origin: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Shrinks every edge by `by`. Never produces a negative size.
    #[inline]
    pub fn inset(self, by: f32) -> Self {
        Rect::new(
            self.origin.x + by,
            self.origin.y + by,
            (self.size.x - 2.0 * by).max(0.0),
            (self.size.y - 2.0 * by).max(0.0),
        )
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let (mut x, mut w) = (self.origin.x, self.size.x);
        let (mut y, mut h) = (self.origin.y, self.size.y);
        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }
        Rect::new(x, y, w, h)
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        p.x >= r.origin.x
            && p.y >= r.origin.y
            && p.x < r.origin.x + r.size.x
            && p.y < r.origin.y + r.size.y
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.origin.x.max(b.origin.x);
        let y0 = a.origin.y.max(b.origin.y);
        let x1 = (a.origin.x + a.size.x).min(b.origin.x + b.size.x);
        let y1 = (a.origin.y + a.size.y).min(b.origin.y + b.size.y);

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    #[test]
    fn normalized_flips_negative_extents() {
        let n = r(10.0, 10.0, -4.0, -3.0).normalized();
        assert_eq!(n, r(6.0, 7.0, 4.0, 3.0));
    }

    #[test]
    fn containment_is_half_open() {
        let rect = r(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(9.9, 9.9)));
        assert!(!rect.contains(Vec2::new(10.0, 5.0)));
        assert!(!rect.contains(Vec2::new(-0.1, 5.0)));
    }

    #[test]
    fn intersect_overlap_and_disjoint() {
        assert_eq!(
            r(0.0, 0.0, 10.0, 10.0).intersect(r(5.0, 5.0, 10.0, 10.0)),
            Some(r(5.0, 5.0, 5.0, 5.0))
        );
        // Shared edge has zero area.
        assert_eq!(r(0.0, 0.0, 10.0, 10.0).intersect(r(10.0, 0.0, 5.0, 5.0)), None);
    }

    #[test]
    fn centered_round_trips_center() {
        let rect = Rect::centered(Vec2::new(50.0, 40.0), Vec2::new(20.0, 10.0));
        assert_eq!(rect, r(40.0, 35.0, 20.0, 10.0));
        assert_eq!(rect.center(), Vec2::new(50.0, 40.0));
    }

    #[test]
    fn inset_clamps_at_zero() {
        assert_eq!(r(0.0, 0.0, 10.0, 10.0).inset(2.0), r(2.0, 2.0, 6.0, 6.0));
        assert!(r(0.0, 0.0, 3.0, 3.0).inset(2.0).is_empty());
    }
}
