// Math utilities and helper functions

/// Round a logical coordinate to the pixel grid
pub fn to_pixel(value: f32) -> i32 {
    value.round() as i32
}

/// Integer rectangle in surface pixels
///
/// Width and height are never negative; an empty rectangle has zero area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl IRect {
    /// Create a rectangle, normalizing negative extents
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        let (left, width) = if width < 0 {
            (left.saturating_add(width), width.saturating_neg())
        } else {
            (left, width)
        };
        let (top, height) = if height < 0 {
            (top.saturating_add(height), height.saturating_neg())
        } else {
            (top, height)
        };
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.left.saturating_add(self.width)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.top.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    /// Overlapping area of two rectangles, if any
    pub fn intersect(&self, other: &IRect) -> Option<IRect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return None;
        }

        Some(IRect::new(left, top, right - left, bottom - top))
    }

    /// Clip the segment `from`..`to` (both ends inclusive) to this rectangle
    ///
    /// Segments already inside are returned unchanged; clipped ends are
    /// rounded to the nearest pixel.
    pub fn clip_segment(
        &self,
        from: (i32, i32),
        to: (i32, i32),
    ) -> Option<((i32, i32), (i32, i32))> {
        if self.is_empty() {
            return None;
        }
        if self.contains(from.0, from.1) && self.contains(to.0, to.1) {
            return Some((from, to));
        }

        // Liang-Barsky against the inclusive pixel bounds
        let (x0, y0) = (f64::from(from.0), f64::from(from.1));
        let dx = f64::from(to.0) - x0;
        let dy = f64::from(to.1) - y0;
        let (min_x, max_x) = (f64::from(self.left), f64::from(self.right()) - 1.0);
        let (min_y, max_y) = (f64::from(self.top), f64::from(self.bottom()) - 1.0);

        let mut t0 = 0.0f64;
        let mut t1 = 1.0f64;
        for (p, q) in [
            (-dx, x0 - min_x),
            (dx, max_x - x0),
            (-dy, y0 - min_y),
            (dy, max_y - y0),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }

        let at = |t: f64| ((x0 + t * dx).round() as i32, (y0 + t * dy).round() as i32);
        Some((at(t0), at(t1)))
    }
}
