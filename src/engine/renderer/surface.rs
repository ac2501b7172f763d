// Off-screen drawing surface

use crate::core::math::IRect;
use glam::Vec2;
use image::{Rgba, RgbaImage};

/// Opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// CPU pixel surface in logical coordinates
///
/// Every primitive clips to the surface bounds; drawing outside is a no-op.
/// The surface is always opaque.
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Create a black surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Color::BLACK.rgba()),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn bounds(&self) -> IRect {
        IRect::new(0, 0, self.width() as i32, self.height() as i32)
    }

    /// Raw RGBA bytes, row-major
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Read back a pixel
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.bounds().contains(x, y) {
            return None;
        }
        let [r, g, b, _] = self.pixels.get_pixel(x as u32, y as u32).0;
        Some(Color::new(r, g, b))
    }

    /// Fill the whole surface
    pub fn clear(&mut self, color: Color) {
        let rgba = color.rgba();
        for p in self.pixels.pixels_mut() {
            *p = rgba;
        }
    }

    /// Set a single pixel
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.bounds().contains(x, y) {
            self.pixels.put_pixel(x as u32, y as u32, color.rgba());
        }
    }

    /// Composite `src` with straight alpha `alpha` over the pixel at (x, y)
    fn blend_pixel(&mut self, x: i32, y: i32, src: [u8; 3], alpha: u8) {
        if alpha == 0 || !self.bounds().contains(x, y) {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
        if alpha == 255 {
            *dst = Rgba([src[0], src[1], src[2], 255]);
            return;
        }
        let a = u32::from(alpha);
        for (d, s) in dst.0.iter_mut().zip(src) {
            *d = ((u32::from(s) * a + u32::from(*d) * (255 - a) + 127) / 255) as u8;
        }
        dst.0[3] = 255;
    }

    /// Fill a rectangle
    pub fn fill_rect(&mut self, rect: IRect, color: Color) {
        let Some(area) = rect.intersect(&self.bounds()) else {
            return;
        };
        let rgba = color.rgba();
        for y in area.top..area.bottom() {
            for x in area.left..area.right() {
                self.pixels.put_pixel(x as u32, y as u32, rgba);
            }
        }
    }

    /// Outline a rectangle; the border grows inward by `width` pixels
    pub fn stroke_rect(&mut self, rect: IRect, color: Color, width: u32) {
        let w = width.max(1) as i32;
        if w * 2 >= rect.width || w * 2 >= rect.height {
            self.fill_rect(rect, color);
            return;
        }

        self.fill_rect(IRect::new(rect.left, rect.top, rect.width, w), color);
        self.fill_rect(
            IRect::new(rect.left, rect.bottom() - w, rect.width, w),
            color,
        );
        self.fill_rect(
            IRect::new(rect.left, rect.top + w, w, rect.height - 2 * w),
            color,
        );
        self.fill_rect(
            IRect::new(rect.right() - w, rect.top + w, w, rect.height - 2 * w),
            color,
        );
    }

    /// Draw a line; thick lines stamp a `width`-sized square along the path
    pub fn line(&mut self, from: (i32, i32), to: (i32, i32), color: Color, width: u32) {
        let w = width.clamp(1, self.width().max(self.height()).max(1)) as i32;
        let (lo, hi) = (-(w / 2), w - w / 2);

        // Only the part whose stamp can touch the surface is walked
        let reach = IRect::new(
            -hi,
            -hi,
            self.width() as i32 + 2 * hi,
            self.height() as i32 + 2 * hi,
        );
        let Some((from, to)) = reach.clip_segment(from, to) else {
            return;
        };

        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if w == 1 {
                self.set_pixel(x, y, color);
            } else {
                self.fill_rect(IRect::new(x + lo, y + lo, hi - lo, hi - lo), color);
            }

            if x == to.0 && y == to.1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Outline a closed polygon
    pub fn stroke_polygon(&mut self, points: &[Vec2], color: Color, width: u32) {
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.line(pixel(*a), pixel(b), color, width);
        }
    }

    /// Fill a polygon (even-odd rule), edges included
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            self.stroke_polygon(points, color, 1);
            return;
        }

        let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        let y0 = (min_y.ceil() as i32).max(0);
        let y1 = (max_y.floor() as i32).min(self.height() as i32 - 1);

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in y0..=y1 {
            let sy = y as f32;
            crossings.clear();

            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= sy && b.y > sy) || (b.y <= sy && a.y > sy) {
                    crossings.push(a.x + (sy - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            for span in crossings.chunks_exact(2) {
                let start = (span[0].ceil() as i32).max(0);
                let end = (span[1].floor() as i32).min(self.width() as i32 - 1);
                if end >= start {
                    self.fill_rect(IRect::new(start, y, end - start + 1, 1), color);
                }
            }
        }

        self.stroke_polygon(points, color, 1);
    }

    /// Outline a circle; the ring grows inward by `width` pixels
    pub fn stroke_circle(&mut self, center: (i32, i32), radius: i32, color: Color, width: u32) {
        let r = i64::from(radius);
        let w = i64::from(width.max(1));
        if w >= r {
            self.fill_circle(center, radius, color);
            return;
        }
        let outer = r * r;
        let inner = (r - w) * (r - w);
        self.circle_span(center, radius, color, |d2| d2 <= outer && d2 > inner);
    }

    /// Fill a circle; a radius below 1 draws nothing
    pub fn fill_circle(&mut self, center: (i32, i32), radius: i32, color: Color) {
        let r = i64::from(radius);
        self.circle_span(center, radius, color, |d2| d2 <= r * r);
    }

    /// Paint the pixels of the circle's bounding box, clipped to the surface,
    /// whose squared distance from the center satisfies `inside`
    fn circle_span(
        &mut self,
        (cx, cy): (i32, i32),
        radius: i32,
        color: Color,
        inside: impl Fn(i64) -> bool,
    ) {
        if radius < 1 {
            return;
        }
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));
        let x0 = (cx - r).max(0);
        let x1 = (cx + r).min(i64::from(self.width()) - 1);
        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(i64::from(self.height()) - 1);

        let rgba = color.rgba();
        for y in y0..=y1 {
            let dy = y - cy;
            for x in x0..=x1 {
                let dx = x - cx;
                if inside(dx * dx + dy * dy) {
                    self.pixels.put_pixel(x as u32, y as u32, rgba);
                }
            }
        }
    }

    /// Copy an image (or the `region` of it) with its top-left at (x, y)
    ///
    /// Source alpha is respected.
    pub fn blit(&mut self, src: &RgbaImage, x: i32, y: i32, region: Option<IRect>) {
        let whole = IRect::new(0, 0, src.width() as i32, src.height() as i32);
        let area = match region {
            Some(r) => r.intersect(&whole),
            None => Some(whole),
        };
        let Some(area) = area else {
            return;
        };

        for row in 0..area.height {
            for col in 0..area.width {
                let [r, g, b, a] = src
                    .get_pixel((area.left + col) as u32, (area.top + row) as u32)
                    .0;
                self.blend_pixel(x + col, y + row, [r, g, b], a);
            }
        }
    }

    /// Paint `color` through an 8-bit coverage mask of `width` columns
    pub fn blend_mask(&mut self, x: i32, y: i32, width: usize, coverage: &[u8], color: Color) {
        if width == 0 {
            return;
        }
        for (i, &a) in coverage.iter().enumerate() {
            let col = (i % width) as i32;
            let row = (i / width) as i32;
            self.blend_pixel(x + col, y + row, [color.r, color.g, color.b], a);
        }
    }
}

fn pixel(p: Vec2) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: Color = Color::new(0, 255, 0);

    fn count(surface: &Surface, color: Color) -> usize {
        let mut n = 0;
        for y in 0..surface.height() as i32 {
            for x in 0..surface.width() as i32 {
                if surface.pixel(x, y) == Some(color) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_new_surface_is_black() {
        let surface = Surface::new(4, 3);
        assert_eq!(count(&surface, Color::BLACK), 12);
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn test_set_pixel_clips() {
        let mut surface = Surface::new(4, 4);
        surface.set_pixel(-1, 0, GREEN);
        surface.set_pixel(4, 4, GREEN);
        surface.set_pixel(2, 1, GREEN);
        assert_eq!(count(&surface, GREEN), 1);
        assert_eq!(surface.pixel(2, 1), Some(GREEN));
    }

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut surface = Surface::new(10, 10);
        surface.fill_rect(IRect::new(-5, -5, 8, 8), GREEN);
        assert_eq!(count(&surface, GREEN), 9);
    }

    #[test]
    fn test_stroke_rect_leaves_interior() {
        let mut surface = Surface::new(10, 10);
        surface.stroke_rect(IRect::new(0, 0, 10, 10), GREEN, 1);
        assert_eq!(count(&surface, GREEN), 36);
        assert_eq!(surface.pixel(5, 5), Some(Color::BLACK));

        let mut thick = Surface::new(10, 10);
        thick.stroke_rect(IRect::new(0, 0, 10, 10), GREEN, 2);
        assert_eq!(count(&thick, GREEN), 100 - 36);
    }

    #[test]
    fn test_line_endpoints_inclusive() {
        let mut surface = Surface::new(10, 10);
        surface.line((1, 1), (8, 1), GREEN, 1);
        assert_eq!(count(&surface, GREEN), 8);

        let mut diagonal = Surface::new(10, 10);
        diagonal.line((0, 0), (9, 9), GREEN, 1);
        for i in 0..10 {
            assert_eq!(diagonal.pixel(i, i), Some(GREEN));
        }
    }

    #[test]
    fn test_thick_line_is_wider() {
        let mut surface = Surface::new(10, 10);
        surface.line((1, 5), (8, 5), GREEN, 3);
        assert_eq!(surface.pixel(4, 4), Some(GREEN));
        assert_eq!(surface.pixel(4, 6), Some(GREEN));
        assert_eq!(surface.pixel(4, 8), Some(Color::BLACK));
    }

    #[test]
    fn test_fill_triangle() {
        let mut surface = Surface::new(12, 12);
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
        surface.fill_polygon(&points, GREEN);

        assert_eq!(surface.pixel(1, 1), Some(GREEN));
        assert_eq!(surface.pixel(0, 10), Some(GREEN));
        assert_eq!(surface.pixel(9, 9), Some(Color::BLACK));
    }

    #[test]
    fn test_stroke_triangle_leaves_interior() {
        let mut surface = Surface::new(12, 12);
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
        surface.stroke_polygon(&points, GREEN, 1);

        assert_eq!(surface.pixel(5, 0), Some(GREEN));
        assert_eq!(surface.pixel(2, 2), Some(Color::BLACK));
    }

    #[test]
    fn test_circles() {
        let mut filled = Surface::new(21, 21);
        filled.fill_circle((10, 10), 5, GREEN);
        assert_eq!(filled.pixel(10, 10), Some(GREEN));
        assert_eq!(filled.pixel(15, 10), Some(GREEN));
        assert_eq!(filled.pixel(16, 10), Some(Color::BLACK));

        let mut ring = Surface::new(21, 21);
        ring.stroke_circle((10, 10), 5, GREEN, 1);
        assert_eq!(ring.pixel(15, 10), Some(GREEN));
        assert_eq!(ring.pixel(10, 10), Some(Color::BLACK));
    }

    #[test]
    fn test_huge_circle_is_clipped() {
        let mut filled = Surface::new(200, 150);
        filled.fill_circle((100, 75), 50_000, GREEN);
        assert_eq!(count(&filled, GREEN), 200 * 150);

        // The ring's inner edge lies far outside the surface
        let mut ring = Surface::new(200, 150);
        ring.stroke_circle((100, 75), i32::MAX, GREEN, 1);
        assert_eq!(count(&ring, Color::BLACK), 200 * 150);
    }

    #[test]
    fn test_circle_below_one_pixel_draws_nothing() {
        let mut surface = Surface::new(5, 5);
        surface.fill_circle((2, 2), 0, GREEN);
        surface.stroke_circle((2, 2), 0, GREEN, 1);
        assert_eq!(count(&surface, GREEN), 0);
    }

    #[test]
    fn test_off_surface_lines() {
        let mut surface = Surface::new(200, 150);
        surface.line((0, 0), (1_000_000_000, 0), GREEN, 1);
        assert_eq!(count(&surface, GREEN), 200);

        let mut outside = Surface::new(200, 150);
        outside.line((-1_000_000_000, -50), (1_000_000_000, -50), GREEN, 3);
        outside.line((i32::MIN, i32::MIN), (i32::MAX, i32::MIN), GREEN, 1);
        assert_eq!(count(&outside, GREEN), 0);
    }

    #[test]
    fn test_thick_line_clipped_at_edge_keeps_stamp() {
        let mut surface = Surface::new(10, 10);
        // Center row just outside; the stamp still reaches row 0
        surface.line((-100, -1), (100, -1), GREEN, 3);
        assert_eq!(surface.pixel(5, 0), Some(GREEN));
        assert_eq!(surface.pixel(5, 1), Some(Color::BLACK));
    }

    #[test]
    fn test_fill_polygon_far_outside_columns() {
        let mut surface = Surface::new(10, 10);
        let points = [
            Vec2::new(-1.0e9, 0.0),
            Vec2::new(1.0e9, 0.0),
            Vec2::new(1.0e9, 9.0),
            Vec2::new(-1.0e9, 9.0),
        ];
        surface.fill_polygon(&points, GREEN);
        assert_eq!(count(&surface, GREEN), 100);
    }

    #[test]
    fn test_blit_region_and_alpha() {
        let mut src = RgbaImage::new(4, 4);
        src.put_pixel(2, 2, Rgba([255, 0, 0, 255]));
        src.put_pixel(3, 3, Rgba([0, 0, 255, 255]));

        let mut surface = Surface::new(8, 8);
        surface.blit(&src, 1, 1, Some(IRect::new(2, 2, 1, 1)));

        assert_eq!(surface.pixel(1, 1), Some(Color::new(255, 0, 0)));
        // Outside the region, and transparent source pixels, leave the surface alone
        assert_eq!(surface.pixel(2, 2), Some(Color::BLACK));
        assert_eq!(count(&surface, Color::BLACK), 63);
    }

    #[test]
    fn test_blend_mask_half_coverage() {
        let mut surface = Surface::new(2, 1);
        surface.blend_mask(0, 0, 2, &[255, 128], Color::WHITE);
        assert_eq!(surface.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(surface.pixel(1, 0), Some(Color::new(128, 128, 128)));
    }

    #[test]
    fn test_clear() {
        let mut surface = Surface::new(3, 3);
        surface.clear(GREEN);
        assert_eq!(count(&surface, GREEN), 9);
    }
}
