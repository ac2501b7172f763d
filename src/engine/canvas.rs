// Per-frame drawing and query façade handed to the frame callback

use crate::core::math::{to_pixel, IRect};
use crate::engine::assets::{AssetError, AssetManager};
use crate::engine::audio::Mixer;
use crate::engine::config::EngineConfig;
use crate::engine::input::{InputState, KeyRef, Modifiers, RawEvent};
use crate::engine::renderer::{self, Color, Surface};
use glam::Vec2;
use log::warn;
use std::path::Path;

/// Default pixel size for `draw_text`
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Current color and stroke width
///
/// Persists across frames until changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawStyle {
    pub color: Color,
    pub stroke_width: u32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            stroke_width: 1,
        }
    }
}

/// Part of an image to blit
///
/// Only a region with all four edges given is honored. Anything else draws
/// the whole image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubRegion {
    pub left: Option<i32>,
    pub top: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl SubRegion {
    /// A fully specified region
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::from_parts(Some(left), Some(top), Some(width), Some(height))
    }

    pub fn from_parts(
        left: Option<i32>,
        top: Option<i32>,
        width: Option<i32>,
        height: Option<i32>,
    ) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The rectangle, if every edge is present
    pub fn rect(&self) -> Option<IRect> {
        match (self.left, self.top, self.width, self.height) {
            (Some(l), Some(t), Some(w), Some(h)) => Some(IRect::new(l, t, w, h)),
            _ => None,
        }
    }

    /// Some but not all edges given
    pub fn is_partial(&self) -> bool {
        self.rect().is_none() && *self != Self::default()
    }
}

/// Drawing surface, style, input view, assets and audio for one session
pub struct Canvas {
    surface: Surface,
    style: DrawStyle,
    input: InputState,
    assets: AssetManager,
    mixer: Mixer,
    elapsed: f32,
    exit_requested: bool,
    warnings: u32,
}

impl Canvas {
    /// Create a canvas for `config`, opening the default audio output
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_parts(
            Surface::new(config.width, config.height),
            InputState::new(config.pixel_size),
            AssetManager::new(&config.asset_root),
            Mixer::new(),
        )
    }

    /// A canvas with no audio device, scale 1 and assets under the working directory
    pub fn headless(width: u32, height: u32) -> Self {
        Self::with_parts(
            Surface::new(width, height),
            InputState::new(1),
            AssetManager::new("."),
            Mixer::silent(),
        )
    }

    fn with_parts(surface: Surface, input: InputState, assets: AssetManager, mixer: Mixer) -> Self {
        Self {
            surface,
            style: DrawStyle::default(),
            input,
            assets,
            mixer,
            elapsed: 0.0,
            exit_requested: false,
            warnings: 0,
        }
    }

    /// Use `assets` for every later image, sound and font lookup
    pub fn with_assets(mut self, assets: AssetManager) -> Self {
        self.assets = assets;
        self
    }

    /// Refresh input from this frame's events and record the frame time
    pub(crate) fn begin_frame(&mut self, events: &[RawEvent], elapsed: f32) {
        self.input.process_frame(events);
        self.elapsed = elapsed;
    }

    fn warn_usage(&mut self, message: &str) {
        self.warnings += 1;
        warn!("{}", message);
    }

    // Style

    pub fn set_color(&mut self, r: u8, g: u8, b: u8) {
        self.style.color = Color::new(r, g, b);
    }

    /// Set the outline width; values below 1 become 1 with a warning
    pub fn set_stroke_width(&mut self, width: i32) {
        if width < 1 {
            self.warn_usage(&format!("stroke width {} is below 1, using 1", width));
            self.style.stroke_width = 1;
        } else {
            self.style.stroke_width = width as u32;
        }
    }

    pub fn color(&self) -> Color {
        self.style.color
    }

    pub fn stroke_width(&self) -> u32 {
        self.style.stroke_width
    }

    pub fn style(&self) -> DrawStyle {
        self.style
    }

    /// Usage warnings emitted so far
    pub fn warning_count(&self) -> u32 {
        self.warnings
    }

    // Primitives

    pub fn clear(&mut self) {
        self.surface.clear(Color::BLACK);
    }

    pub fn clear_color(&mut self, r: u8, g: u8, b: u8) {
        self.surface.clear(Color::new(r, g, b));
    }

    pub fn draw_pixel(&mut self, x: f32, y: f32) {
        self.surface
            .set_pixel(to_pixel(x), to_pixel(y), self.style.color);
    }

    pub fn draw_rect(&mut self, left: i32, top: i32, width: i32, height: i32) {
        self.surface.stroke_rect(
            IRect::new(left, top, width, height),
            self.style.color,
            self.style.stroke_width,
        );
    }

    pub fn fill_rect(&mut self, left: i32, top: i32, width: i32, height: i32) {
        self.surface
            .fill_rect(IRect::new(left, top, width, height), self.style.color);
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.surface.line(
            (to_pixel(x1), to_pixel(y1)),
            (to_pixel(x2), to_pixel(y2)),
            self.style.color,
            self.style.stroke_width,
        );
    }

    pub fn draw_triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32)) {
        self.draw_polygon(&[a, b, c]);
    }

    pub fn fill_triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32)) {
        self.fill_polygon(&[a, b, c]);
    }

    pub fn draw_polygon(&mut self, points: &[(f32, f32)]) {
        let points = to_points(points);
        self.surface
            .stroke_polygon(&points, self.style.color, self.style.stroke_width);
    }

    pub fn fill_polygon(&mut self, points: &[(f32, f32)]) {
        let points = to_points(points);
        self.surface.fill_polygon(&points, self.style.color);
    }

    /// Outline a circle; a radius below 1 draws nothing
    pub fn draw_circle(&mut self, x: f32, y: f32, radius: f32) {
        if radius < 1.0 {
            return;
        }
        self.surface.stroke_circle(
            (to_pixel(x), to_pixel(y)),
            to_pixel(radius),
            self.style.color,
            self.style.stroke_width,
        );
    }

    /// Fill a circle; a radius below 1 draws nothing
    pub fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        if radius < 1.0 {
            return;
        }
        self.surface
            .fill_circle((to_pixel(x), to_pixel(y)), to_pixel(radius), self.style.color);
    }

    /// Blit a whole image with its top-left at (x, y)
    pub fn draw_image<P: AsRef<Path>>(&mut self, x: i32, y: i32, path: P) -> Result<(), AssetError> {
        self.draw_image_region(x, y, path, SubRegion::default())
    }

    /// Blit part of an image; an incomplete region draws the whole image
    pub fn draw_image_region<P: AsRef<Path>>(
        &mut self,
        x: i32,
        y: i32,
        path: P,
        region: SubRegion,
    ) -> Result<(), AssetError> {
        let image = self.assets.image(path.as_ref())?;
        if region.is_partial() {
            self.warn_usage(&format!(
                "incomplete sub-region for {}, drawing the whole image",
                path.as_ref().display()
            ));
        }
        self.surface.blit(&image.pixels, x, y, region.rect());
        Ok(())
    }

    /// Render `text` in the current color, top-left anchored at (x, y)
    pub fn draw_text<P: AsRef<Path>>(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        size: u32,
        font: P,
    ) -> Result<(), AssetError> {
        let font = self.assets.font(font, size)?;
        renderer::draw_text(&mut self.surface, &font, x, y, text, self.style.color);
        Ok(())
    }

    /// Start playing a sound; repeated calls overlap
    pub fn play_sound<P: AsRef<Path>>(&mut self, path: P, looping: bool) -> Result<(), AssetError> {
        let sound = self.assets.sound(path)?;
        self.mixer.play(&sound, looping);
        Ok(())
    }

    /// Stop the loop after this frame's callback returns
    pub fn exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    // Queries

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Seconds since the previous frame
    pub fn elapsed_time(&self) -> f32 {
        self.elapsed
    }

    pub fn mouse_x(&self) -> f32 {
        self.input.pointer_position().0
    }

    pub fn mouse_y(&self) -> f32 {
        self.input.pointer_position().1
    }

    pub fn modifiers(&self) -> Modifiers {
        self.input.modifiers()
    }

    pub fn is_down<'a>(&self, key: impl Into<KeyRef<'a>>) -> bool {
        self.input.is_down(key)
    }

    pub fn was_pressed<'a>(&self, key: impl Into<KeyRef<'a>>) -> bool {
        self.input.was_pressed(key)
    }

    pub fn was_pressed_with<'a, M>(&self, key: impl Into<KeyRef<'a>>, required: M) -> bool
    where
        M: IntoIterator<Item = Modifiers>,
    {
        self.input.was_pressed_with(key, required)
    }

    pub fn was_released<'a>(&self, key: impl Into<KeyRef<'a>>) -> bool {
        self.input.was_released(key)
    }

    pub fn was_released_with<'a, M>(&self, key: impl Into<KeyRef<'a>>, required: M) -> bool
    where
        M: IntoIterator<Item = Modifiers>,
    {
        self.input.was_released_with(key, required)
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn assets(&self) -> &AssetManager {
        &self.assets
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }
}

fn to_points(points: &[(f32, f32)]) -> Vec<Vec2> {
    points.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::{KeyCode, Keycode};
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;
    use tempfile::TempDir;

    const FONT: &str = "fonts/DejaVuSansMono.ttf";

    fn fixture_assets() -> AssetManager {
        AssetManager::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"))
    }

    /// Every pixel that is not black, as (x, y, color)
    fn painted(canvas: &Canvas) -> Vec<(i32, i32, Color)> {
        let mut out = Vec::new();
        for y in 0..canvas.height() as i32 {
            for x in 0..canvas.width() as i32 {
                match canvas.surface().pixel(x, y) {
                    Some(c) if c != Color::BLACK => out.push((x, y, c)),
                    _ => {}
                }
            }
        }
        out
    }

    fn canvas_with_image() -> (TempDir, Canvas) {
        let dir = tempfile::tempdir().unwrap();
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        image.put_pixel(3, 3, Rgba([0, 0, 255, 255]));
        image.save(dir.path().join("tile.png")).unwrap();

        let canvas = Canvas::headless(20, 20).with_assets(AssetManager::new(dir.path()));
        (dir, canvas)
    }

    #[test]
    fn test_initial_style() {
        let canvas = Canvas::headless(10, 10);
        assert_eq!(canvas.color(), Color::WHITE);
        assert_eq!(canvas.stroke_width(), 1);
        assert!(!canvas.exit_requested());
    }

    #[test]
    fn test_stroke_width_clamp_warns_once() {
        let mut canvas = Canvas::headless(10, 10);
        canvas.set_stroke_width(0);
        assert_eq!(canvas.stroke_width(), 1);
        assert_eq!(canvas.warning_count(), 1);

        canvas.set_stroke_width(3);
        assert_eq!(canvas.stroke_width(), 3);
        assert_eq!(canvas.warning_count(), 1);
    }

    #[test]
    fn test_style_persists_across_frames() {
        let mut canvas = Canvas::headless(10, 10);
        canvas.set_color(0, 255, 0);
        canvas.set_stroke_width(2);

        canvas.begin_frame(&[], 0.016);
        canvas.begin_frame(&[], 0.016);

        assert_eq!(canvas.color(), Color::new(0, 255, 0));
        assert_eq!(canvas.stroke_width(), 2);
    }

    #[test]
    fn test_fill_rect_uses_current_color() {
        let mut canvas = Canvas::headless(10, 10);
        canvas.set_color(10, 20, 30);
        canvas.fill_rect(2, 2, 3, 3);

        assert_eq!(canvas.surface().pixel(3, 3), Some(Color::new(10, 20, 30)));
        assert_eq!(canvas.surface().pixel(6, 6), Some(Color::BLACK));
    }

    #[test]
    fn test_clear_color() {
        let mut canvas = Canvas::headless(4, 4);
        canvas.clear_color(1, 2, 3);
        assert_eq!(canvas.surface().pixel(0, 0), Some(Color::new(1, 2, 3)));
        canvas.clear();
        assert_eq!(canvas.surface().pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_draw_pixel_rounds() {
        let mut canvas = Canvas::headless(4, 4);
        canvas.draw_pixel(1.6, 0.4);
        assert_eq!(canvas.surface().pixel(2, 0), Some(Color::WHITE));
    }

    #[test]
    fn test_draw_image_loads_once() {
        let (_dir, mut canvas) = canvas_with_image();

        canvas.draw_image(0, 0, "tile.png").unwrap();
        canvas.draw_image(10, 10, "tile.png").unwrap();

        assert_eq!(canvas.assets().stats().image_loads, 1);
        assert_eq!(canvas.surface().pixel(0, 0), Some(Color::new(255, 0, 0)));
        assert_eq!(canvas.surface().pixel(13, 13), Some(Color::new(0, 0, 255)));
    }

    #[test]
    fn test_draw_image_region() {
        let (_dir, mut canvas) = canvas_with_image();

        canvas
            .draw_image_region(0, 0, "tile.png", SubRegion::new(3, 3, 1, 1))
            .unwrap();

        assert_eq!(canvas.surface().pixel(0, 0), Some(Color::new(0, 0, 255)));
        assert_eq!(canvas.surface().pixel(1, 1), Some(Color::BLACK));
        assert_eq!(canvas.warning_count(), 0);
    }

    #[test]
    fn test_partial_region_draws_whole_image() {
        let (_dir, mut canvas) = canvas_with_image();
        let region = SubRegion::from_parts(Some(3), Some(3), None, Some(1));

        canvas.draw_image_region(0, 0, "tile.png", region).unwrap();

        assert_eq!(canvas.warning_count(), 1);
        assert_eq!(canvas.surface().pixel(0, 0), Some(Color::new(255, 0, 0)));
        assert_eq!(canvas.surface().pixel(3, 3), Some(Color::new(0, 0, 255)));
    }

    #[test]
    fn test_missing_image_is_error_and_not_cached() {
        let (dir, mut canvas) = canvas_with_image();

        assert!(matches!(
            canvas.draw_image(0, 0, "late.png"),
            Err(AssetError::NotFound(_))
        ));

        RgbaImage::new(1, 1).save(dir.path().join("late.png")).unwrap();
        assert!(canvas.draw_image(0, 0, "late.png").is_ok());
    }

    #[test]
    fn test_play_sound_missing_file() {
        let mut canvas = Canvas::headless(4, 4);
        assert!(canvas.play_sound("nope.wav", false).is_err());
        assert_eq!(canvas.mixer().plays(), 0);
    }

    #[test]
    fn test_play_sound_loads_once_and_overlaps() {
        let dir = tempfile::tempdir().unwrap();
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(dir.path().join("blip.wav"), spec).unwrap();
        for i in 0..800 {
            writer.write_sample(((i % 40) as i16 - 20) * 500).unwrap();
        }
        writer.finalize().unwrap();

        let mut canvas = Canvas::headless(4, 4).with_assets(AssetManager::new(dir.path()));
        canvas.play_sound("blip.wav", false).unwrap();
        canvas.play_sound("blip.wav", true).unwrap();

        assert_eq!(canvas.assets().stats().sound_loads, 1);
        assert_eq!(canvas.mixer().plays(), 2);
    }

    #[test]
    fn test_draw_text_top_left_in_current_color() {
        let mut canvas = Canvas::headless(120, 60).with_assets(fixture_assets());
        canvas.set_color(255, 0, 0);

        canvas.draw_text(20, 10, "Hi", 24, FONT).unwrap();

        let pixels = painted(&canvas);
        assert!(!pixels.is_empty());
        for &(x, y, c) in &pixels {
            assert!(x >= 20 && y >= 10, "pixel ({}, {}) above or left of origin", x, y);
            assert!(y < 10 + 36);
            assert_eq!((c.g, c.b), (0, 0));
        }
        assert!(pixels.iter().any(|&(_, _, c)| c.r > 200));
    }

    #[test]
    fn test_draw_text_caches_font_per_size() {
        let mut canvas = Canvas::headless(60, 30).with_assets(fixture_assets());

        canvas.draw_text(0, 0, "a", 16, FONT).unwrap();
        canvas.draw_text(0, 0, "b", 16, FONT).unwrap();
        assert_eq!(canvas.assets().stats().font_loads, 1);

        canvas.draw_text(0, 0, "c", DEFAULT_FONT_SIZE, FONT).unwrap();
        let stats = canvas.assets().stats();
        assert_eq!(stats.font_loads, 2);
        assert_eq!(stats.font_count, 2);
    }

    #[test]
    fn test_draw_text_missing_font() {
        let mut canvas = Canvas::headless(10, 10).with_assets(fixture_assets());
        assert!(matches!(
            canvas.draw_text(0, 0, "x", 12, "fonts/none.ttf"),
            Err(AssetError::NotFound(_))
        ));
        assert!(painted(&canvas).is_empty());
    }

    #[test]
    fn test_circle_radius_below_one_draws_nothing() {
        let mut canvas = Canvas::headless(5, 5);
        canvas.fill_circle(2.0, 2.0, 0.7);
        canvas.draw_circle(2.0, 2.0, 0.99);
        assert!(painted(&canvas).is_empty());

        canvas.fill_circle(2.0, 2.0, 1.0);
        assert_eq!(canvas.surface().pixel(2, 2), Some(Color::WHITE));
        assert_eq!(canvas.surface().pixel(3, 2), Some(Color::WHITE));
        assert_eq!(canvas.surface().pixel(3, 3), Some(Color::BLACK));
    }

    #[test]
    fn test_huge_circle_and_long_line() {
        let mut canvas = Canvas::headless(200, 150);
        canvas.fill_circle(100.0, 75.0, 50_000.0);
        assert_eq!(painted(&canvas).len(), 200 * 150);

        canvas.clear();
        canvas.draw_line(0.0, 0.0, 1.0e9, 0.0);
        assert_eq!(painted(&canvas).len(), 200);
    }

    #[test]
    fn test_exit_sets_flag() {
        let mut canvas = Canvas::headless(4, 4);
        canvas.exit();
        assert!(canvas.exit_requested());
    }

    #[test]
    fn test_queries_follow_frame_input() {
        let mut canvas = Canvas::headless(200, 150);
        canvas.begin_frame(
            &[
                RawEvent::key_typed(Keycode::key(KeyCode::KeyA), "a"),
                RawEvent::PointerMoved {
                    position: (12.0, 34.0),
                },
            ],
            0.1,
        );

        assert_eq!(canvas.width(), 200);
        assert_eq!(canvas.height(), 150);
        assert!((canvas.elapsed_time() - 0.1).abs() < f32::EPSILON);
        assert_eq!(canvas.mouse_x(), 12.0);
        assert_eq!(canvas.mouse_y(), 34.0);
        assert!(canvas.is_down("a"));
        assert!(canvas.was_pressed(KeyCode::KeyA));

        canvas.begin_frame(&[], 0.1);
        assert!(canvas.is_down("a"));
        assert!(!canvas.was_pressed("a"));
    }
}
