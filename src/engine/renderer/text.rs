// Text rasterization onto the surface

use super::surface::{Color, Surface};
use crate::engine::assets::FontAsset;
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

/// Lay out `text` with its top-left corner at (x, y)
fn layout(font: &FontAsset, x: i32, y: i32, text: &str) -> Layout<()> {
    let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
    layout.reset(&LayoutSettings {
        x: x as f32,
        y: y as f32,
        ..LayoutSettings::default()
    });
    layout.append(&[&font.font], &TextStyle::new(text, font.size, 0));
    layout
}

/// Render one line of text, anchored at its top-left corner
pub fn draw_text(surface: &mut Surface, font: &FontAsset, x: i32, y: i32, text: &str, color: Color) {
    let layout = layout(font, x, y, text);

    for glyph in layout
        .glyphs()
        .iter()
        .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
    {
        let (metrics, coverage) = font.font.rasterize_config(glyph.key);
        surface.blend_mask(
            glyph.x.round() as i32,
            glyph.y.round() as i32,
            metrics.width,
            &coverage,
            color,
        );
    }
}
