use anyhow::Result;
use log::info;
use simple_engine::{init_logging, Canvas, Engine, EngineConfig, KeyCode, LoggingConfig};
use std::path::PathBuf;

/// Distance from each edge where the ball turns around
const MARGIN: f32 = 10.0;

const RADIUS: f32 = 5.0;

/// (x, y, vx, vy)
type Ball = (f32, f32, f32, f32);

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    info!("Starting Simple Engine demo...");

    // Optional label font
    let font = std::env::var_os("SIMPLE_ENGINE_FONT").map(PathBuf::from);
    if font.is_none() {
        info!("SIMPLE_ENGINE_FONT not set, drawing without text");
    }

    let engine = Engine::new(EngineConfig::new(200, 150, 1).with_title("Bouncing Ball"))?;

    engine.run((10.0, 10.0, 50.0, 30.0), move |canvas: &mut Canvas, ball: Ball| {
        if canvas.was_pressed(KeyCode::Escape) {
            canvas.exit();
            return Ok(ball);
        }

        let ball = step(canvas, ball);
        let (x, y, _, _) = ball;

        canvas.clear();
        canvas.set_color(0, 255, 0);
        canvas.set_stroke_width(2);
        canvas.draw_circle(x, y, RADIUS);

        if let Some(font) = &font {
            canvas.set_color(255, 255, 255);
            canvas.draw_text(4, 4, "Bouncing", simple_engine::DEFAULT_FONT_SIZE, font)?;
        }

        Ok(ball)
    })
}

/// Move the ball and reflect it off the edges
fn step(canvas: &Canvas, (mut x, mut y, mut vx, mut vy): Ball) -> Ball {
    let dt = canvas.elapsed_time();
    let max_x = canvas.width() as f32 - 1.0 - MARGIN;
    let max_y = canvas.height() as f32 - 1.0 - MARGIN;

    x += vx * dt;
    y += vy * dt;

    if x >= max_x {
        x = max_x;
        vx = -vx.abs();
    } else if x <= MARGIN {
        x = MARGIN;
        vx = vx.abs();
    }

    if y >= max_y {
        y = max_y;
        vy = -vy.abs();
    } else if y <= MARGIN {
        y = MARGIN;
        vy = vy.abs();
    }

    (x, y, vx, vy)
}
