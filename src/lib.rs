//! A small 2D engine: one window, a pixel canvas, keyboard and mouse
//! polling, cached images, sounds and fonts, and a frame loop that threads
//! user state through a callback.
//!
//! ```no_run
//! use simple_engine::{Canvas, Engine, EngineConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let engine = Engine::new(EngineConfig::new(200, 150, 2))?;
//!     engine.run(0.0f32, |canvas: &mut Canvas, x: f32| {
//!         canvas.clear();
//!         canvas.fill_circle(x, 75.0, 5.0);
//!         Ok((x + 60.0 * canvas.elapsed_time()) % 200.0)
//!     })
//! }
//! ```

pub mod core;
pub mod engine;

pub use engine::assets::{AssetError, AssetManager};
pub use engine::canvas::{Canvas, DrawStyle, SubRegion, DEFAULT_FONT_SIZE};
pub use engine::config::{ConfigError, EngineConfig};
pub use engine::input::{KeyCode, KeyRef, Keycode, Modifiers, MouseButton};
pub use engine::logging::{init_logging, LoggingConfig};
pub use engine::renderer::Color;
pub use engine::runner::Engine;
pub use engine::session::{Flow, Session};
