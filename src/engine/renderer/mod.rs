// Rendering system
//
// Frames are drawn on a CPU `Surface` in logical pixels, then uploaded and
// scaled onto the window with wgpu by the `Presenter`.

mod present;
pub mod surface;
pub mod text;
mod texture;
mod vertex;

pub use present::Presenter;
pub use surface::{Color, Surface};
pub use text::draw_text;
