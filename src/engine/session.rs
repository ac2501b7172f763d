// One frame at a time: events -> input -> callback -> exit check

use super::canvas::Canvas;
use super::input::RawEvent;
use anyhow::Result;

/// Whether the loop keeps running after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// A running session: the canvas plus the state threaded through the callback
///
/// The state is opaque to the engine. It is moved into the callback every
/// frame and the returned value replaces it.
pub struct Session<S, F>
where
    F: FnMut(&mut Canvas, S) -> Result<S>,
{
    canvas: Canvas,
    state: Option<S>,
    callback: F,
}

impl<S, F> Session<S, F>
where
    F: FnMut(&mut Canvas, S) -> Result<S>,
{
    pub fn new(canvas: Canvas, initial: S, callback: F) -> Self {
        Self {
            canvas,
            state: Some(initial),
            callback,
        }
    }

    /// Run one frame with this frame's raw events and elapsed seconds
    ///
    /// A quit event ends the session before the callback runs. Callback
    /// errors are returned unchanged and leave the session without state.
    pub fn step(&mut self, events: &[RawEvent], elapsed: f32) -> Result<Flow> {
        if self.canvas.exit_requested() || events.iter().any(RawEvent::is_quit) {
            return Ok(Flow::Exit);
        }

        let Some(state) = self.state.take() else {
            anyhow::bail!("session state lost after a failed frame");
        };

        self.canvas.begin_frame(events, elapsed);
        let next = (self.callback)(&mut self.canvas, state)?;
        self.state = Some(next);

        if self.canvas.exit_requested() {
            log::info!("Exit requested by frame callback");
            return Ok(Flow::Exit);
        }
        Ok(Flow::Continue)
    }

    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn into_state(self) -> Option<S> {
        self.state
    }
}
