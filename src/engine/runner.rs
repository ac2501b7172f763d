// Windowed driver: winit event loop, frame pacing and presentation

use super::canvas::Canvas;
use super::config::EngineConfig;
use super::game_loop::FrameClock;
use super::input::{EventTranslator, RawEvent};
use super::renderer::Presenter;
use super::session::{Flow, Session};
use anyhow::{Context, Result};
use log::{error, info};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

/// The engine: opens a window and runs a frame callback until exit
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Validate the configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `callback` once per frame, threading `initial` through it
    ///
    /// Returns when the callback calls `Canvas::exit`, the window is closed,
    /// or the callback fails (its error is returned).
    pub fn run<S, F>(self, initial: S, callback: F) -> Result<()>
    where
        F: FnMut(&mut Canvas, S) -> Result<S>,
    {
        let config = self.config;
        info!(
            "Starting {} ({}x{} at pixel size {})",
            config.title, config.width, config.height, config.pixel_size
        );

        let event_loop = EventLoop::new()?;
        let (window_width, window_height) = config.window_size();
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&config.title)
                .with_inner_size(PhysicalSize::new(window_width, window_height))
                .with_resizable(false)
                .build(&event_loop)
                .context("failed to create window")?,
        );

        info!("Window created successfully");

        let mut presenter = pollster::block_on(Presenter::new(
            window.clone(),
            config.width,
            config.height,
        ))?;

        let mut session = Session::new(Canvas::new(&config), initial, callback);
        let mut translator = EventTranslator::new();
        let mut clock = FrameClock::new(config.target_fps);
        let mut pending: Vec<RawEvent> = Vec::new();
        let mut caption = String::new();
        let mut failure: Option<anyhow::Error> = None;

        event_loop
            .run(|event, elwt| match event {
                Event::WindowEvent { event, window_id } if window_id == window.id() => {
                    if let WindowEvent::Resized(size) = event {
                        presenter.resize(size);
                    }
                    if let Some(raw) = translator.translate(&event) {
                        pending.push(raw);
                    }
                }
                Event::AboutToWait => {
                    let now = Instant::now();
                    if !clock.is_frame_due(now) {
                        elwt.set_control_flow(ControlFlow::WaitUntil(clock.next_deadline()));
                        return;
                    }

                    let elapsed = clock.tick_at(now);
                    let events = std::mem::take(&mut pending);

                    match session.step(&events, elapsed) {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Exit) => {
                            info!("Shutting down...");
                            elwt.exit();
                            return;
                        }
                        Err(e) => {
                            error!("Frame callback failed: {:#}", e);
                            failure = Some(e);
                            elwt.exit();
                            return;
                        }
                    }

                    let title = format!("{} (FPS: {:.0})", config.title, clock.fps());
                    if title != caption {
                        window.set_title(&title);
                        caption = title;
                    }

                    if let Err(e) = presenter.present(session.canvas().surface()) {
                        error!("Present failed: {:#}", e);
                        failure = Some(e);
                        elwt.exit();
                        return;
                    }

                    elwt.set_control_flow(ControlFlow::WaitUntil(clock.next_deadline()));
                }
                _ => {}
            })
            .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

        info!("Ran {} frames", clock.frame_count());

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
