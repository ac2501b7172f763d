// Engine modules: canvas, input, assets, audio, renderer, loop

pub mod assets;
pub mod audio;
pub mod canvas;
pub mod config;
pub mod game_loop;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod runner;
pub mod session;
