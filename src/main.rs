// main.rs

mod app;

use std::path::Path;

use ggez::conf::{WindowMode, WindowSetup};
use ggez::event;
use ggez::{ContextBuilder, GameResult};

use graph_editor::config::load_config;

use crate::app::AppState;

// --- Main Function ---
pub fn main() -> GameResult {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config(Path::new("config.toml"));

    let (mut ctx, event_loop) = ContextBuilder::new("graph_editor", "graph_editor")
        .window_setup(WindowSetup::default().title(&config.window.title))
        .window_mode(
            WindowMode::default()
                .dimensions(config.window.width, config.window.height)
                .resizable(true),
        )
        .build()?;

    let app_state = AppState::new(&mut ctx, config)?;

    event::run(ctx, event_loop, app_state)
}
