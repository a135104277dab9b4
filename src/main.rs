mod game;
mod geometry;
mod input;
mod pellet;
mod settings;
mod snake;
mod term;

use std::fs::File;

use anyhow::{Context, Result};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};
use structopt::StructOpt;

use crate::game::{GameState, Session};
use crate::geometry::Rectangle;
use crate::settings::GameSettings;
use crate::term::TermManager;

fn main() -> Result<()> {
    let settings = GameSettings::from_args();
    init_logging(&settings)?;

    let mut term = TermManager::new().context("failed to read the terminal size")?;
    let (width, height) = term.size();
    settings.validate((width, height))?;

    let board = Rectangle::centered(width, height, settings.board_width, settings.board_height);
    info!("starting on a {}x{} terminal, board {:?}", width, height, board);

    if let Err(e) = term.setup() {
        let _ = term.restore();
        return Err(e.context("failed to set up the terminal"));
    }

    let mut session = Session::new(term, GameState::new(board), settings.tick_interval());
    let result = session.run();
    info!("last score {}", session.state().score());

    // Always try to restore the terminal, even if the game failed
    let restored = session.into_inner().restore();
    info!("session ended");
    result.and(restored)
}

fn init_logging(settings: &GameSettings) -> Result<()> {
    if let Some(path) = &settings.log_file {
        let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
        WriteLogger::init(LevelFilter::Debug, Config::default(), file)?;
    }
    Ok(())
}
