mod audio;
mod config;
mod game;
mod input;
mod prefs;
mod render;
mod session;
mod snake;
mod state;
mod term;
mod ticker;

use std::fs::File;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::WriteLogger;

use crate::audio::{Bell, CuePlayer, Silent};
use crate::config::Args;
use crate::prefs::PrefsStore;
use crate::snake::Direction;

pub type TermInt = u16;
pub type Coords = (u16, u16);

/// A board position. `x` is the column and `y` the row; signed so a head that
/// left the board can still be represented.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn step(&self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout belongs to the game, so logs go to a file
    let level: LevelFilter = args.log_level.parse()
        .map_err(|_| anyhow!("Unknown log level '{}'", args.log_level))?;
    let log_file = File::create(&args.log_file)
        .with_context(|| format!("Failed to create log file {}", args.log_file.display()))?;
    WriteLogger::init(level, simplelog::Config::default(), log_file)
        .context("Failed to initialize logger")?;

    info!("Starting snake {}", env!("CARGO_PKG_VERSION"));

    let store = PrefsStore::new(&args.prefs);
    let mut prefs = store.load()?;

    if let Some(difficulty) = args.difficulty {
        prefs.set_difficulty(difficulty);
        store.save_or_warn(&prefs);
    }
    info!("Difficulty {:?}, high score {}", prefs.difficulty(), prefs.high_score);

    let cues: Box<dyn CuePlayer> = if args.mute { Box::new(Silent) } else { Box::new(Bell) };

    let mut game = game::SnakeGame::new(prefs, store, cues);
    game.run()
}
