use std::path::PathBuf;

use clap::Parser;

use crate::prefs::Difficulty;

#[derive(Parser, Debug)]
#[command(name = "snake", version, about = "Grid snake in the terminal")]
pub struct Args {
    /// Tick speed; also stored as the new default
    #[arg(long, value_enum)]
    pub difficulty: Option<Difficulty>,

    /// Where difficulty and high score are kept
    #[arg(long, default_value = ".snake_prefs.yaml")]
    pub prefs: PathBuf,

    #[arg(long, default_value = "snake.log")]
    pub log_file: PathBuf,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Do not ring the terminal bell
    #[arg(long)]
    pub mute: bool,
}
