use std::io::{stdout, Write};

use log::{debug, warn};

/// Sounds the game asks for. Nothing is ever waited on or returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cue {
    Eat,
    GameOver,
}

pub trait CuePlayer {
    fn play(&mut self, cue: Cue);
}

/// Rings the terminal bell.
pub struct Bell;

impl CuePlayer for Bell {
    fn play(&mut self, cue: Cue) {
        debug!("Cue {:?}", cue);

        let mut out = stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            warn!("Failed to ring the bell for {:?}: {e}", cue);
        }
    }
}

/// Used with `--mute`.
pub struct Silent;

impl CuePlayer for Silent {
    fn play(&mut self, cue: Cue) {
        debug!("Muted cue {:?}", cue);
    }
}
