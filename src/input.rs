use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;

use crate::prefs::Difficulty;
use crate::snake::Direction::{self, *};

/// What a key press means to the game, independent of the phase it arrives in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Start,
    SelectDifficulty(Difficulty),
    Quit,
    /// Any other key. Only meaningful as "press any key" on the game over screen.
    Other,
}

/// Maps a raw key event to a command. Key releases are ignored.
pub fn command_for(ev: &KeyEvent) -> Option<Command> {
    if ev.kind == KeyEventKind::Release {
        return None;
    }

    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    let cmd = match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Command::Turn(Up),
        KeyCode::Char('a') | KeyCode::Left => Command::Turn(Left),
        KeyCode::Char('s') | KeyCode::Down => Command::Turn(Down),
        KeyCode::Char('d') | KeyCode::Right => Command::Turn(Right),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Command::TogglePause,
        KeyCode::Enter | KeyCode::Char(' ') => Command::Start,
        KeyCode::Char('1') => Command::SelectDifficulty(Difficulty::Easy),
        KeyCode::Char('2') => Command::SelectDifficulty(Difficulty::Medium),
        KeyCode::Char('3') => Command::SelectDifficulty(Difficulty::Hard),
        _ => Command::Other,
    };

    Some(cmd)
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

/// Holds at most one direction change between two ticks.
#[derive(Debug, Default)]
pub struct InputHandler {
    pending: Option<Direction>,
}

impl InputHandler {
    pub fn new() -> Self {
        InputHandler { pending: None }
    }

    /// Buffers `candidate` for the next tick. Dropped if a change is already
    /// buffered, or if it would turn the snake straight back onto itself.
    pub fn apply_turn(&mut self, candidate: Direction, current: Direction) -> bool {
        if self.pending.is_some() {
            debug!("Dropping {:?}, already turning this tick", candidate);
            return false;
        }

        if candidate.is_opposite(&current) {
            debug!("Refusing to reverse from {:?} to {:?}", current, candidate);
            return false;
        }

        self.pending = Some(candidate);
        true
    }

    #[cfg(test)]
    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    /// Hands the buffered change to the tick and re-arms the buffer.
    pub fn take_pending(&mut self) -> Option<Direction> {
        self.pending.take()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
