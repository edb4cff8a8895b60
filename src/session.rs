use log::{debug, info};
use rand::Rng;

use crate::input::{Command, InputHandler};
use crate::prefs::{Difficulty, Preferences};
use crate::render::{render, DrawCommand, Hud};
use crate::state::{GameState, Phase};

/// What the loop has to react to after a command or a tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Started,
    Paused,
    Resumed,
    Ate,
    GameOver { score: u32, new_high_score: bool, won: bool },
    DifficultyChanged(Difficulty),
    Restarted,
    Quit,
}

/// The game state plus everything that routes input into it. Owns no I/O:
/// the caller schedules ticks, draws frames and persists preferences.
pub struct Session<R: Rng> {
    state: GameState,
    input: InputHandler,
    prefs: Preferences,
    new_high_score: bool,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn new(prefs: Preferences, rng: R) -> Self {
        Session {
            state: GameState::new(),
            input: InputHandler::new(),
            prefs,
            new_high_score: false,
            rng,
        }
    }

    #[cfg(test)]
    pub fn with_state(state: GameState, prefs: Preferences, rng: R) -> Self {
        Session { state, ..Session::new(prefs, rng) }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn hud(&self) -> Hud {
        Hud {
            high_score: self.prefs.high_score,
            difficulty: self.prefs.difficulty(),
            new_high_score: self.new_high_score,
        }
    }

    pub fn frame(&self) -> Vec<DrawCommand> {
        render(&self.state, &self.hud())
    }

    pub fn handle(&mut self, cmd: Command) -> Option<Event> {
        if cmd == Command::Quit {
            return Some(Event::Quit);
        }

        match (self.state.phase(), cmd) {
            (Phase::Over, _) => {
                self.state.reset();
                self.input.clear();
                self.new_high_score = false;
                info!("Restarting");
                Some(Event::Restarted)
            }

            (Phase::NotStarted, Command::Start) => {
                self.state.start(&mut self.rng);
                Some(Event::Started)
            }
            (Phase::NotStarted, Command::SelectDifficulty(difficulty)) => {
                if difficulty == self.prefs.difficulty() {
                    return None;
                }
                self.prefs.set_difficulty(difficulty);
                info!("Difficulty set to {:?}", difficulty);
                Some(Event::DifficultyChanged(difficulty))
            }

            (Phase::Running, Command::Turn(dir)) => {
                self.input.apply_turn(dir, self.state.direction());
                None
            }
            (Phase::Running, Command::TogglePause) => {
                self.state.toggle_pause();
                Some(Event::Paused)
            }
            (Phase::Paused, Command::TogglePause) => {
                self.state.toggle_pause();
                Some(Event::Resumed)
            }

            (phase, cmd) => {
                debug!("Ignoring {:?} while {:?}", cmd, phase);
                None
            }
        }
    }

    /// Runs one simulation step with whatever turn was buffered since the
    /// last one. Outside of Running this changes nothing.
    pub fn tick(&mut self) -> Vec<Event> {
        let turn = self.input.take_pending();
        let Some(outcome) = self.state.tick(turn, &mut self.rng) else {
            return vec![];
        };

        let mut events = vec![];

        if outcome.ate {
            events.push(Event::Ate);
        }

        if outcome.terminal {
            let score = self.state.score();
            self.new_high_score = self.prefs.record_score(score);
            events.push(Event::GameOver {
                score,
                new_high_score: self.new_high_score,
                won: outcome.won,
            });
        }

        events
    }
}
