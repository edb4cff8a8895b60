use std::time::{Duration, Instant};

use anyhow::Result;
use log::info;
use rand::rngs::ThreadRng;

use crate::audio::{Cue, CuePlayer};
use crate::input::{command_for, Command};
use crate::prefs::{Preferences, PrefsStore};
use crate::session::{Event, Session};
use crate::state::{Phase, BOARD_SIZE};
use crate::term::TermManager;
use crate::ticker::Ticker;

/// How often a paused game looks for the resume key.
const PAUSE_POLL: Duration = Duration::from_millis(100);
/// How long the start and game over screens wait for a key per iteration.
const IDLE_POLL: Duration = Duration::from_millis(250);

pub struct SnakeGame {
    term: TermManager,
    session: Session<ThreadRng>,
    store: PrefsStore,
    ticker: Ticker,
    cues: Box<dyn CuePlayer>,
}

impl SnakeGame {
    pub fn new(prefs: Preferences, store: PrefsStore, cues: Box<dyn CuePlayer>) -> Self {
        let ticker = Ticker::new(prefs.difficulty().interval());
        SnakeGame {
            term: TermManager::new(BOARD_SIZE),
            session: Session::new(prefs, rand::thread_rng()),
            store,
            ticker,
            cues,
        }
    }

    /// Plays until the user quits. The terminal is restored on every way out.
    pub fn run(&mut self) -> Result<()> {
        self.term.setup()?;
        let res = self.play();
        let restored = self.term.restore();
        res.and(restored)
    }

    fn play(&mut self) -> Result<()> {
        self.draw()?;

        loop {
            let wait = self.ticker.until_due(Instant::now()).unwrap_or(
                if self.session.state().phase() == Phase::Paused {PAUSE_POLL} else {IDLE_POLL}
            );

            let mut dirty = false;

            for key_ev in self.term.read_key_events(wait)? {
                let Some(cmd) = command_for(&key_ev) else {
                    continue;
                };

                if !self.handle_command(cmd) {
                    info!("Quitting");
                    return Ok(());
                }
                dirty = true;
            }

            let now = Instant::now();
            if self.ticker.is_due(now) {
                self.step(now);
                dirty = true;
            }

            if dirty {
                self.draw()?;
            }
        }
    }

    /// Feeds one key command to the session. Returns false once the user quits.
    fn handle_command(&mut self, cmd: Command) -> bool {
        match self.session.handle(cmd) {
            Some(Event::Quit) => false,
            Some(event) => {
                self.on_event(event);
                true
            }
            None => true,
        }
    }

    /// Runs the tick that fell due at `now`.
    fn step(&mut self, now: Instant) {
        self.ticker.reschedule(now);
        for event in self.session.tick() {
            self.on_event(event);
        }
    }

    fn on_event(&mut self, event: Event) {
        let now = Instant::now();

        match event {
            Event::Started | Event::Resumed => self.ticker.start(now),
            Event::Paused | Event::Restarted => self.ticker.cancel(),
            Event::Ate => self.cues.play(Cue::Eat),
            Event::GameOver { score, new_high_score, won } => {
                self.ticker.cancel();
                self.cues.play(Cue::GameOver);
                info!("Final score {} (won: {}, new high score: {})", score, won, new_high_score);
                if new_high_score {
                    self.store.save_or_warn(self.session.prefs());
                }
            }
            Event::DifficultyChanged(difficulty) => {
                self.ticker.set_interval(difficulty.interval());
                self.store.save_or_warn(self.session.prefs());
            }
            Event::Quit => {}
        }
    }

    fn draw(&mut self) -> Result<()> {
        let frame = self.session.frame();
        self.term.draw(&frame)
    }
}
