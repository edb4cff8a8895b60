use crate::Cell;
use crate::prefs::Difficulty;
use crate::snake::Direction;
use crate::state::{GameState, Phase};

/// What goes into a board cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Glyph {
    Empty,
    Food,
    Head(Direction),
    Body,
    Dead,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCommand {
    /// Frame around a square board of `cells` cells per side.
    Border { cells: i32 },
    Cell { cell: Cell, glyph: Glyph },
    /// One line of text under the board.
    Status(String),
    /// A box of centred lines drawn over the board.
    Message(Vec<String>),
}

/// Values shown around the board that the game state does not own.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    pub high_score: u32,
    pub difficulty: Difficulty,
    pub new_high_score: bool,
}

/// Turns a state into the commands that draw one full frame. Later commands
/// paint over earlier ones.
pub fn render(state: &GameState, hud: &Hud) -> Vec<DrawCommand> {
    let size = state.board_size();
    let mut frame = Vec::with_capacity((size * size) as usize + 8);

    frame.push(DrawCommand::Border { cells: size });

    for y in 0..size {
        for x in 0..size {
            frame.push(DrawCommand::Cell { cell: Cell::new(x, y), glyph: Glyph::Empty });
        }
    }

    if let Some(food) = state.food() {
        frame.push(DrawCommand::Cell { cell: food, glyph: Glyph::Food });
    }

    let crashed = state.phase() == Phase::Over && !state.won();
    let snake = state.snake();

    // Tail first so the head always ends up on top
    for (i, cell) in snake.body().iter().enumerate().rev() {
        if !state.in_bounds(*cell) {
            continue;
        }
        let glyph = match (crashed, i) {
            (true, _) => Glyph::Dead,
            (false, 0) => Glyph::Head(snake.get_direction()),
            (false, _) => Glyph::Body,
        };
        frame.push(DrawCommand::Cell { cell: *cell, glyph });
    }

    frame.push(DrawCommand::Status(status_line(state, hud)));

    if let Some(lines) = overlay(state, hud) {
        frame.push(DrawCommand::Message(lines));
    }

    frame
}

fn status_line(state: &GameState, hud: &Hud) -> String {
    let hint = match state.phase() {
        Phase::NotStarted => "Enter to start",
        Phase::Running => "P to pause",
        Phase::Paused => "P to resume",
        Phase::Over => "any key to restart",
    };

    format!(
        "Score: {}  High Score: {}  {}  ({})",
        state.score(),
        hud.high_score,
        hud.difficulty.name(),
        hint
    )
}

fn overlay(state: &GameState, hud: &Hud) -> Option<Vec<String>> {
    let lines = match state.phase() {
        Phase::Running => return None,
        Phase::NotStarted => vec![
            "S N A K E".to_string(),
            String::new(),
            "Arrow keys or WASD to move".to_string(),
            "P or Esc to pause".to_string(),
            "Ctrl+C to quit".to_string(),
            String::new(),
            "Difficulty: 1 Easy  2 Medium  3 Hard".to_string(),
            format!("Selected: {}", hud.difficulty.name()),
            format!("High score: {}", hud.high_score),
            String::new(),
            "Press Enter to start".to_string(),
        ],
        Phase::Paused => vec![
            "Paused".to_string(),
            "Press P or Esc to resume".to_string(),
            "or Ctrl+C to quit".to_string(),
        ],
        Phase::Over => {
            let title = if state.won() {"You won!"} else {"Game Over"};
            let mut lines = vec![title.to_string(), format!("Score: {}", state.score())];
            if hud.new_high_score {
                lines.push("New high score!".to_string());
            }
            lines.push(String::new());
            lines.push("Press any key to play again,".to_string());
            lines.push("or Ctrl+C to quit.".to_string());
            lines
        }
    };

    Some(lines)
}
