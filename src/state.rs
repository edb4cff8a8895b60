use log::{debug, info};
use rand::{seq::SliceRandom, Rng};

use crate::Cell;
use crate::snake::{Snake, Direction::{self, *}};

/// Cells per board axis.
pub const BOARD_SIZE: i32 = 20;
pub const FOOD_REWARD: u32 = 10;

const INITIAL_HEAD: Cell = Cell { x: 10, y: 10 };
const INITIAL_SNAKE_LENGTH: usize = 3;
const INITIAL_DIRECTION: Direction = Right;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Paused,
    Over,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The head landed on the food this tick.
    pub ate: bool,
    /// The game ended this tick, by collision or by filling the board.
    pub terminal: bool,
    /// The board has no free cell left for food.
    pub won: bool,
}

/// Everything the loop mutates: snake, food, score and phase.
#[derive(Clone, Debug)]
pub struct GameState {
    board_size: i32,
    snake: Snake,
    food: Option<Cell>,
    score: u32,
    phase: Phase,
    won: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_board_size(BOARD_SIZE)
    }

    pub fn with_board_size(board_size: i32) -> Self {
        GameState {
            board_size,
            snake: Snake::new(INITIAL_HEAD, INITIAL_SNAKE_LENGTH, INITIAL_DIRECTION),
            food: None,
            score: 0,
            phase: Phase::NotStarted,
            won: false,
        }
    }

    pub fn board_size(&self) -> i32 {
        self.board_size
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn won(&self) -> bool {
        self.won
    }

    /// Leaves the start screen. Returns false if the game was not waiting to start.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.phase != Phase::NotStarted {
            return false;
        }

        self.food = self.spawn_food(rng);
        self.phase = Phase::Running;
        info!("Game started, food at {:?}", self.food);
        true
    }

    /// Flips between Running and Paused; any other phase is left alone.
    pub fn toggle_pause(&mut self) -> Phase {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            other => other,
        };
        self.phase
    }

    /// Throws the whole game away, keeping only the board size.
    pub fn reset(&mut self) {
        *self = GameState::with_board_size(self.board_size);
    }

    /// Advances the simulation by one step. `turn` is the buffered direction
    /// change for this tick, if any. Does nothing unless the game is running.
    pub fn tick<R: Rng + ?Sized>(&mut self, turn: Option<Direction>, rng: &mut R) -> Option<TickOutcome> {
        if self.phase != Phase::Running {
            return None;
        }

        if let Some(dir) = turn {
            self.snake.set_direction(dir);
        }

        let ate = self.food == Some(self.snake.next_head());
        let vacated = self.snake.move_step(ate);
        debug!("Head at {:?}, vacated {:?}", self.snake.head(), vacated);

        let mut outcome = TickOutcome { ate, ..Default::default() };

        if ate {
            self.score += FOOD_REWARD;
            self.food = self.spawn_food(rng);

            if self.food.is_none() { // No free cell left
                self.won = true;
                outcome.won = true;
            }
        }

        if outcome.won || self.is_terminal() {
            self.phase = Phase::Over;
            outcome.terminal = true;
            info!("Game over with score {} ({})", self.score, if self.won {"won"} else {"crashed"});
        }

        Some(outcome)
    }

    /// Wall or self collision. The tail has already been dropped on a tick
    /// without food, so the cell it vacated never counts as a hit.
    pub fn is_terminal(&self) -> bool {
        !self.in_bounds(self.snake.head()) || self.snake.bites_itself()
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.board_size).contains(&cell.x) && (0..self.board_size).contains(&cell.y)
    }

    /// Picks a cell uniformly among those the snake does not cover.
    fn spawn_food<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let size = self.board_size;
        let choices: Vec<Cell> = (0..size)
            .flat_map(|y| (0..size).map(move |x| Cell::new(x, y)))
            .filter(|cell| !self.snake.contains(cell))
            .collect();

        choices.choose(rng).copied()
    }

    #[cfg(test)]
    pub fn running_with(snake: Snake, food: Option<Cell>) -> Self {
        GameState { snake, food, phase: Phase::Running, ..GameState::new() }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn cells(raw: &[(i32, i32)]) -> Vec<Cell> {
        raw.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    fn body(state: &GameState) -> Vec<Cell> {
        state.snake().body().iter().copied().collect()
    }

    #[test]
    fn fresh_state_is_not_terminal() {
        let state = GameState::new();
        assert_eq!(state.phase(), Phase::NotStarted);
        assert_eq!(body(&state), cells(&[(10, 10), (9, 10), (8, 10)]));
        assert_eq!(state.direction(), Right);
        assert_eq!(state.score(), 0);
        assert!(!state.is_terminal());
    }

    #[test]
    fn start_places_food_off_the_snake() {
        let mut state = GameState::new();
        assert!(state.start(&mut rng()));
        assert_eq!(state.phase(), Phase::Running);
        let food = state.food().unwrap();
        assert!(!state.snake().contains(&food));
        assert!(!state.start(&mut rng()));
    }

    #[test]
    fn tick_is_ignored_unless_running() {
        let mut state = GameState::new();
        assert_eq!(state.tick(None, &mut rng()), None);
        assert_eq!(body(&state), cells(&[(10, 10), (9, 10), (8, 10)]));
    }

    #[test]
    fn eating_grows_and_scores() {
        let snake = Snake::from_cells(&cells(&[(10, 10), (9, 10), (8, 10)]), Right);
        let mut state = GameState::running_with(snake, Some(Cell::new(11, 10)));

        let outcome = state.tick(None, &mut rng()).unwrap();

        assert!(outcome.ate);
        assert!(!outcome.terminal);
        assert_eq!(body(&state), cells(&[(11, 10), (10, 10), (9, 10), (8, 10)]));
        assert_eq!(state.score(), 10);
        let food = state.food().unwrap();
        assert!(!state.snake().contains(&food));
        assert!(state.in_bounds(food));
    }

    #[test]
    fn moving_without_food_keeps_length() {
        let snake = Snake::from_cells(&cells(&[(10, 10), (9, 10), (8, 10)]), Right);
        let mut state = GameState::running_with(snake, Some(Cell::new(0, 0)));

        let outcome = state.tick(None, &mut rng()).unwrap();

        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(body(&state), cells(&[(11, 10), (10, 10), (9, 10)]));
        assert_eq!(state.score(), 0);
        assert_eq!(state.food(), Some(Cell::new(0, 0)));
    }

    #[test]
    fn buffered_turn_applies_before_moving() {
        let snake = Snake::from_cells(&cells(&[(10, 10), (9, 10), (8, 10)]), Right);
        let mut state = GameState::running_with(snake, Some(Cell::new(0, 0)));

        state.tick(Some(Down), &mut rng());
        assert_eq!(state.snake().head(), Cell::new(10, 11));

        // A reversal that slipped through is still refused by the snake
        state.tick(Some(Up), &mut rng());
        assert_eq!(state.snake().head(), Cell::new(10, 12));
    }

    #[test]
    fn leaving_the_board_ends_the_game() {
        let snake = Snake::from_cells(&cells(&[(0, 5), (1, 5), (2, 5)]), Left);
        let mut state = GameState::running_with(snake, Some(Cell::new(10, 10)));

        let outcome = state.tick(None, &mut rng()).unwrap();

        assert_eq!(state.snake().head(), Cell::new(-1, 5));
        assert!(outcome.terminal);
        assert!(state.is_terminal());
        assert_eq!(state.phase(), Phase::Over);
        assert_eq!(state.tick(None, &mut rng()), None);
    }

    #[test]
    fn walls_on_every_side() {
        let n = BOARD_SIZE;
        for head in [(5, -1), (-1, 5), (n, 5), (5, n)] {
            let snake = Snake::from_cells(&cells(&[head]), Up);
            let state = GameState::running_with(snake, None);
            assert!(state.is_terminal(), "{:?} should be out of bounds", head);
        }

        let snake = Snake::from_cells(&cells(&[(n - 1, n - 1)]), Up);
        assert!(!GameState::running_with(snake, None).is_terminal());
    }

    #[test]
    fn running_into_the_body_ends_the_game() {
        // Head at (5,5) going down into (5,6), which stays occupied
        let snake = Snake::from_cells(&cells(&[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)]), Down);
        let mut state = GameState::running_with(snake, Some(Cell::new(0, 0)));

        let outcome = state.tick(None, &mut rng()).unwrap();

        assert!(outcome.terminal);
        assert_eq!(state.phase(), Phase::Over);
    }

    #[test]
    fn chasing_the_tail_is_not_a_collision() {
        // The head moves into the cell the tail leaves on the same tick
        let snake = Snake::from_cells(&cells(&[(5, 5), (6, 5), (6, 6), (5, 6)]), Down);
        let mut state = GameState::running_with(snake, Some(Cell::new(0, 0)));

        let outcome = state.tick(None, &mut rng()).unwrap();

        assert!(!outcome.terminal);
        assert_eq!(state.phase(), Phase::Running);
        assert_eq!(body(&state), cells(&[(5, 6), (5, 5), (6, 5), (6, 6)]));
    }

    #[test]
    fn short_snake_can_collide() {
        // Four cells is enough to bite yourself when the tail does not move
        let snake = Snake::from_cells(&cells(&[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)]), Down);
        let state = GameState::running_with(snake, None);
        assert!(!state.is_terminal());

        let snake = Snake::from_cells(&cells(&[(5, 6), (5, 5), (6, 5), (6, 6), (5, 6)]), Down);
        assert!(GameState::running_with(snake, None).is_terminal());
    }

    #[test]
    fn filling_the_board_wins() {
        // 2x2 board, three cells taken, food on the last one
        let snake = Snake::from_cells(&cells(&[(0, 1), (0, 0), (1, 0)]), Right);
        let mut state = GameState {
            board_size: 2,
            ..GameState::running_with(snake, Some(Cell::new(1, 1)))
        };

        let outcome = state.tick(None, &mut rng()).unwrap();

        assert!(outcome.ate && outcome.won && outcome.terminal);
        assert!(state.won());
        assert_eq!(state.food(), None);
        assert_eq!(state.phase(), Phase::Over);
    }

    #[test]
    fn pause_toggles_only_while_playing() {
        let mut state = GameState::new();
        assert_eq!(state.toggle_pause(), Phase::NotStarted);

        state.start(&mut rng());
        assert_eq!(state.toggle_pause(), Phase::Paused);
        assert_eq!(state.tick(None, &mut rng()), None);
        assert_eq!(state.toggle_pause(), Phase::Running);
    }

    #[test]
    fn reset_starts_over() {
        let mut state = GameState::new();
        state.start(&mut rng());
        for _ in 0..20 {
            state.tick(None, &mut rng());
        }
        assert_eq!(state.phase(), Phase::Over);

        state.reset();
        assert_eq!(state.phase(), Phase::NotStarted);
        assert_eq!(state.score(), 0);
        assert_eq!(state.food(), None);
        assert_eq!(body(&state), cells(&[(10, 10), (9, 10), (8, 10)]));
    }

    #[test]
    fn random_play_keeps_invariants() {
        let mut rng = rng();
        let turns = [Up, Left, Down, Right];

        for _ in 0..50 {
            let mut state = GameState::new();
            state.start(&mut rng);

            while state.phase() == Phase::Running {
                let before_len = state.snake().len();
                let before_score = state.score();
                let turn = if rng.gen_bool(0.3) { Some(turns[rng.gen_range(0..4)]) } else { None };
                let prev_dir = state.direction();

                let outcome = state.tick(turn, &mut rng).unwrap();

                assert!(!state.direction().is_opposite(&prev_dir));
                if outcome.ate {
                    assert_eq!(state.snake().len(), before_len + 1);
                    assert_eq!(state.score(), before_score + FOOD_REWARD);
                } else {
                    assert_eq!(state.snake().len(), before_len);
                    assert_eq!(state.score(), before_score);
                }
                if let Some(food) = state.food() {
                    assert!(!state.snake().contains(&food));
                }
            }
        }
    }
}
