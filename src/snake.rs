use std::collections::VecDeque;

use crate::Cell;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit step on the grid, as `(dx, dy)` with `y` growing downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }

    pub fn head_char(&self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
}

impl Snake {
    /// Builds a snake of `size` cells with its head at `head`, trailing away
    /// from `direction`.
    pub fn new(head: Cell, size: usize, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..size.max(1) as i32)
            .map(|i| Cell::new(head.x - dx * i, head.y - dy * i))
            .collect();
        Snake { body, direction }
    }

    /// Builds a snake from explicit cells, head first.
    #[cfg(test)]
    pub fn from_cells(cells: &[Cell], direction: Direction) -> Self {
        assert!(!cells.is_empty(), "a snake needs at least one cell");
        Snake { body: cells.iter().copied().collect(), direction }
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Where the head lands on the next step.
    pub fn next_head(&self) -> Cell {
        self.head().step(self.direction)
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.body.contains(cell)
    }

    /// True when the head shares its cell with any other segment.
    pub fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|c| *c == head)
    }

    /// Advances one cell and returns the cell the tail vacated. The tail is
    /// kept when `grow` is set.
    pub fn move_step(&mut self, grow: bool) -> Option<Cell> {
        let new_head = self.next_head();
        self.body.push_front(new_head);

        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }

    /// Changes direction unless the new one is an exact reversal.
    /// Returns whether the direction was accepted.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction.is_opposite(&self.direction) {
            return false;
        }
        self.direction = new_direction;
        true
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }
}
