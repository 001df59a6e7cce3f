use crate::grid::{Cell, Grid};
use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Up, Down) | (Down, Up) | (Left, Right) | (Right, Left)
        )
    }

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    HitWall,
    HitSelf,
}

/// The snake's body, head first.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Cell>,
    direction: Direction,
    next_direction: Direction,
}

impl Snake {
    pub const SEED_LENGTH: usize = 3;

    /// Starts a snake on `seed` (head first), heading up.
    pub fn spawn(seed: [Cell; Snake::SEED_LENGTH]) -> Self {
        Snake {
            body: seed.to_vec(),
            direction: Up,
            next_direction: Up,
        }
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// The direction the next step will take.
    pub fn direction(&self) -> Direction {
        self.next_direction
    }

    /// Reversing onto the neck is ignored. Compared against the direction of the
    /// last completed step, so two quick turns within one tick cannot fold back.
    pub fn set_direction(&mut self, new_direction: Direction) {
        if !new_direction.is_opposite(self.direction) {
            self.next_direction = new_direction;
        }
    }

    /// Advances the head one cell. On `Continue` the new head is already in the
    /// body and the caller must follow up with [`Snake::finish_step`].
    ///
    /// Self collision is checked against the whole body from the previous tick,
    /// including the tail cell that is about to be vacated.
    pub fn step(&mut self, grid: &Grid) -> StepResult {
        let (dx, dy) = self.next_direction.delta();
        let new_head = self.head().moved_by(dx, dy);
        self.direction = self.next_direction;

        if !grid.is_in_bounds(new_head) {
            return StepResult::HitWall;
        }
        if self.body.contains(&new_head) {
            return StepResult::HitSelf;
        }

        self.body.insert(0, new_head);
        StepResult::Continue
    }

    /// Drops the tail unless the snake grew on this tick.
    pub fn finish_step(&mut self, grew: bool) {
        if !grew {
            self.body.pop();
        }
    }
}
