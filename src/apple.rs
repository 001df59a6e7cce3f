use std::collections::HashSet;

use log::debug;
use rand::Rng;

use crate::grid::{Cell, Grid};

/// What happened to the apple on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// The head missed the apple; the snake drops its tail.
    None,
    /// The apple was eaten and respawned at the contained cell.
    Grew(Cell),
    /// The apple was eaten and the snake now covers every cell.
    Filled,
}

impl Growth {
    pub fn grew(&self) -> bool {
        !matches!(self, Growth::None)
    }
}

pub struct ApplePlacer {
    grid: Grid,
}

impl ApplePlacer {
    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }

    /// Chooses a starting apple cell that is not under the snake.
    pub fn spawn<R: Rng + ?Sized>(&self, snake_body: &[Cell], rng: &mut R) -> Option<Cell> {
        let occupied: HashSet<Cell> = snake_body.iter().copied().collect();
        self.grid.random_free_cell(&occupied, rng)
    }

    /// Respawns the apple if `snake_head` has reached it, otherwise leaves it in place.
    pub fn place_or_keep<R: Rng + ?Sized>(
        &self,
        current_apple: Cell,
        snake_head: Cell,
        snake_body: &[Cell],
        rng: &mut R,
    ) -> Growth {
        if snake_head != current_apple {
            return Growth::None;
        }

        match self.spawn(snake_body, rng) {
            Some(apple) => {
                debug!(
                    "apple eaten at ({}, {}), respawned at ({}, {})",
                    current_apple.x, current_apple.y, apple.x, apple.y
                );
                Growth::Grew(apple)
            }
            None => Growth::Filled,
        }
    }
}
