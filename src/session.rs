use log::{debug, info};
use rand::Rng;

use crate::apple::{ApplePlacer, Growth};
use crate::frontend::Input;
use crate::grid::{Cell, Grid};
use crate::settings::{self, Settings, Speed};
use crate::snake::{Direction, Snake, StepResult};

pub const COUNTDOWN_STEPS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Quit,
    HitWall,
    HitSelf,
    /// The snake covers the whole grid.
    GridFilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Countdown { remaining: u8 },
    Running,
    Over(EndReason),
}

/// What a finished session leaves behind for the game-over screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: u32,
    pub apples: u32,
    pub reason: EndReason,
    pub new_highscore: bool,
}

/// One play-through, from countdown to collision.
pub struct GameSession {
    grid: Grid,
    speed: Speed,
    snake: Snake,
    apple: Cell,
    placer: ApplePlacer,
    phase: Phase,
    ticks: u64,
}

impl GameSession {
    /// Seeds the snake near the bottom-right corner, heading up, and drops the first apple.
    pub fn new<R: Rng + ?Sized>(grid: Grid, settings: &Settings, rng: &mut R) -> Self {
        let offset = settings.family.seed_offset();
        let head_x = (grid.width() - offset).clamp(2, grid.width() - 1);
        let head_y = (grid.height() - offset).clamp(grid.height() / 2, grid.height() - 1);
        let seed = [
            Cell::new(head_x, head_y),
            Cell::new(head_x - 1, head_y),
            Cell::new(head_x - 2, head_y),
        ];

        let placer = ApplePlacer::new(grid);
        // Grid::MIN_WIDTH leaves at least one cell beside the seed
        let apple = placer.spawn(&seed, rng).unwrap_or(seed[0]);

        Self::with_layout(grid, settings.speed, seed, apple)
    }

    /// A session with a fixed seed and apple.
    pub fn with_layout(
        grid: Grid,
        speed: Speed,
        seed: [Cell; Snake::SEED_LENGTH],
        apple: Cell,
    ) -> Self {
        info!(
            "session start: {}x{} grid, {} ticks/s",
            grid.width(),
            grid.height(),
            speed.ticks_per_second()
        );

        Self {
            grid,
            speed,
            snake: Snake::spawn(seed),
            apple,
            placer: ApplePlacer::new(grid),
            phase: Phase::Countdown {
                remaining: COUNTDOWN_STEPS,
            },
            ticks: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn apple(&self) -> Cell {
        self.apple
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn score(&self) -> u32 {
        settings::score(self.snake.len(), self.speed)
    }

    pub fn apples_eaten(&self) -> u32 {
        (self.snake.len() - Snake::SEED_LENGTH) as u32
    }

    /// Counts the countdown down by one step; at zero the session starts running.
    pub fn advance_countdown(&mut self) {
        if let Phase::Countdown { remaining } = self.phase {
            self.phase = if remaining <= 1 {
                Phase::Running
            } else {
                Phase::Countdown {
                    remaining: remaining - 1,
                }
            };
        }
    }

    /// Runs one simulation step with the inputs gathered since the previous tick.
    /// Does nothing unless the session is running.
    pub fn tick<R: Rng + ?Sized>(&mut self, inputs: &[Input], rng: &mut R) -> Phase {
        if self.phase != Phase::Running {
            return self.phase;
        }

        for input in inputs {
            match input {
                Input::Up => self.snake.set_direction(Direction::Up),
                Input::Down => self.snake.set_direction(Direction::Down),
                Input::Left => self.snake.set_direction(Direction::Left),
                Input::Right => self.snake.set_direction(Direction::Right),
                Input::Cancel | Input::Quit => return self.end(EndReason::Quit),
                Input::Confirm => {}
            }
        }

        self.ticks += 1;

        match self.snake.step(&self.grid) {
            StepResult::HitWall => return self.end(EndReason::HitWall),
            StepResult::HitSelf => return self.end(EndReason::HitSelf),
            StepResult::Continue => {}
        }

        let growth = self
            .placer
            .place_or_keep(self.apple, self.snake.head(), self.snake.body(), rng);
        self.snake.finish_step(growth.grew());

        match growth {
            Growth::None => {}
            Growth::Grew(apple) => {
                self.apple = apple;
                debug!("score {}", self.score());
            }
            Growth::Filled => return self.end(EndReason::GridFilled),
        }

        self.phase
    }

    /// The summary of a finished session; `new_highscore` is left for the caller to decide.
    pub fn summary(&self) -> Option<SessionSummary> {
        match self.phase {
            Phase::Over(reason) => Some(SessionSummary {
                score: self.score(),
                apples: self.apples_eaten(),
                reason,
                new_highscore: false,
            }),
            _ => None,
        }
    }

    fn end(&mut self, reason: EndReason) -> Phase {
        self.phase = Phase::Over(reason);
        info!(
            "session over after {} ticks: {:?}, score {}",
            self.ticks,
            reason,
            self.score()
        );
        self.phase
    }
}
