use clap::ValueEnum;

use crate::grid::{GridFamily, GridSize, Resolution};
use crate::snake::Snake;

/// Difficulty tier. Only the tick rate changes between tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Speed {
    VeryEasy,
    Easy,
    Medium,
    Hard,
}

impl Speed {
    pub fn ticks_per_second(&self) -> u32 {
        match self {
            Speed::VeryEasy => 10,
            Speed::Easy => 15,
            Speed::Medium => 30,
            Speed::Hard => 60,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Speed::VeryEasy => Speed::Easy,
            Speed::Easy => Speed::Medium,
            Speed::Medium => Speed::Hard,
            Speed::Hard => Speed::VeryEasy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Speed::VeryEasy => "Very Easy",
            Speed::Easy => "Easy",
            Speed::Medium => "Medium",
            Speed::Hard => "Hard",
        }
    }
}

/// Score for a snake of `length` at `speed`: apples eaten times the tick rate.
pub fn score(length: usize, speed: Speed) -> u32 {
    length.saturating_sub(Snake::SEED_LENGTH) as u32 * speed.ticks_per_second()
}

/// Process-wide game settings. Changed only from the menu, never during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub speed: Speed,
    pub grid_size: GridSize,
    pub family: GridFamily,
    pub skin: String,
}

impl Settings {
    pub fn new(resolution: Resolution, speed: Speed, skin: impl Into<String>) -> Self {
        Self {
            speed,
            grid_size: GridSize::Large,
            family: GridFamily::detect(resolution),
            skin: skin.into(),
        }
    }

    pub fn cell_size(&self) -> u32 {
        self.grid_size.cell_size(self.family)
    }
}
