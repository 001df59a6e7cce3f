//! Seams between the game core and the outside world.
//!
//! The core never draws, reads keys or sleeps by itself; the dispatch loop in
//! [`crate::game`] does all of that through these traits.

use std::thread::sleep;
use std::time::{Duration, Instant};

use crate::error::SnakeError;
use crate::grid::{Cell, Grid};
use crate::machine::MenuView;
use crate::session::SessionSummary;
use crate::skin::Skin;

/// A discrete input event, already decoded from whatever device produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    /// Leaves the current game and goes back to the menu.
    Cancel,
    /// Leaves the program from any screen.
    Quit,
}

pub trait Renderer {
    fn draw_grid(&mut self, grid: &Grid, skin: &Skin);
    fn draw_snake(&mut self, grid: &Grid, body: &[Cell], skin: &Skin);
    fn draw_apple(&mut self, grid: &Grid, apple: Cell, skin: &Skin);
    fn draw_score(&mut self, score: u32, skin: &Skin);

    fn draw_menu(&mut self, menu: &MenuView, skin: &Skin);
    /// Overlays one step of the pre-game countdown (3, 2, 1) on the current frame.
    fn draw_countdown(&mut self, remaining: u8, skin: &Skin);
    fn draw_game_over(&mut self, summary: &SessionSummary, skin: &Skin);

    /// Makes everything drawn since the last call visible.
    fn present(&mut self) -> Result<(), SnakeError>;
    /// Releases the display before the process exits.
    fn shutdown(&mut self) -> Result<(), SnakeError>;
}

pub trait InputSource {
    /// Every event queued since the last call. Never blocks.
    fn poll(&mut self) -> Result<Vec<Input>, SnakeError>;
    /// Blocks until the next event.
    fn wait(&mut self) -> Result<Input, SnakeError>;
}

pub trait Clock {
    /// Blocks until the next tick is due at `ticks_per_second`.
    fn tick(&mut self, ticks_per_second: u32);
    fn pause(&mut self, duration: Duration);
}

/// Paces ticks with `thread::sleep`, measuring from the end of the previous tick.
#[derive(Debug, Default)]
pub struct SleepClock {
    last_tick: Option<Instant>,
}

impl SleepClock {
    pub fn new() -> Self {
        SleepClock { last_tick: None }
    }
}

impl Clock for SleepClock {
    fn tick(&mut self, ticks_per_second: u32) {
        let period = Duration::from_secs(1) / ticks_per_second.max(1);

        if let Some(last) = self.last_tick {
            let elapsed = last.elapsed();
            if elapsed < period {
                sleep(period - elapsed);
            }
        }

        self.last_tick = Some(Instant::now());
    }

    fn pause(&mut self, duration: Duration) {
        sleep(duration);
        self.last_tick = None;
    }
}
