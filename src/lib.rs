//! Classic Snake: a grid-based snake game with a menu, speed and grid-size
//! tiers, and colour skins.
//!
//! The simulation (`grid`, `snake`, `apple`, `session`, `machine`) performs no
//! I/O. Drawing, keyboard input and timing go through the traits in
//! `frontend`; `term` implements them on top of crossterm.

pub mod apple;
pub mod error;
pub mod frontend;
pub mod game;
pub mod grid;
pub mod machine;
pub mod session;
pub mod settings;
pub mod skin;
pub mod snake;
pub mod term;

pub use error::{SkinError, SnakeError};
pub use frontend::{Clock, Input, InputSource, Renderer, SleepClock};
pub use game::SnakeGame;
pub use grid::{Cell, Grid, GridFamily, GridSize, Resolution};
pub use machine::{GameStateMachine, MenuItem, MenuView, Screen};
pub use session::{EndReason, GameSession, Phase, SessionSummary};
pub use settings::{Settings, Speed};
pub use skin::{Rgb, Skin, SkinSet};
pub use snake::{Direction, Snake, StepResult};
