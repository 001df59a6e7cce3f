use log::{debug, info, warn};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::error::SnakeError;
use crate::frontend::Input;
use crate::grid::{Grid, GridSize, Resolution};
use crate::session::{GameSession, Phase, SessionSummary};
use crate::settings::Settings;
use crate::skin::{Skin, SkinSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    StartGame,
    ToggleSpeed,
    ToggleGridSize,
    ToggleSkin,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::StartGame,
        MenuItem::ToggleSpeed,
        MenuItem::ToggleGridSize,
        MenuItem::ToggleSkin,
        MenuItem::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::StartGame => "Start Game",
            MenuItem::ToggleSpeed => "- Toggle Speed",
            MenuItem::ToggleGridSize => "- Toggle Grid size",
            MenuItem::ToggleSkin => "- Toggle Skin",
            MenuItem::Quit => "Quit Game",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|item| item == self).unwrap_or(0)
    }

    /// The item above, wrapping from the first to the last.
    pub fn previous(&self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }

    /// The item below, wrapping from the last to the first.
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu { selected: MenuItem },
    Countdown,
    Playing,
    GameOver,
    Exit,
}

/// Everything the menu screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub items: [MenuItem; 5],
    pub selected: MenuItem,
    pub speed: &'static str,
    pub grid_size: &'static str,
    pub skin: String,
    pub highscore: u32,
}

/// Screen-to-screen flow: menu, countdown, play, game over, and back.
///
/// Owns the process-wide [`Settings`] and the highscore; a [`GameSession`]
/// exists from the moment a game starts until the player leaves the game-over
/// screen.
pub struct GameStateMachine<R = ThreadRng> {
    settings: Settings,
    skins: SkinSet,
    resolution: Resolution,
    grid: Grid,
    highscore: u32,
    screen: Screen,
    session: Option<GameSession>,
    summary: Option<SessionSummary>,
    rng: R,
}

impl GameStateMachine<ThreadRng> {
    pub fn new(
        resolution: Resolution,
        settings: Settings,
        skins: SkinSet,
    ) -> Result<Self, SnakeError> {
        Self::with_rng(resolution, settings, skins, rand::thread_rng())
    }
}

impl<R: Rng> GameStateMachine<R> {
    /// Fails when the resolution cannot hold a grid at the largest cell size of its family,
    /// so later grid-size toggles always succeed.
    pub fn with_rng(
        resolution: Resolution,
        mut settings: Settings,
        skins: SkinSet,
        rng: R,
    ) -> Result<Self, SnakeError> {
        Grid::from_resolution(resolution, GridSize::Large.cell_size(settings.family))?;
        let grid = Grid::from_resolution(resolution, settings.cell_size())?;

        settings.skin = skins.resolve(&settings.skin).to_string();
        info!(
            "{}x{} px, {:?} grid family, {}x{} cells, skin {}",
            resolution.width,
            resolution.height,
            settings.family,
            grid.width(),
            grid.height(),
            settings.skin
        );

        Ok(Self {
            settings,
            skins,
            resolution,
            grid,
            highscore: 0,
            screen: Screen::Menu {
                selected: MenuItem::StartGame,
            },
            session: None,
            summary: None,
            rng,
        })
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn skins(&self) -> &SkinSet {
        &self.skins
    }

    pub fn skin(&self) -> &Skin {
        self.skins.skin(&self.settings.skin)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn highscore(&self) -> u32 {
        self.highscore
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Result of the last finished session.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn menu_view(&self) -> MenuView {
        let selected = match self.screen {
            Screen::Menu { selected } => selected,
            _ => MenuItem::StartGame,
        };

        MenuView {
            items: MenuItem::ALL,
            selected,
            speed: self.settings.speed.label(),
            grid_size: self.settings.grid_size.label(),
            skin: self.skin().label.clone(),
            highscore: self.highscore,
        }
    }

    /// Feeds a blocking-wait input to the menu or game-over screen.
    /// Global quit is honoured on every screen.
    pub fn handle_input(&mut self, input: Input) {
        if input == Input::Quit {
            self.screen = Screen::Exit;
            return;
        }

        match self.screen {
            Screen::Menu { selected } => match input {
                Input::Up => self.select(selected.previous()),
                Input::Down => self.select(selected.next()),
                Input::Confirm => self.activate(selected),
                _ => {}
            },
            Screen::GameOver => {
                if input == Input::Confirm {
                    self.session = None;
                    self.select(MenuItem::StartGame);
                }
            }
            Screen::Countdown | Screen::Playing | Screen::Exit => {}
        }
    }

    pub fn activate(&mut self, item: MenuItem) {
        match item {
            MenuItem::StartGame => self.start_game(),
            MenuItem::ToggleSpeed => self.toggle_speed(),
            MenuItem::ToggleGridSize => self.toggle_grid_size(),
            MenuItem::ToggleSkin => self.toggle_skin(),
            MenuItem::Quit => self.screen = Screen::Exit,
        }
    }

    pub fn toggle_speed(&mut self) {
        self.settings.speed = self.settings.speed.next();
        debug!("speed set to {}", self.settings.speed.label());
        self.select(MenuItem::ToggleSpeed);
    }

    pub fn toggle_grid_size(&mut self) {
        let grid_size = self.settings.grid_size.next();
        let cell_size = grid_size.cell_size(self.settings.family);

        match Grid::from_resolution(self.resolution, cell_size) {
            Ok(grid) => {
                self.settings.grid_size = grid_size;
                self.grid = grid;
                debug!(
                    "grid size set to {} ({}x{} cells)",
                    grid_size.label(),
                    grid.width(),
                    grid.height()
                );
            }
            Err(err) => warn!("{}", err),
        }
        self.select(MenuItem::ToggleGridSize);
    }

    pub fn toggle_skin(&mut self) {
        self.settings.skin = self.skins.next_after(&self.settings.skin).to_string();
        debug!("skin set to {}", self.settings.skin);
        self.select(MenuItem::ToggleSkin);
    }

    /// One step of the pre-game countdown, or `None` outside of it.
    pub fn countdown_remaining(&self) -> Option<u8> {
        match self.session.as_ref().map(GameSession::phase) {
            Some(Phase::Countdown { remaining }) if self.screen == Screen::Countdown => {
                Some(remaining)
            }
            _ => None,
        }
    }

    pub fn advance_countdown(&mut self) {
        if self.screen != Screen::Countdown {
            return;
        }

        if let Some(session) = self.session.as_mut() {
            session.advance_countdown();
            if session.phase() == Phase::Running {
                self.screen = Screen::Playing;
            }
        }
    }

    /// One gameplay tick with the inputs polled since the last one.
    pub fn tick(&mut self, inputs: &[Input]) {
        if self.screen != Screen::Playing {
            return;
        }
        if inputs.contains(&Input::Quit) {
            self.screen = Screen::Exit;
            return;
        }

        let finished = match self.session.as_mut() {
            Some(session) => {
                session.tick(inputs, &mut self.rng);
                session.summary()
            }
            None => return,
        };

        if let Some(summary) = finished {
            self.finish(summary);
        }
    }

    fn finish(&mut self, mut summary: SessionSummary) {
        if summary.score > self.highscore {
            info!("new highscore {} (was {})", summary.score, self.highscore);
            self.highscore = summary.score;
            summary.new_highscore = true;
        }
        self.summary = Some(summary);
        self.screen = Screen::GameOver;
    }

    fn start_game(&mut self) {
        self.summary = None;
        self.session = Some(GameSession::new(self.grid, &self.settings, &mut self.rng));
        self.screen = Screen::Countdown;
    }

    fn select(&mut self, item: MenuItem) {
        self.screen = Screen::Menu { selected: item };
    }
}
