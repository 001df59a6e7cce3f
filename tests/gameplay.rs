use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use classic_snake::{
    Cell, Clock, EndReason, GameStateMachine, Grid, Input, InputSource, MenuItem, MenuView,
    Renderer, Resolution, Screen, SessionSummary, Settings, Skin, SkinSet, SnakeError, SnakeGame,
    Speed,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Hands out pre-recorded inputs; runs out into `Quit` so a broken loop still ends.
#[derive(Default)]
struct ScriptedInput {
    waits: VecDeque<Input>,
    polls: VecDeque<Vec<Input>>,
}

impl ScriptedInput {
    fn new(waits: &[Input], polls: &[&[Input]]) -> Self {
        ScriptedInput {
            waits: waits.iter().copied().collect(),
            polls: polls.iter().map(|p| p.to_vec()).collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Result<Vec<Input>, SnakeError> {
        Ok(self.polls.pop_front().unwrap_or_default())
    }

    fn wait(&mut self) -> Result<Input, SnakeError> {
        Ok(self.waits.pop_front().unwrap_or(Input::Quit))
    }
}

#[derive(Default)]
struct RecordingRenderer {
    menus: Vec<MenuView>,
    countdowns: Vec<u8>,
    game_overs: Vec<SessionSummary>,
    scores: Vec<u32>,
    snakes: Vec<Vec<Cell>>,
    skins: Vec<String>,
    presents: usize,
    shut_down: bool,
}

impl Renderer for RecordingRenderer {
    fn draw_grid(&mut self, _grid: &Grid, _skin: &Skin) {}

    fn draw_snake(&mut self, _grid: &Grid, body: &[Cell], _skin: &Skin) {
        self.snakes.push(body.to_vec());
    }

    fn draw_apple(&mut self, _grid: &Grid, _apple: Cell, _skin: &Skin) {}

    fn draw_score(&mut self, score: u32, _skin: &Skin) {
        self.scores.push(score);
    }

    fn draw_menu(&mut self, menu: &MenuView, skin: &Skin) {
        self.menus.push(menu.clone());
        self.skins.push(skin.label.clone());
    }

    fn draw_countdown(&mut self, remaining: u8, _skin: &Skin) {
        self.countdowns.push(remaining);
    }

    fn draw_game_over(&mut self, summary: &SessionSummary, _skin: &Skin) {
        self.game_overs.push(*summary);
    }

    fn present(&mut self) -> Result<(), SnakeError> {
        self.presents += 1;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), SnakeError> {
        self.shut_down = true;
        Ok(())
    }
}

#[derive(Default)]
struct FakeClock {
    ticks: Vec<u32>,
    pauses: Vec<Duration>,
}

impl Clock for FakeClock {
    fn tick(&mut self, ticks_per_second: u32) {
        self.ticks.push(ticks_per_second);
    }

    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

const SKINS: &str = r#"{
    "dark":  {"label": "Dark", "bg": [40, 44, 52], "fg": [225, 228, 234], "fg_active": [198, 120, 214],
              "apple": [224, 106, 92], "snake": [198, 120, 214], "snake_edges": [168, 0, 205], "grid": [59, 64, 72]},
    "light": {"label": "Light", "bg": [250, 250, 250], "fg": [40, 40, 40], "fg_active": [200, 0, 120],
              "apple": [220, 50, 50], "snake": [60, 160, 60], "snake_edges": [20, 90, 20], "grid": [225, 225, 225]}
}"#;

fn machine() -> GameStateMachine<StdRng> {
    // 800x600 px with 40 px cells: a 20x15 grid, seed head at (14, 9) heading up
    let resolution = Resolution::new(800, 600);
    let settings = Settings::new(resolution, Speed::Easy, "dark");
    let skins = SkinSet::from_json(Path::new("skins.json"), SKINS).unwrap();
    GameStateMachine::with_rng(resolution, settings, skins, StdRng::seed_from_u64(11)).unwrap()
}

type TestGame = SnakeGame<RecordingRenderer, ScriptedInput, FakeClock>;

fn game(waits: &[Input], polls: &[&[Input]]) -> TestGame {
    SnakeGame::new(
        RecordingRenderer::default(),
        ScriptedInput::new(waits, polls),
        FakeClock::default(),
    )
}

#[test]
fn test_full_round_back_to_menu_then_quit() {
    let mut machine = machine();
    let mut game = game(&[Input::Confirm, Input::Confirm, Input::Quit], &[]);

    game.run(&mut machine).unwrap();

    let renderer = game.renderer();
    assert_eq!(renderer.countdowns, vec![3, 2, 1]);
    assert_eq!(game.clock().pauses, vec![Duration::from_secs(1); 3]);

    // nine free rows above the head, the tenth step hits the wall
    assert_eq!(game.clock().ticks, vec![15; 10]);
    assert_eq!(renderer.game_overs.len(), 1);
    assert_eq!(renderer.game_overs[0].reason, EndReason::HitWall);

    assert_eq!(renderer.menus.len(), 2);
    assert_eq!(renderer.menus[1].selected, MenuItem::StartGame);
    assert_eq!(renderer.menus[1].highscore, machine.highscore());
    assert!(renderer.shut_down);
    assert_eq!(machine.screen(), Screen::Exit);
}

#[test]
fn test_snake_moves_one_cell_per_tick() {
    let mut machine = machine();
    let mut game = game(&[Input::Confirm, Input::Quit], &[]);

    game.run(&mut machine).unwrap();

    let heads: Vec<Cell> = game.renderer().snakes.iter().map(|body| body[0]).collect();
    for pair in heads.windows(2) {
        let dy = pair[0].y - pair[1].y;
        assert!(dy == 0 || dy == 1, "head jumped from {:?} to {:?}", pair[0], pair[1]);
        assert_eq!(pair[0].x, pair[1].x);
    }
    assert_eq!(heads.last(), Some(&Cell::new(14, 0)));
}

#[test]
fn test_menu_toggles_preselect_and_persist() {
    let mut machine = machine();
    let waits = [
        Input::Down,
        Input::Confirm,
        Input::Down,
        Input::Confirm,
        Input::Down,
        Input::Confirm,
        Input::Quit,
    ];
    let mut game = game(&waits, &[]);

    game.run(&mut machine).unwrap();

    let selected: Vec<MenuItem> = game.renderer().menus.iter().map(|m| m.selected).collect();
    assert_eq!(
        selected,
        vec![
            MenuItem::StartGame,
            MenuItem::ToggleSpeed,
            MenuItem::ToggleSpeed,
            MenuItem::ToggleGridSize,
            MenuItem::ToggleGridSize,
            MenuItem::ToggleSkin,
            MenuItem::ToggleSkin,
        ]
    );

    let last = game.renderer().menus.last().unwrap();
    assert_eq!(last.speed, "Medium");
    assert_eq!(last.grid_size, "Small");
    assert_eq!(last.skin, "Light");
    assert_eq!(game.renderer().skins.last().map(String::as_str), Some("Light"));
    assert_eq!(machine.grid().cell_size(), 10);
}

#[test]
fn test_menu_quit_item() {
    let mut machine = machine();
    let mut game = game(&[Input::Up, Input::Confirm], &[]);

    game.run(&mut machine).unwrap();

    assert_eq!(game.renderer().menus.len(), 2);
    assert!(game.renderer().countdowns.is_empty());
    assert_eq!(machine.screen(), Screen::Exit);
}

#[test]
fn test_cancel_ends_session_only() {
    let mut machine = machine();
    let mut game = game(
        &[Input::Confirm, Input::Confirm, Input::Quit],
        &[&[], &[], &[], &[Input::Cancel]],
    );

    game.run(&mut machine).unwrap();

    let renderer = game.renderer();
    assert_eq!(renderer.game_overs.len(), 1);
    assert_eq!(renderer.game_overs[0].reason, EndReason::Quit);
    assert_eq!(renderer.game_overs[0].score, 0);
    assert_eq!(game.clock().ticks.len(), 1);
    assert_eq!(renderer.menus.len(), 2);
}

#[test]
fn test_countdown_keys_reach_first_tick() {
    let mut machine = machine();
    // Esc pressed while "2" is on screen
    let mut game = game(&[Input::Confirm, Input::Quit], &[&[], &[Input::Cancel]]);

    game.run(&mut machine).unwrap();

    let renderer = game.renderer();
    assert_eq!(renderer.countdowns, vec![3, 2, 1]);
    assert_eq!(game.clock().ticks.len(), 1);
    assert_eq!(renderer.game_overs[0].reason, EndReason::Quit);
}

#[test]
fn test_quit_during_countdown_exits() {
    let mut machine = machine();
    let mut game = game(&[Input::Confirm], &[&[Input::Quit]]);

    game.run(&mut machine).unwrap();

    let renderer = game.renderer();
    assert_eq!(renderer.countdowns, vec![3]);
    assert!(game.clock().ticks.is_empty());
    assert!(renderer.game_overs.is_empty());
    assert!(renderer.shut_down);
    assert_eq!(machine.screen(), Screen::Exit);
}

#[test]
fn test_quit_during_play_exits_immediately() {
    let mut machine = machine();
    let mut game = game(
        &[Input::Confirm],
        &[&[], &[], &[], &[Input::Right], &[Input::Quit]],
    );

    game.run(&mut machine).unwrap();

    let renderer = game.renderer();
    assert!(renderer.game_overs.is_empty());
    assert_eq!(game.clock().ticks.len(), 2);
    assert!(renderer.shut_down);
    assert_eq!(machine.screen(), Screen::Exit);
}

#[test]
fn test_turning_steers_the_snake() {
    let mut machine = machine();
    let mut game = game(&[Input::Confirm, Input::Quit], &[&[], &[], &[], &[Input::Right]]);

    game.run(&mut machine).unwrap();

    // heading right from (14, 9), the wall is five steps away
    let first = &game.renderer().snakes;
    let head_after_turn = first
        .iter()
        .map(|body| body[0])
        .find(|head| head.x != 14)
        .unwrap();
    assert_eq!(head_after_turn, Cell::new(15, 9));
    assert_eq!(game.renderer().game_overs[0].reason, EndReason::HitWall);
}

#[test]
fn test_builtin_skin_toggle_is_noop() {
    let resolution = Resolution::new(800, 600);
    let settings = Settings::new(resolution, Speed::Hard, "dark");
    let mut machine = GameStateMachine::with_rng(
        resolution,
        settings,
        SkinSet::builtin(),
        StdRng::seed_from_u64(0),
    )
    .unwrap();
    let mut game = game(
        &[Input::Down, Input::Down, Input::Down, Input::Confirm, Input::Quit],
        &[],
    );

    game.run(&mut machine).unwrap();

    let labels = &game.renderer().skins;
    assert!(labels.iter().all(|l| l == "Default (Missing skins file)"));
    assert_eq!(game.renderer().menus.last().unwrap().selected, MenuItem::ToggleSkin);
}
