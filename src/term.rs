use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Colors, Print, ResetColor, SetColors};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use crate::error::SnakeError;
use crate::frontend::{Input, InputSource, Renderer};
use crate::grid::{Cell, Grid, Resolution};
use crate::machine::MenuView;
use crate::session::{EndReason, SessionSummary};
use crate::skin::{Rgb, Skin};

/// Terminal glyphs are roughly twice as tall as they are wide. An 80x24 terminal
/// measures 1280x768 and holds a 20x12 grid at the largest cell size.
pub const PIXELS_PER_COLUMN: u32 = 16;
pub const PIXELS_PER_ROW: u32 = 32;

type TermInt = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Glyph {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

impl Glyph {
    fn blank(bg: Rgb) -> Self {
        Glyph { ch: ' ', fg: bg, bg }
    }
}

/// Draws into an off-screen frame and writes only the glyphs that changed on `present`.
pub struct TermRenderer {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    frame: Vec<Glyph>,
    shown: Vec<Option<Glyph>>,
    active: bool,
}

impl TermRenderer {
    /// Switches the terminal to the alternate screen in raw mode.
    pub fn new() -> Result<Self, SnakeError> {
        let (width, height) = terminal::size()?;
        let size = width as usize * height as usize;
        let mut renderer = TermRenderer {
            width,
            height,
            stdout: stdout(),
            frame: vec![Glyph::blank(Rgb(0, 0, 0)); size],
            shown: vec![None; size],
            active: false,
        };

        renderer.setup()?;
        Ok(renderer)
    }

    /// The terminal measured in virtual pixels.
    pub fn resolution(&self) -> Resolution {
        resolution_for(self.width, self.height)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn setup(&mut self) -> Result<(), SnakeError> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        Ok(())
    }

    fn restore(&mut self) -> Result<(), SnakeError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode()?;
        execute!(
            self.stdout,
            ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )?;
        Ok(())
    }

    fn put(&mut self, col: TermInt, row: TermInt, glyph: Glyph) {
        if col < self.width && row < self.height {
            self.frame[self.width as usize * row as usize + col as usize] = glyph;
        }
    }

    fn fill(&mut self, bg: Rgb) {
        self.frame.iter_mut().for_each(|glyph| *glyph = Glyph::blank(bg));
    }

    fn print_at(&mut self, col: TermInt, row: TermInt, text: &str, fg: Rgb, bg: Rgb) {
        for (i, ch) in text.chars().enumerate() {
            self.put(col.saturating_add(i as TermInt), row, Glyph { ch, fg, bg });
        }
    }

    /// Terminal columns and rows covered by `cell`, as half-open ranges.
    /// Cells smaller than a glyph share it with their neighbours.
    fn cell_rect(grid: &Grid, cell: Cell) -> (TermInt, TermInt, TermInt, TermInt) {
        let size = grid.cell_size();
        let (x, y) = (cell.x.max(0) as u32, cell.y.max(0) as u32);
        let col = |px: u32| (px / PIXELS_PER_COLUMN).min(TermInt::MAX as u32 - 1) as TermInt;
        let row = |px: u32| (px / PIXELS_PER_ROW).min(TermInt::MAX as u32 - 1) as TermInt;

        let (c0, r0) = (col(x * size), row(y * size));
        (
            c0,
            r0,
            col((x + 1) * size).max(c0 + 1),
            row((y + 1) * size).max(r0 + 1),
        )
    }

    /// A centered box of text over whatever is on the frame.
    fn show_message(&mut self, lines: &[&str], top: Option<TermInt>, fg: Rgb, bg: Rgb) {
        let msg_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as TermInt + 4;
        let msg_height = lines.len() as TermInt + 2;
        let left = (self.width / 2).saturating_sub(msg_width / 2);
        let top = top.unwrap_or_else(|| (self.height / 2).saturating_sub(msg_height / 2));

        for y in 0..msg_height {
            for x in 0..msg_width {
                self.put(left + x, top + y, Glyph::blank(bg));
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{line: ^width$}", line = line, width = msg_width as usize);
            self.print_at(left, top + i as TermInt + 1, &padded, fg, bg);
        }
    }
}

impl Renderer for TermRenderer {
    fn draw_grid(&mut self, grid: &Grid, skin: &Skin) {
        self.fill(skin.background);

        for cell in grid.cells() {
            let (col, row, _, _) = Self::cell_rect(grid, cell);
            self.put(
                col,
                row,
                Glyph {
                    ch: '·',
                    fg: skin.grid_line,
                    bg: skin.background,
                },
            );
        }
    }

    fn draw_snake(&mut self, grid: &Grid, body: &[Cell], skin: &Skin) {
        for cell in body {
            let (c0, r0, c1, r1) = Self::cell_rect(grid, *cell);
            let framed = c1 - c0 >= 3 && r1 - r0 >= 3;

            for row in r0..r1 {
                for col in c0..c1 {
                    let edge = framed && (col == c0 || col == c1 - 1 || row == r0 || row == r1 - 1);
                    let bg = if edge { skin.snake_edge } else { skin.snake };
                    self.put(col, row, Glyph::blank(bg));
                }
            }
        }
    }

    fn draw_apple(&mut self, grid: &Grid, apple: Cell, skin: &Skin) {
        let (c0, r0, c1, r1) = Self::cell_rect(grid, apple);
        for row in r0..r1 {
            for col in c0..c1 {
                self.put(col, row, Glyph::blank(skin.apple));
            }
        }
    }

    fn draw_score(&mut self, score: u32, skin: &Skin) {
        let text = format!(" Score: {} ", score);
        self.print_at(2, 0, &text, skin.foreground, skin.background);
    }

    fn draw_menu(&mut self, menu: &MenuView, skin: &Skin) {
        self.fill(skin.background);

        let left = self.width / 10;
        let details_top = self.height / 5;
        let details = [
            format!("Snake speed: {}", menu.speed),
            format!("Grid size: {}", menu.grid_size),
            format!("Skin: {}", menu.skin),
            format!("Highscore:  {}", menu.highscore),
        ];
        for (i, line) in details.iter().enumerate() {
            self.print_at(left, details_top + i as TermInt, line, skin.foreground, skin.background);
        }

        let items_top = self.height / 2;
        for (i, item) in menu.items.iter().enumerate() {
            let fg = if *item == menu.selected {
                skin.active_foreground
            } else {
                skin.foreground
            };
            self.print_at(left, items_top + 2 * i as TermInt, item.label(), fg, skin.background);
        }
    }

    fn draw_countdown(&mut self, remaining: u8, skin: &Skin) {
        let top = match remaining {
            3 => self.height / 8,
            2 => self.height / 3,
            _ => self.height * 5 / 9,
        };
        let digit = remaining.to_string();
        self.show_message(&[digit.as_str()], Some(top), skin.foreground, skin.background);
    }

    fn draw_game_over(&mut self, summary: &SessionSummary, skin: &Skin) {
        let title = match summary.reason {
            EndReason::GridFilled => "You won!",
            _ => "Game Over",
        };
        let score = format!("Total score: {}", summary.score);
        let apples = format!("Total apples: {}", summary.apples);

        let mut lines = vec![title, ""];
        if summary.new_highscore {
            lines.push("New highscore!");
        }
        lines.extend_from_slice(&[score.as_str(), apples.as_str(), "", "Press ENTER to return"]);

        self.show_message(&lines, None, skin.foreground, skin.background);
    }

    fn present(&mut self) -> Result<(), SnakeError> {
        let mut colors: Option<(Rgb, Rgb)> = None;

        for (i, glyph) in self.frame.iter().enumerate() {
            if self.shown[i] == Some(*glyph) {
                continue;
            }

            let col = (i % self.width as usize) as TermInt;
            let row = (i / self.width as usize) as TermInt;
            queue!(self.stdout, cursor::MoveTo(col, row))?;

            if colors != Some((glyph.fg, glyph.bg)) {
                queue!(
                    self.stdout,
                    SetColors(Colors::new(color(glyph.fg), color(glyph.bg)))
                )?;
                colors = Some((glyph.fg, glyph.bg));
            }
            queue!(self.stdout, Print(glyph.ch))?;
            self.shown[i] = Some(*glyph);
        }

        self.stdout.flush()?;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), SnakeError> {
        self.restore()
    }
}

impl Drop for TermRenderer {
    fn drop(&mut self) {
        // best effort; an error here has nowhere to go
        let _ = self.restore();
    }
}

/// A terminal of `columns` x `rows` glyphs measured in virtual pixels.
pub fn resolution_for(columns: TermInt, rows: TermInt) -> Resolution {
    Resolution::new(columns as u32 * PIXELS_PER_COLUMN, rows as u32 * PIXELS_PER_ROW)
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Keyboard input through crossterm's event queue.
#[derive(Debug, Default)]
pub struct TermInput;

impl TermInput {
    pub fn new() -> Self {
        TermInput
    }

    pub fn map_key(key: KeyEvent) -> Option<Input> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if is_ctrl_c(&key) {
            return Some(Input::Quit);
        }

        match key.code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Input::Up),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Input::Left),
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Input::Down),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Input::Right),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Input::Confirm),
            KeyCode::Esc => Some(Input::Cancel),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Input::Quit),
            _ => None,
        }
    }
}

impl InputSource for TermInput {
    fn poll(&mut self) -> Result<Vec<Input>, SnakeError> {
        let mut inputs = vec![];

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                inputs.extend(Self::map_key(key));
            }
        }

        Ok(inputs)
    }

    fn wait(&mut self) -> Result<Input, SnakeError> {
        loop {
            if let Event::Key(key) = event::read()? {
                if let Some(input) = Self::map_key(key) {
                    return Ok(input);
                }
            }
        }
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GameSession;
    use crate::settings::{Settings, Speed};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_and_wasd_keys() {
        assert_eq!(TermInput::map_key(press(KeyCode::Up)), Some(Input::Up));
        assert_eq!(TermInput::map_key(press(KeyCode::Left)), Some(Input::Left));
        assert_eq!(TermInput::map_key(press(KeyCode::Char('s'))), Some(Input::Down));
        assert_eq!(
            TermInput::map_key(KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT)),
            Some(Input::Right)
        );
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(TermInput::map_key(press(KeyCode::Enter)), Some(Input::Confirm));
        assert_eq!(TermInput::map_key(press(KeyCode::Esc)), Some(Input::Cancel));
        assert_eq!(TermInput::map_key(press(KeyCode::Char('q'))), Some(Input::Quit));
        assert_eq!(
            TermInput::map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Input::Quit)
        );
        assert_eq!(TermInput::map_key(press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut key = press(KeyCode::Up);
        key.kind = KeyEventKind::Release;
        assert_eq!(TermInput::map_key(key), None);
    }

    #[test]
    fn test_cell_rect_scales_to_glyphs() {
        let grid = Grid::with_cells(20, 12, 64);
        assert_eq!(TermRenderer::cell_rect(&grid, Cell::new(0, 0)), (0, 0, 4, 2));
        assert_eq!(TermRenderer::cell_rect(&grid, Cell::new(3, 5)), (12, 10, 16, 12));

        // cells smaller than a glyph still cover one
        let grid = Grid::with_cells(128, 80, 10);
        for y in 0..8 {
            for x in 0..8 {
                let (c0, r0, c1, r1) = TermRenderer::cell_rect(&grid, Cell::new(x, y));
                assert!(c1 > c0 && r1 > r0);
            }
        }
    }

    #[test]
    fn test_standard_terminal_grid_is_playable() {
        let resolution = resolution_for(80, 24);
        assert_eq!(resolution, Resolution::new(1280, 768));

        let settings = Settings::new(resolution, Speed::Easy, "dark");
        let grid = Grid::from_resolution(resolution, settings.cell_size()).unwrap();
        assert_eq!((grid.width(), grid.height()), (20, 12));

        let mut rng = StdRng::seed_from_u64(0);
        let session = GameSession::new(grid, &settings, &mut rng);
        let head = session.snake().head();
        assert_eq!(head, Cell::new(16, 8));

        // every cell of the default board spans whole glyphs
        for cell in grid.cells() {
            let (c0, r0, c1, r1) = TermRenderer::cell_rect(&grid, cell);
            assert_eq!((c1 - c0, r1 - r0), (4, 2));
        }
    }
}
