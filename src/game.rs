use std::time::Duration;

use rand::Rng;

use crate::error::SnakeError;
use crate::frontend::{Clock, Input, InputSource, Renderer};
use crate::machine::{GameStateMachine, Screen};

const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

/// Drives a [`GameStateMachine`] through a renderer, an input source and a clock,
/// one screen at a time, until the player quits.
pub struct SnakeGame<Rd, In, Ck> {
    renderer: Rd,
    input: In,
    clock: Ck,
    // keys pressed during the countdown, handed to the first tick
    queued: Vec<Input>,
}

impl<Rd: Renderer, In: InputSource, Ck: Clock> SnakeGame<Rd, In, Ck> {
    pub fn new(renderer: Rd, input: In, clock: Ck) -> Self {
        SnakeGame {
            renderer,
            input,
            clock,
            queued: Vec::new(),
        }
    }

    pub fn renderer(&self) -> &Rd {
        &self.renderer
    }

    pub fn clock(&self) -> &Ck {
        &self.clock
    }

    /// Runs until the machine reaches [`Screen::Exit`] or a front-end call fails.
    /// The display is shut down in both cases.
    pub fn run<R: Rng>(&mut self, machine: &mut GameStateMachine<R>) -> Result<(), SnakeError> {
        let result = self.dispatch(machine);
        let shutdown = self.renderer.shutdown();
        result.and(shutdown)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn dispatch<R: Rng>(&mut self, machine: &mut GameStateMachine<R>) -> Result<(), SnakeError> {
        loop {
            match machine.screen() {
                Screen::Menu { .. } => self.show_menu(machine)?,
                Screen::Countdown => self.show_countdown(machine)?,
                Screen::Playing => self.play_tick(machine)?,
                Screen::GameOver => self.show_game_over(machine)?,
                Screen::Exit => return Ok(()),
            }
        }
    }

    fn show_menu<R: Rng>(&mut self, machine: &mut GameStateMachine<R>) -> Result<(), SnakeError> {
        self.renderer.draw_menu(&machine.menu_view(), machine.skin());
        self.renderer.present()?;

        let input = self.input.wait()?;
        machine.handle_input(input);
        Ok(())
    }

    fn show_countdown<R: Rng>(
        &mut self,
        machine: &mut GameStateMachine<R>,
    ) -> Result<(), SnakeError> {
        while let Some(remaining) = machine.countdown_remaining() {
            self.draw_board(machine);
            self.renderer.draw_countdown(remaining, machine.skin());
            self.renderer.present()?;
            self.clock.pause(COUNTDOWN_STEP);

            let inputs = self.input.poll()?;
            if inputs.contains(&Input::Quit) {
                machine.handle_input(Input::Quit);
                return Ok(());
            }
            self.queued.extend(inputs);
            machine.advance_countdown();
        }
        Ok(())
    }

    fn play_tick<R: Rng>(&mut self, machine: &mut GameStateMachine<R>) -> Result<(), SnakeError> {
        self.clock.tick(machine.settings().speed.ticks_per_second());

        let mut inputs = std::mem::take(&mut self.queued);
        inputs.extend(self.input.poll()?);
        machine.tick(&inputs);

        if machine.screen() == Screen::Playing {
            self.draw_board(machine);
            self.renderer.present()?;
        }
        Ok(())
    }

    fn show_game_over<R: Rng>(
        &mut self,
        machine: &mut GameStateMachine<R>,
    ) -> Result<(), SnakeError> {
        self.draw_board(machine);
        if let Some(summary) = machine.summary() {
            self.renderer.draw_game_over(summary, machine.skin());
        }
        self.renderer.present()?;

        let input = self.input.wait()?;
        machine.handle_input(input);
        Ok(())
    }

    fn draw_board<R: Rng>(&mut self, machine: &GameStateMachine<R>) {
        let skin = machine.skin();
        let session = match machine.session() {
            Some(session) => session,
            None => return,
        };
        let grid = session.grid();

        self.renderer.draw_grid(grid, skin);
        self.renderer.draw_snake(grid, session.snake().body(), skin);
        self.renderer.draw_apple(grid, session.apple(), skin);
        self.renderer.draw_score(session.score(), skin);
    }
}
