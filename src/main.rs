use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};

use classic_snake::term::{TermInput, TermRenderer};
use classic_snake::{GameStateMachine, Settings, SkinSet, SleepClock, SnakeGame, Speed};

#[derive(Parser)]
#[command(name = "classic_snake")]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// Skin configuration file
    #[arg(long, default_value = "skins.json")]
    skins: PathBuf,

    /// Skin to start with
    #[arg(long, default_value = "dark")]
    skin: String,

    /// Starting snake speed
    #[arg(long, value_enum, default_value = "easy")]
    speed: Speed,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging goes to stderr, which shares the game's terminal; stay quiet unless asked.
    Builder::from_env(Env::default().default_filter_or("warn")).init();

    // Skins are read before the display takes over the terminal so a fallback warning stays visible
    let skins = SkinSet::load_or_builtin(&cli.skins);

    let renderer = TermRenderer::new().context("Failed to initialise the terminal display")?;
    let resolution = renderer.resolution();
    let settings = Settings::new(resolution, cli.speed, cli.skin);
    let mut machine = GameStateMachine::new(resolution, settings, skins)
        .context("Terminal is too small to play")?;

    let mut game = SnakeGame::new(renderer, TermInput::new(), SleepClock::new());
    game.run(&mut machine).context("Game stopped unexpectedly")?;

    Ok(())
}
