use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Faults that stop the game. Collisions are game events, not errors.
#[derive(Debug, Error)]
pub enum SnakeError {
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
    #[error("screen resolution {width}x{height} is too small for a {cell_size}px grid")]
    ResolutionTooSmall {
        width: u32,
        height: u32,
        cell_size: u32,
    },
}

/// Reasons a skin file could not be used. Always recovered with the built-in skin.
#[derive(Debug, Error)]
pub enum SkinError {
    #[error("could not read skin file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed skin file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("skin file {} defines no skins", path.display())]
    Empty { path: PathBuf },
}
