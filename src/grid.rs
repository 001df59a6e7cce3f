use std::collections::HashSet;

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::error::SnakeError;

/// Uniform draws attempted before falling back to sampling the free cells directly.
const RANDOM_DRAW_ATTEMPTS: usize = 32;

/// A position on the grid. Coordinates may step outside the grid transiently
/// (e.g. `x == -1`) while a collision is being detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn divisible_by(&self, cell_size: u32) -> bool {
        self.width % cell_size == 0 && self.height % cell_size == 0
    }
}

/// Which set of cell sizes the grid-size toggle cycles through.
/// Chosen once at startup and fixed for the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridFamily {
    /// Cell sizes 10, 20 and 40.
    Decimal,
    /// Cell sizes 16, 32 and 64.
    Octal,
}

impl GridFamily {
    /// Picks the decimal family when both dimensions divide evenly by its largest cell size.
    pub fn detect(resolution: Resolution) -> Self {
        if resolution.divisible_by(GridSize::Large.cell_size(GridFamily::Decimal)) {
            GridFamily::Decimal
        } else {
            GridFamily::Octal
        }
    }

    /// Distance of the snake's seed head from the bottom-right corner.
    pub fn seed_offset(&self) -> i32 {
        match self {
            GridFamily::Decimal => 6,
            GridFamily::Octal => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSize {
    Small,
    Medium,
    Large,
}

impl GridSize {
    pub fn cell_size(&self, family: GridFamily) -> u32 {
        let base = match family {
            GridFamily::Decimal => 10,
            GridFamily::Octal => 16,
        };

        match self {
            GridSize::Small => base,
            GridSize::Medium => base * 2,
            GridSize::Large => base * 4,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            GridSize::Small => GridSize::Medium,
            GridSize::Medium => GridSize::Large,
            GridSize::Large => GridSize::Small,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GridSize::Small => "Small",
            GridSize::Medium => "Medium",
            GridSize::Large => "Large",
        }
    }
}

/// The playing field, measured in cells. Immutable for the length of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: u32,
}

impl Grid {
    /// Smallest grid that holds the three-cell seed snake with a free cell for the apple.
    pub const MIN_WIDTH: i32 = 4;
    pub const MIN_HEIGHT: i32 = 1;

    pub fn from_resolution(resolution: Resolution, cell_size: u32) -> Result<Self, SnakeError> {
        let too_small = SnakeError::ResolutionTooSmall {
            width: resolution.width,
            height: resolution.height,
            cell_size,
        };

        if cell_size == 0 {
            return Err(too_small);
        }

        let width = (resolution.width / cell_size) as i32;
        let height = (resolution.height / cell_size) as i32;

        if width < Self::MIN_WIDTH || height < Self::MIN_HEIGHT {
            return Err(too_small);
        }

        Ok(Self {
            width,
            height,
            cell_size,
        })
    }

    /// A grid of exactly `width` by `height` cells, for callers that do not start from pixels.
    pub fn with_cells(width: i32, height: i32, cell_size: u32) -> Self {
        Self {
            width: width.max(Self::MIN_WIDTH),
            height: height.max(Self::MIN_HEIGHT),
            cell_size,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }

    /// Picks a cell uniformly among those not in `excluding`, or `None` when every cell is taken.
    ///
    /// A handful of blind draws covers the usual sparse board; after that the free
    /// cells are enumerated, so a nearly full grid still terminates.
    pub fn random_free_cell<R: Rng + ?Sized>(
        &self,
        excluding: &HashSet<Cell>,
        rng: &mut R,
    ) -> Option<Cell> {
        if excluding.len() < self.cell_count() {
            for _ in 0..RANDOM_DRAW_ATTEMPTS {
                let cell = Cell::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height));
                if !excluding.contains(&cell) {
                    return Some(cell);
                }
            }
        }

        self.cells()
            .filter(|cell| !excluding.contains(cell))
            .choose(rng)
    }
}
