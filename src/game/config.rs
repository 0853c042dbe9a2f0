use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Surface width used when the viewport is wider than [`COMPACT_VIEWPORT`]
pub const WIDE_SURFACE_WIDTH: u32 = 1200;
/// Surface height used when the viewport is taller than [`COMPACT_VIEWPORT`]
pub const WIDE_SURFACE_HEIGHT: u32 = 735;
/// Viewport extent at or below which the surface shrinks to fit
pub const COMPACT_VIEWPORT: u32 = 600;
/// Margin kept around a shrunken surface
pub const COMPACT_MARGIN: u32 = 20;
/// Side of one grid cell on the surface
pub const DEFAULT_CELL_SIZE: u32 = 67;

/// Size of the drawing surface the grid is laid out on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self {
            width: WIDE_SURFACE_WIDTH,
            height: WIDE_SURFACE_HEIGHT,
        }
    }
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pick the surface for a viewport: the fixed wide size on large
    /// viewports, the viewport minus a margin on small ones.
    pub fn for_viewport(viewport_width: u32, viewport_height: u32) -> Self {
        let fit = |extent: u32, wide: u32| {
            if extent > COMPACT_VIEWPORT {
                wide
            } else {
                extent.saturating_sub(COMPACT_MARGIN)
            }
        };

        Self {
            width: fit(viewport_width, WIDE_SURFACE_WIDTH),
            height: fit(viewport_height, WIDE_SURFACE_HEIGHT),
        }
    }

    /// Number of cells along each axis.
    ///
    /// Cell `i` is on the surface while `i * cell_size < extent`, so partial
    /// cells at the right and bottom edges still count.
    pub fn grid_dimensions(&self, cell_size: u32) -> (usize, usize) {
        let cell_size = cell_size.max(1);
        (
            self.width.div_ceil(cell_size) as usize,
            self.height.div_ceil(cell_size) as usize,
        )
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    /// Tick interval at the start of every game, in milliseconds
    pub base_tick_ms: u64,
    /// Floor the tick interval never drops below, in milliseconds
    pub min_tick_ms: u64,
    /// Factor applied to the tick interval each time food is eaten
    pub speedup_factor: f64,

    /// Probability that freshly spawned food is special
    pub special_food_chance: f64,
    /// Points for eating normal food
    pub food_points: u32,
    /// Points for eating special food
    pub special_food_points: u32,

    /// Seed for food placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let (grid_width, grid_height) = SurfaceSize::default().grid_dimensions(DEFAULT_CELL_SIZE);
        Self {
            grid_width,
            grid_height,
            initial_snake_length: 5,
            base_tick_ms: 100,
            min_tick_ms: 50,
            speedup_factor: 0.95,
            special_food_chance: 0.2,
            food_points: 1,
            special_food_points: 3,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a configuration whose grid covers the given surface
    pub fn from_surface(surface: SurfaceSize, cell_size: u32) -> Self {
        let (width, height) = surface.grid_dimensions(cell_size);
        Self::new(width, height)
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Read a configuration from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    pub fn base_tick_interval(&self) -> Duration {
        Duration::from_millis(self.base_tick_ms)
    }

    pub fn min_tick_interval(&self) -> Duration {
        Duration::from_millis(self.min_tick_ms)
    }

    /// Check that a game can actually be played with these settings
    pub fn validate(&self) -> Result<()> {
        ensure!(self.initial_snake_length >= 1, "initial snake length must be at least 1");
        ensure!(self.grid_height >= 1, "grid height must be at least 1");
        ensure!(
            self.grid_width > self.initial_snake_length,
            "grid width {} leaves no room in front of a snake of length {}",
            self.grid_width,
            self.initial_snake_length
        );
        ensure!(self.min_tick_ms >= 1, "minimum tick must be at least 1ms");
        ensure!(
            self.min_tick_ms <= self.base_tick_ms,
            "minimum tick {}ms is above the base tick {}ms",
            self.min_tick_ms,
            self.base_tick_ms
        );
        ensure!(
            self.speedup_factor > 0.0 && self.speedup_factor <= 1.0,
            "speedup factor must be in (0, 1], got {}",
            self.speedup_factor
        );
        ensure!(
            (0.0..=1.0).contains(&self.special_food_chance),
            "special food chance must be in [0, 1], got {}",
            self.special_food_chance
        );
        Ok(())
    }
}
