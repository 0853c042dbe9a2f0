use anyhow::{Context, Result};
use clap::Parser;
use classic_snake::game::{GameConfig, SurfaceSize};
use classic_snake::modes::PlayMode;
use classic_snake::persistence::JsonFileStore;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "classic_snake")]
#[command(version, about = "Grid Snake with special food, speed ramp and a saved high score")]
struct Cli {
    /// Drawing surface width the grid is laid out on
    #[arg(long, default_value = "1200")]
    surface_width: u32,

    /// Drawing surface height the grid is laid out on
    #[arg(long, default_value = "735")]
    surface_height: u32,

    /// Viewport width; with --viewport-height, derives the surface from the viewport
    #[arg(long, requires = "viewport_height")]
    viewport_width: Option<u32>,

    /// Viewport height; with --viewport-width, derives the surface from the viewport
    #[arg(long, requires = "viewport_width")]
    viewport_height: Option<u32>,

    /// Side of one grid cell on the surface
    #[arg(long, default_value = "67")]
    cell_size: u32,

    /// JSON game configuration; overrides the surface options
    #[arg(long)]
    config: Option<PathBuf>,

    /// File the high score is kept in
    #[arg(long, default_value = "snake_high_score.json")]
    save_file: PathBuf,

    /// File log output is appended to
    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => {
                let surface = match (self.viewport_width, self.viewport_height) {
                    (Some(width), Some(height)) => SurfaceSize::for_viewport(width, height),
                    _ => SurfaceSize::new(self.surface_width, self.surface_height),
                };
                GameConfig::from_surface(surface, self.cell_size)
            }
        };

        Ok(config.with_seed(self.seed))
    }
}

/// Log to a file; the terminal belongs to the game
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "classic_snake=info".into()),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = cli.game_config()?;
    tracing::info!(?config, "Configuration loaded");

    let store = JsonFileStore::open(&cli.save_file)?;
    tracing::info!(path = ?store.path(), "High score store opened");
    let mut play_mode = PlayMode::new(config, store)?;
    play_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("classic_snake").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_default_surface() {
        let config = parse(&[]).game_config().unwrap();

        assert_eq!((config.grid_width, config.grid_height), (18, 11));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_viewport_overrides_surface() {
        let cli = parse(&[
            "--surface-width",
            "2000",
            "--viewport-width",
            "400",
            "--viewport-height",
            "1080",
        ]);

        let config = cli.game_config().unwrap();

        assert_eq!((config.grid_width, config.grid_height), (6, 11));
    }

    #[test]
    fn test_viewport_needs_both_sides() {
        let result = Cli::try_parse_from(["classic_snake", "--viewport-width", "400"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_seed_overrides_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("game.json");
        std::fs::write(&path, r#"{"grid_width": 14, "grid_height": 9, "seed": 4}"#).unwrap();
        let path_arg = path.to_str().unwrap();

        let from_file = parse(&["--config", path_arg]).game_config().unwrap();
        assert_eq!((from_file.grid_width, from_file.grid_height), (14, 9));
        assert_eq!(from_file.seed, Some(4));

        let overridden = parse(&["--config", path_arg, "--seed", "9", "--cell-size", "10"])
            .game_config()
            .unwrap();
        assert_eq!((overridden.grid_width, overridden.grid_height), (14, 9));
        assert_eq!(overridden.seed, Some(9));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");

        let result = parse(&["--config", path.to_str().unwrap()]).game_config();

        assert!(result.is_err());
    }
}
