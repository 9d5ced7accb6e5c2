//! Blockdrop — classic falling-block puzzle game in the terminal.

mod app;
mod board;
mod game;
mod input;
mod piece;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use thiserror::Error;

/// Smallest board that still fits every piece matrix.
const MIN_BOARD_SIDE: u16 = 4;
/// Largest board side accepted; keeps the terminal layout within `u16` coordinates.
const MAX_BOARD_SIDE: u16 = 200;
/// Accepted frame rate range in frames per second.
const FRAME_RATE_RANGE: std::ops::RangeInclusive<f64> = 0.1..=1000.0;

/// Options derived from CLI that affect game behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub drop_interval_ms: u64,
    /// Fixed seed for the piece sequence; OS entropy when unset.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: board::DEFAULT_WIDTH,
            height: board::DEFAULT_HEIGHT,
            drop_interval_ms: game::DEFAULT_DROP_INTERVAL_MS,
            seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("board must be at least {min}x{min} cells, got {width}x{height}")]
    BoardTooSmall { width: u16, height: u16, min: u16 },
    #[error("board must be at most {max}x{max} cells, got {width}x{height}")]
    BoardTooLarge { width: u16, height: u16, max: u16 },
    #[error("frame rate must be between 0.1 and 1000, got {0}")]
    InvalidFrameRate(f64),
}

impl GameConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        if args.width < MIN_BOARD_SIDE || args.height < MIN_BOARD_SIDE {
            return Err(ConfigError::BoardTooSmall {
                width: args.width,
                height: args.height,
                min: MIN_BOARD_SIDE,
            });
        }
        if args.width > MAX_BOARD_SIDE || args.height > MAX_BOARD_SIDE {
            return Err(ConfigError::BoardTooLarge {
                width: args.width,
                height: args.height,
                max: MAX_BOARD_SIDE,
            });
        }
        if !FRAME_RATE_RANGE.contains(&args.frame_rate) {
            return Err(ConfigError::InvalidFrameRate(args.frame_rate));
        }
        Ok(Self {
            width: args.width,
            height: args.height,
            drop_interval_ms: args.drop_interval_ms,
            seed: args.seed,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = GameConfig::from_args(&args)?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let mut app = App::new(&args, &config, theme);
    app.run()?;
    Ok(())
}

/// Classic falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blockdrop",
    version,
    about = "Classic falling-block puzzle in the terminal. Fill rows to clear them; the board wipes when a new piece can't spawn.",
    long_about = "Blockdrop is a small falling-block puzzle game.\n\n\
        Steer the falling piece, fill complete rows to clear them. Clearing several rows \
        at once doubles the reward for each extra row (10, 20, 40, ...). When a new piece \
        spawns into settled blocks the board is wiped and play continues.\n\n\
        CONTROLS:\n  Left/Right  Move    Down   Soft drop\n  Up or Q     Rotate CW   W  Rotate CCW\n  Esc / Ctrl-C  Quit"
)]
pub struct Args {
    /// Board width in cells.
    #[arg(long, default_value_t = board::DEFAULT_WIDTH, value_name = "COLS")]
    pub width: u16,

    /// Board height in cells.
    #[arg(long, default_value_t = board::DEFAULT_HEIGHT, value_name = "ROWS")]
    pub height: u16,

    /// Automatic drop interval in milliseconds.
    #[arg(long, default_value_t = game::DEFAULT_DROP_INTERVAL_MS, value_name = "MS")]
    pub drop_interval_ms: u64,

    /// Target render frames per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Seed for the piece sequence (reproducible games).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"); keys piece1..piece7, main_bg, div_line, main_fg, title.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the row-clear and wipe flash.
    #[arg(long)]
    pub no_animation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
