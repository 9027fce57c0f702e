// Library surface: the simulation core plus the ambient pieces the binary
// and the integration tests share. Rendering lives in the binary.
pub mod app_dirs;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod game;
pub mod high_score;
pub mod logging;
pub mod matcher;
pub mod motion;
pub mod runtime;
pub mod spawn;
pub mod word;

pub use catalog::{Catalog, Theme};
pub use difficulty::Difficulty;
pub use game::{FrameReport, Game, GameOver, GameState};
pub use word::{WordId, WordInstance};

/// Play-area units per terminal row
pub const UNITS_PER_ROW: f64 = 16.0;
