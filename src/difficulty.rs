use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Spawn cadence and fall speed of a difficulty tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub base_spawn_ms: u64,
    /// play-area units per second before level scaling and variance
    pub base_speed: f64,
}

impl DifficultyProfile {
    pub fn base_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.base_spawn_ms)
    }
}

#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                base_spawn_ms: 2000,
                base_speed: 60.0,
            },
            Difficulty::Medium => DifficultyProfile {
                base_spawn_ms: 1400,
                base_speed: 110.0,
            },
            Difficulty::Hard => DifficultyProfile {
                base_spawn_ms: 900,
                base_speed: 170.0,
            },
        }
    }

    /// Next tier, wrapping from hard back to easy
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}
