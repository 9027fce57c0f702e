//! Spawn scheduling: when the next word appears and what it looks like.
//!
//! The scheduler is a one-shot deadline measured in playing time. Every
//! time it fires it creates at most one word and re-arms itself with a
//! freshly computed delay, so the spawn rate accelerates as the session
//! goes on.

use crate::difficulty::DifficultyProfile;
use crate::word::{WordId, WordInstance};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

/// Playing seconds per level
pub const LEVEL_PERIOD_SECS: f64 = 15.0;
pub const MAX_LEVEL: u32 = 10;
pub const MIN_SPAWN_MS: f64 = 350.0;
pub const MIN_SPEED: f64 = 20.0;

const SPAWN_MS_PER_SEC: f64 = 8.0;
const SPAWN_MS_PER_LEVEL: f64 = 20.0;
const SPEED_PER_LEVEL: f64 = 0.08;
const SPEED_VARIANCE: f64 = 40.0;
const X_RANGE: std::ops::RangeInclusive<f64> = 5.0..=95.0;

pub fn level_for(elapsed: Duration) -> u32 {
    let level = (elapsed.as_secs_f64() / LEVEL_PERIOD_SECS).floor() as u32;
    level.min(MAX_LEVEL)
}

/// Delay until the spawn after one that fires at `elapsed` playing time
pub fn spawn_delay(profile: &DifficultyProfile, elapsed: Duration) -> Duration {
    let secs = elapsed.as_secs_f64();
    let level = level_for(elapsed) as f64;
    let ms = (profile.base_spawn_ms as f64 - secs * SPAWN_MS_PER_SEC - level * SPAWN_MS_PER_LEVEL)
        .round()
        .max(MIN_SPAWN_MS);
    Duration::from_millis(ms as u64)
}

/// Fall speed for a word spawned at `level`: tier base plus variance,
/// scaled by a level multiplier with a little jitter.
pub fn roll_speed<R: Rng + ?Sized>(profile: &DifficultyProfile, level: u32, rng: &mut R) -> f64 {
    let variance = rng.gen_range(0.0..SPEED_VARIANCE);
    let multiplier = 1.0 + SPEED_PER_LEVEL * level as f64 + rng.gen_range(-0.05..0.15);
    ((profile.base_speed + variance) * multiplier)
        .round()
        .max(MIN_SPEED)
}

pub fn roll_x<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(X_RANGE).round()
}

#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    next_due: Option<Duration>,
    next_id: u64,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the next spawn at `at` playing time
    pub fn arm(&mut self, at: Duration) {
        self.next_due = Some(at);
    }

    /// Cancel the pending spawn. Nothing fires until the scheduler is armed again.
    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    pub fn is_due(&self, elapsed: Duration) -> bool {
        self.next_due.is_some_and(|due| elapsed >= due)
    }

    /// Hand out a fresh word identity
    pub fn allocate_id(&mut self) -> WordId {
        let id = WordId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Run one scheduling event at `elapsed` playing time.
    ///
    /// Re-arms with the recomputed delay whether or not a word was created;
    /// an empty word list only skips this cycle.
    pub fn fire<R: Rng + ?Sized>(
        &mut self,
        elapsed: Duration,
        profile: &DifficultyProfile,
        words: &[String],
        rng: &mut R,
    ) -> Option<WordInstance> {
        let delay = spawn_delay(profile, elapsed);
        self.arm(elapsed + delay);

        let text = words.choose(rng)?;
        let level = level_for(elapsed);
        let x = roll_x(rng);
        let speed = roll_speed(profile, level, rng);

        let id = self.allocate_id();

        log::trace!(
            "spawn {id} {text:?} x={x} speed={speed} level={level} next in {}ms",
            delay.as_millis()
        );
        Some(WordInstance::new(id, text.clone(), x, speed))
    }
}
