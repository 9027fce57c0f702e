//! Session state machine.
//!
//! `Game` owns everything a play-through touches: the live words, score,
//! lives, the correct/missed history and the high score. The three
//! callbacks that drive it (`on_frame`, `on_spawn_timer`, `on_input`) each
//! take `&mut self`, so every read-modify-write of the live words finishes
//! before another callback can see them.

use crate::catalog::{Catalog, Theme};
use crate::clock::PlayClock;
use crate::difficulty::Difficulty;
use crate::matcher;
use crate::motion;
use crate::spawn::{self, SpawnScheduler};
use crate::word::{WordId, WordInstance};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

pub const STARTING_LIVES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum GameState {
    Idle,
    Playing,
    Paused,
    Ended,
}

impl GameState {
    /// Playing or paused: a session is in progress
    pub fn is_running(self) -> bool {
        matches!(self, GameState::Playing | GameState::Paused)
    }
}

/// End-of-game report, produced once when lives run out
#[derive(Debug, Clone, PartialEq)]
pub struct GameOver {
    pub score: u64,
    pub high_score: u64,
    pub new_high_score: bool,
    pub correct: Vec<String>,
    pub missed: Vec<String>,
}

/// What happened during one motion frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub missed: Vec<String>,
    pub game_over: Option<GameOver>,
}

impl FrameReport {
    pub fn lives_lost(&self) -> u32 {
        self.missed.len() as u32
    }
}

#[derive(Debug)]
pub struct Game {
    catalog: Catalog,
    rng: StdRng,
    state: GameState,
    difficulty: Difficulty,
    theme: Theme,
    score: u64,
    lives: u32,
    high_score: u64,
    live_words: Vec<WordInstance>,
    correct_log: Vec<String>,
    missed_log: Vec<String>,
    input: String,
    clock: PlayClock,
    // playing time of the last motion frame
    frame_mark: Duration,
    scheduler: SpawnScheduler,
}

impl Game {
    pub fn new(catalog: Catalog, difficulty: Difficulty, theme: Theme, high_score: u64) -> Self {
        Self::with_rng(
            catalog,
            difficulty,
            theme,
            high_score,
            StdRng::from_entropy(),
        )
    }

    /// Same as `new` but with a reproducible word stream
    pub fn with_seed(
        catalog: Catalog,
        difficulty: Difficulty,
        theme: Theme,
        high_score: u64,
        seed: u64,
    ) -> Self {
        Self::with_rng(
            catalog,
            difficulty,
            theme,
            high_score,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        catalog: Catalog,
        difficulty: Difficulty,
        theme: Theme,
        high_score: u64,
        rng: StdRng,
    ) -> Self {
        Self {
            catalog,
            rng,
            state: GameState::Idle,
            difficulty,
            theme,
            score: 0,
            lives: STARTING_LIVES,
            high_score,
            live_words: Vec::new(),
            correct_log: Vec::new(),
            missed_log: Vec::new(),
            input: String::new(),
            clock: PlayClock::default(),
            frame_mark: Duration::ZERO,
            scheduler: SpawnScheduler::new(),
        }
    }

    /// Begin a fresh session. A session already in progress is stopped
    /// first, so this is always a hard reset and never adds a second cohort
    /// of words.
    pub fn start(&mut self, now: Instant) {
        if self.state.is_running() {
            self.stop(now);
        }

        self.live_words.clear();
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.correct_log.clear();
        self.missed_log.clear();
        self.input.clear();

        self.clock = PlayClock::started(now);
        self.frame_mark = Duration::ZERO;
        // first word drops right away
        self.scheduler.arm(Duration::ZERO);
        self.state = GameState::Playing;

        log::info!(
            "game started: difficulty={} theme={}",
            self.difficulty,
            self.theme
        );
    }

    /// Abort the session without a game over. Returns false when nothing was running.
    pub fn stop(&mut self, now: Instant) -> bool {
        if !self.state.is_running() {
            return false;
        }

        self.scheduler.disarm();
        self.clock.halt(now);
        self.live_words.clear();
        self.input.clear();
        self.state = GameState::Idle;

        log::info!("game stopped at score {}", self.score);
        true
    }

    pub fn pause(&mut self, now: Instant) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        self.clock.pause(now);
        self.state = GameState::Paused;
        log::debug!("paused after {:?} of play", self.clock.elapsed(now));
        true
    }

    pub fn resume(&mut self, now: Instant) -> bool {
        if self.state != GameState::Paused {
            return false;
        }
        self.clock.resume(now);
        // the next frame measures from here, not from the last frame before the pause
        self.frame_mark = self.clock.elapsed(now);
        self.state = GameState::Playing;
        log::debug!("resumed");
        true
    }

    pub fn toggle_start_stop(&mut self, now: Instant) {
        if self.state.is_running() {
            self.stop(now);
        } else {
            self.start(now);
        }
    }

    pub fn toggle_pause(&mut self, now: Instant) -> bool {
        match self.state {
            GameState::Playing => self.pause(now),
            GameState::Paused => self.resume(now),
            GameState::Idle | GameState::Ended => false,
        }
    }

    /// Dismiss the game-over summary
    pub fn acknowledge(&mut self) -> bool {
        if self.state != GameState::Ended {
            return false;
        }
        self.state = GameState::Idle;
        true
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.state.is_running() {
            return false;
        }
        self.difficulty = difficulty;
        true
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        if self.state.is_running() {
            return false;
        }
        self.theme = theme;
        true
    }

    /// Motion callback: move every live word by the playing time since the
    /// previous frame and charge a life for each one that fell out.
    ///
    /// `height` is the play-area height in play-area units.
    pub fn on_frame(&mut self, now: Instant, height: f64) -> FrameReport {
        if self.state != GameState::Playing {
            return FrameReport::default();
        }

        let elapsed = self.clock.elapsed(now);
        let dt = elapsed.saturating_sub(self.frame_mark);
        self.frame_mark = elapsed;

        let missed: Vec<String> = motion::advance(&mut self.live_words, dt, height)
            .into_iter()
            .map(|word| word.text)
            .collect();

        let mut report = FrameReport::default();
        if !missed.is_empty() {
            self.lives = self.lives.saturating_sub(missed.len() as u32);
            self.missed_log.extend(missed.iter().cloned());
            log::debug!("missed {:?}, {} lives left", missed, self.lives);
            report.missed = missed;

            if self.lives == 0 {
                report.game_over = Some(self.finish(now));
            }
        }
        report
    }

    /// Spawn callback: create the next word if the deadline has passed.
    ///
    /// Returns the id of the new word. A due event on an empty theme list
    /// still re-arms the timer but creates nothing.
    pub fn on_spawn_timer(&mut self, now: Instant) -> Option<WordId> {
        if self.state != GameState::Playing {
            return None;
        }

        let elapsed = self.clock.elapsed(now);
        if !self.scheduler.is_due(elapsed) {
            return None;
        }

        let profile = self.difficulty.profile();
        let words = self.catalog.words(self.theme);
        let word = self
            .scheduler
            .fire(elapsed, &profile, words, &mut self.rng)?;
        let id = word.id;
        self.live_words.push(word);
        Some(id)
    }

    /// Input callback with the full current text of the input field.
    ///
    /// Returns the points awarded when the text destroyed a word; the field
    /// is cleared in that case. Ignored unless playing.
    pub fn on_input(&mut self, text: &str) -> Option<u64> {
        if self.state != GameState::Playing {
            return None;
        }

        self.input = text.to_string();
        let found = matcher::resolve(&mut self.live_words, text)?;

        self.score += found.points;
        log::debug!("matched {} (+{})", found.word.text, found.points);
        self.correct_log.push(found.word.text);
        self.input.clear();
        Some(found.points)
    }

    /// Drop a word into the running session directly, bypassing the scheduler
    pub fn place_word(&mut self, text: &str, x: f64, speed: f64) -> Option<WordId> {
        if !self.state.is_running() {
            return None;
        }
        let id = self.scheduler.allocate_id();
        self.live_words.push(WordInstance::new(id, text, x, speed));
        Some(id)
    }

    /// Wall-clock instant of the next spawn event, only while playing
    pub fn spawn_deadline(&self) -> Option<Instant> {
        if self.state != GameState::Playing {
            return None;
        }
        self.clock.instant_at(self.scheduler.next_due()?)
    }

    fn finish(&mut self, now: Instant) -> GameOver {
        self.scheduler.disarm();
        self.clock.halt(now);
        self.live_words.clear();
        self.input.clear();
        self.state = GameState::Ended;

        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }

        log::info!(
            "game over: score={} correct={} missed={}{}",
            self.score,
            self.correct_log.len(),
            self.missed_log.len(),
            if new_high_score { " (new high score)" } else { "" }
        );

        GameOver {
            score: self.score,
            high_score: self.high_score,
            new_high_score,
            correct: self.correct_log.clone(),
            missed: self.missed_log.clone(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn live_words(&self) -> &[WordInstance] {
        &self.live_words
    }

    pub fn correct_log(&self) -> &[String] {
        &self.correct_log
    }

    pub fn missed_log(&self) -> &[String] {
        &self.missed_log
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Playing time of the current (or last) session
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.clock.elapsed(now)
    }

    pub fn level(&self, now: Instant) -> u32 {
        spawn::level_for(self.elapsed(now))
    }
}
