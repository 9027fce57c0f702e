//! High score side channel: one value, read once at startup and written
//! whenever it changes.

use crate::app_dirs::AppDirs;
use crate::error::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u64,
    #[serde(default)]
    pub achieved_at: Option<DateTime<Local>>,
}

impl HighScoreRecord {
    pub fn new(high_score: u64) -> Self {
        Self {
            high_score,
            achieved_at: Some(Local::now()),
        }
    }
}

pub trait HighScoreStore {
    /// Stored record, or the default when nothing usable is stored
    fn load(&self) -> HighScoreRecord;
    fn save(&self, record: &HighScoreRecord) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::high_score_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> HighScoreRecord {
        let Ok(bytes) = fs::read(&self.path) else {
            return HighScoreRecord::default();
        };
        match serde_json::from_slice::<HighScoreRecord>(&bytes) {
            Ok(record) => {
                log::info!("loaded high score {}", record.high_score);
                record
            }
            Err(e) => {
                log::warn!("ignoring unreadable high score file {:?}: {e}", self.path);
                HighScoreRecord::default()
            }
        }
    }

    fn save(&self, record: &HighScoreRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(record)?;
        fs::write(&self.path, data)?;
        log::info!("high score {} saved", record.high_score);
        Ok(())
    }
}

/// Volatile store for tests and `--no-save` runs
#[derive(Debug, Default)]
pub struct MemoryHighScoreStore {
    record: RefCell<HighScoreRecord>,
}

impl MemoryHighScoreStore {
    pub fn new(high_score: u64) -> Self {
        Self {
            record: RefCell::new(HighScoreRecord {
                high_score,
                achieved_at: None,
            }),
        }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> HighScoreRecord {
        self.record.borrow().clone()
    }

    fn save(&self, record: &HighScoreRecord) -> Result<()> {
        *self.record.borrow_mut() = record.clone();
        Ok(())
    }
}
