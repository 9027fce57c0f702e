use std::fmt;

/// Identity of a falling word, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordId(pub u64);

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// One falling word on screen.
///
/// `x` is a percentage of the play-area width and never changes after spawn.
/// `y` is measured in play-area units from the top and only grows while the
/// game is running.
#[derive(Debug, Clone, PartialEq)]
pub struct WordInstance {
    pub id: WordId,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
}

impl WordInstance {
    pub fn new(id: WordId, text: impl Into<String>, x: f64, speed: f64) -> Self {
        Self {
            id,
            text: text.into(),
            x,
            y: 0.0,
            speed,
        }
    }
}
