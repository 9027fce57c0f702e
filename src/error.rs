use thiserror::Error;

pub type Result<T> = std::result::Result<T, WordfallError>;

#[derive(Debug, Error)]
pub enum WordfallError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("word list not found: {name}")]
    MissingWordList { name: String },

    #[error("word list is not valid UTF-8: {name}")]
    InvalidWordList { name: String },

    #[error("logger setup failed: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl WordfallError {
    #[must_use]
    pub fn missing_word_list(name: impl Into<String>) -> Self {
        Self::MissingWordList { name: name.into() }
    }
}
