use crate::error::{Result, WordfallError};
use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use std::collections::HashMap;

static WORDS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/words");

/// Word category selecting the spawn list. `All` is the union of every category.
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
pub enum Theme {
    #[default]
    All,
    Animals,
    Food,
    College,
    Computer,
    Sports,
    Music,
    Movies,
    Science,
    Geography,
    Transportation,
    Colors,
    Jobs,
}

impl Theme {
    /// Every concrete category, in the order their words appear in `All`
    pub const CATEGORIES: [Theme; 12] = [
        Theme::Animals,
        Theme::Food,
        Theme::College,
        Theme::Computer,
        Theme::Sports,
        Theme::Music,
        Theme::Movies,
        Theme::Science,
        Theme::Geography,
        Theme::Transportation,
        Theme::Colors,
        Theme::Jobs,
    ];

    /// Selectable themes, `All` first
    pub const ALL_THEMES: [Theme; 13] = [
        Theme::All,
        Theme::Animals,
        Theme::Food,
        Theme::College,
        Theme::Computer,
        Theme::Sports,
        Theme::Music,
        Theme::Movies,
        Theme::Science,
        Theme::Geography,
        Theme::Transportation,
        Theme::Colors,
        Theme::Jobs,
    ];

    fn position(self) -> usize {
        Self::ALL_THEMES
            .iter()
            .position(|t| *t == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Self {
        Self::ALL_THEMES[(self.position() + 1) % Self::ALL_THEMES.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ALL_THEMES.len();
        Self::ALL_THEMES[(self.position() + len - 1) % len]
    }

    /// Name of the embedded list backing this category, `None` for the derived union
    pub fn file_name(self) -> Option<String> {
        match self {
            Theme::All => None,
            other => Some(format!("{other}.json")),
        }
    }

    /// Capitalized label for menus
    pub fn label(self) -> String {
        let name = self.to_string();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => name,
        }
    }
}

#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

/// Static category to word-list mapping plus the derived `All` union
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    lists: HashMap<Theme, Vec<String>>,
    all: Vec<String>,
}

impl Catalog {
    /// Load the word lists bundled into the binary.
    ///
    /// A list that is missing or unreadable is treated as empty, which
    /// suppresses spawning for that theme instead of failing the game.
    pub fn embedded() -> Self {
        let lists = Theme::CATEGORIES.iter().map(|theme| {
            let words = match theme.file_name().map(read_word_list) {
                Some(Ok(list)) => list.words,
                Some(Err(e)) => {
                    log::warn!("word list for {theme} unavailable: {e}");
                    Vec::new()
                }
                None => Vec::new(),
            };
            (*theme, words)
        });
        Self::from_lists(lists)
    }

    /// Build a catalog from explicit category lists. Entries for `Theme::All`
    /// are ignored; the union is always derived.
    pub fn from_lists<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = (Theme, Vec<String>)>,
    {
        let mut map: HashMap<Theme, Vec<String>> = lists
            .into_iter()
            .filter(|(theme, _)| *theme != Theme::All)
            .collect();

        for theme in Theme::CATEGORIES {
            map.entry(theme).or_default();
        }

        let all = Theme::CATEGORIES
            .iter()
            .flat_map(|theme| map[theme].iter().cloned())
            .collect();

        Self { lists: map, all }
    }

    pub fn words(&self, theme: Theme) -> &[String] {
        match theme {
            Theme::All => &self.all,
            other => self.lists.get(&other).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn is_empty(&self, theme: Theme) -> bool {
        self.words(theme).is_empty()
    }
}

fn read_word_list(file_name: String) -> Result<WordList> {
    let file = WORDS_DIR
        .get_file(&file_name)
        .ok_or_else(|| WordfallError::missing_word_list(&file_name))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or(WordfallError::InvalidWordList { name: file_name })?;

    Ok(from_str(file_as_str)?)
}
