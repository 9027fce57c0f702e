use crate::word::WordInstance;

/// Points for typing `text`: ten per character, never less than ten
pub fn points_for(text: &str) -> u64 {
    (text.chars().count() as u64 * 10).max(10)
}

/// A word destroyed by typing it
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub word: WordInstance,
    pub points: u64,
}

/// Find a live word whose text equals the trimmed input and remove it.
///
/// Only exact, case-sensitive matches count. When several live words share
/// the text the first one found is removed, and only that one.
pub fn resolve(words: &mut Vec<WordInstance>, input: &str) -> Option<Match> {
    let typed = input.trim();
    if typed.is_empty() {
        return None;
    }

    let idx = words.iter().position(|w| w.text == typed)?;
    let word = words.remove(idx);
    let points = points_for(&word.text);
    Some(Match { word, points })
}
