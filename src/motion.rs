use crate::word::WordInstance;
use std::time::Duration;

/// Space kept free at the bottom of the play area for the word's own height
pub const BOTTOM_MARGIN: f64 = 24.0;

/// Lowest `y` a word can reach and still be live
pub fn miss_threshold(height: f64) -> f64 {
    height - BOTTOM_MARGIN
}

/// Advance every live word by `speed * dt` and pull out the ones that fell
/// past the bottom.
///
/// The sweep is computed against the words present when it starts. Missed
/// words are moved out of `words` and handed back, so each one is destroyed
/// exactly once.
pub fn advance(words: &mut Vec<WordInstance>, dt: Duration, height: f64) -> Vec<WordInstance> {
    let dt = dt.as_secs_f64();
    let threshold = miss_threshold(height);
    let mut missed = Vec::new();

    let frame = std::mem::take(words);
    words.reserve(frame.len());
    for mut word in frame {
        let y = word.y + word.speed * dt;
        if y > threshold {
            missed.push(word);
        } else {
            word.y = y;
            words.push(word);
        }
    }

    missed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::WordId;

    fn word(id: u64, text: &str, speed: f64) -> WordInstance {
        WordInstance::new(WordId(id), text, 50.0, speed)
    }

    #[test]
    fn threshold_reserves_margin() {
        assert_eq!(miss_threshold(300.0), 276.0);
    }

    #[test]
    fn words_fall_by_speed_times_dt() {
        let mut words = vec![word(1, "cat", 60.0), word(2, "dog", 100.0)];
        let missed = advance(&mut words, Duration::from_millis(500), 300.0);

        assert!(missed.is_empty());
        assert_eq!(words[0].y, 30.0);
        assert_eq!(words[1].y, 50.0);
    }

    #[test]
    fn zero_dt_moves_nothing() {
        let mut words = vec![word(1, "cat", 60.0)];
        advance(&mut words, Duration::ZERO, 300.0);
        assert_eq!(words[0].y, 0.0);
    }

    #[test]
    fn word_exactly_on_threshold_is_still_live() {
        let mut words = vec![word(1, "cat", 276.0)];
        let missed = advance(&mut words, Duration::from_secs(1), 300.0);
        assert!(missed.is_empty());
        assert_eq!(words[0].y, 276.0);
    }

    #[test]
    fn word_past_threshold_is_missed_and_removed() {
        let mut words = vec![word(1, "cat", 60.0), word(2, "whale", 10.0)];
        words[0].y = 270.0;

        let missed = advance(&mut words, Duration::from_millis(200), 300.0);

        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].id, WordId(1));
        assert_eq!(missed[0].text, "cat");
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].id, WordId(2));
    }

    #[test]
    fn missed_word_keeps_its_last_live_position() {
        let mut words = vec![word(1, "cat", 60.0)];
        words[0].y = 270.0;
        let missed = advance(&mut words, Duration::from_secs(1), 300.0);
        assert_eq!(missed[0].y, 270.0);
    }

    #[test]
    fn several_words_can_miss_in_one_frame() {
        let mut words = vec![word(1, "a", 60.0), word(2, "b", 60.0), word(3, "c", 1.0)];
        words[0].y = 275.0;
        words[1].y = 275.0;

        let missed = advance(&mut words, Duration::from_millis(100), 300.0);

        assert_eq!(missed.len(), 2);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "c");
    }

    #[test]
    fn order_of_survivors_is_preserved() {
        let mut words = vec![word(1, "a", 1.0), word(2, "b", 500.0), word(3, "c", 1.0)];
        advance(&mut words, Duration::from_secs(1), 300.0);
        let ids: Vec<u64> = words.iter().map(|w| w.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
