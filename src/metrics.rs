use crate::timer::TICK_INTERVAL;
use std::fmt;
use std::time::Duration;

/// Speed and accuracy figures for a completed round
#[derive(Clone, Debug, PartialEq)]
pub struct SessionResult {
    pub word_count: usize,
    pub correct_chars: usize,
    pub words_per_minute: u64,
    pub correct_chars_per_second: u64,
    pub correct_words: usize,
    pub wrong_words: usize,
    /// Percentage, rounded to two decimals
    pub accuracy: f64,
}

impl SessionResult {
    /// Compute the results of a round.
    ///
    /// Words are compared by index, so an inserted or dropped word shifts
    /// every later comparison. Elapsed time below one timer tick counts as one
    /// tick; with no keystrokes at all accuracy is 100.
    pub fn compute(
        typed: &str,
        reference: &str,
        elapsed: Duration,
        incorrect_keystrokes: u64,
    ) -> Self {
        let minutes = elapsed.max(TICK_INTERVAL).as_secs_f64() / 60.0;

        let word_count = typed.split_whitespace().count();
        let correct_chars = typed
            .chars()
            .zip(reference.chars())
            .filter(|(t, r)| t == r)
            .count();
        let correct_words = typed
            .split_whitespace()
            .zip(reference.split_whitespace())
            .filter(|(t, r)| t == r)
            .count();

        let words_per_minute = (word_count as f64 / minutes).round() as u64;
        let correct_chars_per_second = ((correct_chars as f64 / minutes) / 60.0).round() as u64;

        let attempts = correct_chars as f64 + incorrect_keystrokes as f64;
        let accuracy = if attempts == 0.0 {
            100.0
        } else {
            round2(correct_chars as f64 / attempts * 100.0)
        };

        Self {
            word_count,
            correct_chars,
            words_per_minute,
            correct_chars_per_second,
            correct_words,
            wrong_words: word_count.saturating_sub(correct_words),
            accuracy,
        }
    }

    /// The five labelled metrics of the results panel
    pub fn labelled(&self) -> [(&'static str, String); 5] {
        [
            ("Words Per Minute", self.words_per_minute.to_string()),
            ("Correct Char/Sec", self.correct_chars_per_second.to_string()),
            ("Correct", self.correct_words.to_string()),
            ("Wrong", self.wrong_words.to_string()),
            ("Accuracy", format!("{:.2}%", self.accuracy)),
        ]
    }
}

impl fmt::Display for SessionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} wpm   {} cc/s   {} correct   {} wrong   {:.2}% acc",
            self.words_per_minute,
            self.correct_chars_per_second,
            self.correct_words,
            self.wrong_words,
            self.accuracy
        )
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
