use itertools::{EitherOrBoth, Itertools};

/// Classification of one reference character against the typed input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CharState {
    #[default]
    Unset,
    Correct,
    Incorrect,
}

/// Result of comparing the whole typed input against the reference text
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Comparison {
    /// One entry per reference character
    pub states: Vec<CharState>,
    /// Incorrect positions observed in this pass
    pub mismatches: u64,
}

impl Comparison {
    /// All positions unset, as after a reset
    pub fn unset(reference: &str) -> Self {
        Self {
            states: vec![CharState::Unset; reference.chars().count()],
            mismatches: 0,
        }
    }
}

/// Recompute every character state from scratch. Typed characters past the
/// end of the reference are not compared.
pub fn compare(reference: &str, typed: &str) -> Comparison {
    let mut mismatches = 0;
    let states = reference
        .chars()
        .zip_longest(typed.chars())
        .filter_map(|pair| match pair {
            EitherOrBoth::Left(_) => Some(CharState::Unset),
            EitherOrBoth::Both(expected, actual) if expected == actual => {
                Some(CharState::Correct)
            }
            EitherOrBoth::Both(_, _) => {
                mismatches += 1;
                Some(CharState::Incorrect)
            }
            EitherOrBoth::Right(_) => None,
        })
        .collect();

    Comparison { states, mismatches }
}
