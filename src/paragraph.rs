use crate::corpus::{Corpus, Selection};
use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Words shorter than this keep their position when a paragraph is scrambled
pub const MIN_SCRAMBLE_LEN: usize = 3;

/// Pick a paragraph for the selection, normalized and (for the hardest tier) scrambled
pub fn select_paragraph<R: Rng + ?Sized>(
    corpus: &Corpus,
    selection: &Selection,
    rng: &mut R,
) -> Result<String> {
    // blank entries would complete a round on the first keystroke
    let candidates: Vec<&String> = corpus
        .paragraphs(selection.level, &selection.language)
        .unwrap_or_default()
        .iter()
        .filter(|p| !p.trim().is_empty())
        .collect();

    let picked = candidates
        .choose(rng)
        .ok_or_else(|| Error::UnsupportedSelection {
            level: selection.level.to_string(),
            language: selection.language.clone(),
        })?;

    let text = normalize_whitespace(picked);
    if selection.level.scrambles() {
        Ok(scramble_words(&text, rng))
    } else {
        Ok(text)
    }
}

/// Collapse every run of whitespace into a single space
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }

    out
}

/// Shuffle the words of at least [`MIN_SCRAMBLE_LEN`] chars among their own
/// slots. Shorter words and all whitespace stay exactly where they were.
pub fn scramble_words<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let segments = segments(text);

    let mut movable: Vec<&str> = segments
        .iter()
        .copied()
        .filter(|s| is_movable(s))
        .collect();
    movable.shuffle(rng);

    let mut shuffled = movable.into_iter();
    segments
        .into_iter()
        .map(|s| {
            if is_movable(s) {
                shuffled.next().unwrap_or(s)
            } else {
                s
            }
        })
        .collect()
}

fn is_movable(segment: &str) -> bool {
    !segment.starts_with(char::is_whitespace) && segment.chars().count() >= MIN_SCRAMBLE_LEN
}

// alternating runs of word and whitespace characters
fn segments(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev_ws: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let ws = c.is_whitespace();
        if prev_ws.is_some_and(|p| p != ws) {
            out.push(&text[start..i]);
            start = i;
        }
        prev_ws = Some(ws);
    }
    if start < text.len() {
        out.push(&text[start..]);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Level;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn normalize_collapses_runs() {
        assert_eq!(normalize_whitespace("a  b\t\tc\n d"), "a b c d");
        assert_eq!(normalize_whitespace("  lead and trail  "), " lead and trail ");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_whitespace("x \n\n  y\t z");
        assert_eq!(normalize_whitespace(&once), once);
    }

    #[test]
    fn segments_alternate_words_and_spaces() {
        assert_eq!(segments("ab  cd e"), vec!["ab", "  ", "cd", " ", "e"]);
        assert_eq!(segments(" x "), vec![" ", "x", " "]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn scramble_keeps_short_words_in_place() {
        let text = "a quick brown fox is at the big old gate";
        let scrambled = scramble_words(text, &mut rng());

        let before: Vec<&str> = text.split(' ').collect();
        let after: Vec<&str> = scrambled.split(' ').collect();
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            if b.chars().count() < MIN_SCRAMBLE_LEN {
                assert_eq!(b, a);
            } else {
                assert!(a.chars().count() >= MIN_SCRAMBLE_LEN);
            }
        }
    }

    #[test]
    fn scramble_is_a_permutation_of_long_words() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let scrambled = scramble_words(text, &mut rng());

        let mut before: Vec<&str> = text.split_whitespace().collect();
        let mut after: Vec<&str> = scrambled.split_whitespace().collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn scramble_keeps_whitespace_runs_in_order() {
        let text = " one  two\tthree ";
        let scrambled = scramble_words(text, &mut rng());

        assert_eq!(scrambled.len(), text.len());
        let gaps = |s: &str| -> Vec<String> {
            segments(s)
                .into_iter()
                .filter(|seg| seg.starts_with(char::is_whitespace))
                .map(str::to_owned)
                .collect()
        };
        assert_eq!(gaps(&scrambled), gaps(text));
    }

    #[test]
    fn scramble_is_deterministic_for_a_seed() {
        let text = "the seeded shuffle must repeat itself exactly";
        assert_eq!(
            scramble_words(text, &mut StdRng::seed_from_u64(42)),
            scramble_words(text, &mut StdRng::seed_from_u64(42))
        );
    }

    #[test]
    fn select_normalizes_the_picked_paragraph() {
        let corpus = Corpus::default().with_paragraphs("normal", "en", ["one   two\nthree"]);
        let text = select_paragraph(&corpus, &Selection::new("en", Level::Normal), &mut rng())
            .unwrap();

        assert_eq!(text, "one two three");
    }

    #[test]
    fn select_extreme_scrambles_difficult_paragraph() {
        let source = "first second third fourth fifth sixth seventh eighth";
        let corpus = Corpus::default().with_paragraphs("difficult", "en", [source]);
        let text =
            select_paragraph(&corpus, &Selection::new("en", Level::Extreme), &mut rng()).unwrap();

        let mut a: Vec<&str> = source.split(' ').collect();
        let mut b: Vec<&str> = text.split(' ').collect();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn select_picks_from_every_candidate() {
        let corpus = Corpus::default().with_paragraphs("normal", "en", ["a", "b", "c"]);
        let selection = Selection::new("en", Level::Normal);
        let mut rng = rng();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(select_paragraph(&corpus, &selection, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn select_unknown_language_is_unsupported() {
        let corpus = Corpus::default().with_paragraphs("normal", "en", ["text"]);
        let err = select_paragraph(&corpus, &Selection::new("xx", Level::Normal), &mut rng())
            .unwrap_err();

        assert_matches!(err, Error::UnsupportedSelection { language, level } => {
            assert_eq!(language, "xx");
            assert_eq!(level, "normal");
        });
    }

    #[test]
    fn select_empty_pool_is_unsupported() {
        let corpus =
            Corpus::default().with_paragraphs("normal", "en", Vec::<String>::new());
        let err = select_paragraph(&corpus, &Selection::new("en", Level::Normal), &mut rng())
            .unwrap_err();

        assert_matches!(err, Error::UnsupportedSelection { .. });
    }

    #[test]
    fn select_skips_blank_paragraphs() {
        let corpus = Corpus::default().with_paragraphs("normal", "en", ["", "  \n ", "real text"]);
        let selection = Selection::new("en", Level::Normal);
        let mut rng = rng();

        for _ in 0..20 {
            assert_eq!(
                select_paragraph(&corpus, &selection, &mut rng).unwrap(),
                "real text"
            );
        }
    }

    #[test]
    fn select_only_blank_paragraphs_is_unsupported() {
        let corpus = Corpus::default().with_paragraphs("normal", "en", ["", "   "]);
        let err = select_paragraph(&corpus, &Selection::new("en", Level::Normal), &mut rng())
            .unwrap_err();

        assert_matches!(err, Error::UnsupportedSelection { .. });
    }
}
