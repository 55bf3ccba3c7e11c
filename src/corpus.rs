use crate::error::{Error, Result};
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::str::FromStr;

static PARAGRAPH_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/paragraphs");

const DEFAULT_CORPUS_FILE: &str = "default.json";

/// Difficulty tier of paragraph selection
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    #[default]
    Normal,
    Difficult,
    /// Hardest tier: difficult paragraphs with their words scrambled
    Extreme,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Normal, Level::Difficult, Level::Extreme];

    /// Corpus tier the paragraphs for this level are drawn from
    pub fn pool(&self) -> &'static str {
        match self {
            Level::Normal => "normal",
            Level::Difficult | Level::Extreme => "difficult",
        }
    }

    pub fn scrambles(&self) -> bool {
        matches!(self, Level::Extreme)
    }

    pub fn next(&self) -> Level {
        match self {
            Level::Normal => Level::Difficult,
            Level::Difficult => Level::Extreme,
            Level::Extreme => Level::Normal,
        }
    }

    pub fn prev(&self) -> Level {
        match self {
            Level::Normal => Level::Extreme,
            Level::Difficult => Level::Normal,
            Level::Extreme => Level::Difficult,
        }
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Level::ALL
            .into_iter()
            .find(|level| level.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownLevel(s.to_string()))
    }
}

/// The (language, level) pair that drives which paragraphs are sampled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub language: String,
    pub level: Level,
}

impl Selection {
    pub fn new(language: impl Into<String>, level: Level) -> Self {
        Self {
            language: language.into(),
            level,
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new("en", Level::Normal)
    }
}

/// Candidate paragraphs keyed by corpus tier, then language tag
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Corpus {
    tiers: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl Corpus {
    /// The corpus shipped inside the binary
    pub fn embedded() -> Result<Self> {
        let file = PARAGRAPH_DIR.get_file(DEFAULT_CORPUS_FILE).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("embedded corpus {DEFAULT_CORPUS_FILE} missing"),
            )
        })?;
        let contents = file.contents_utf8().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "embedded corpus is not valid UTF-8",
            )
        })?;
        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Add paragraphs for a tier and language, creating the entry if needed
    pub fn with_paragraphs<I, S>(mut self, tier: &str, language: &str, paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tiers
            .entry(tier.to_string())
            .or_default()
            .entry(language.to_string())
            .or_default()
            .extend(paragraphs.into_iter().map(Into::into));
        self
    }

    /// Candidate paragraphs for a level, `None` when the corpus has no entry
    pub fn paragraphs(&self, level: Level, language: &str) -> Option<&[String]> {
        self.tiers
            .get(level.pool())
            .and_then(|languages| languages.get(language))
            .map(Vec::as_slice)
    }

    /// Every language tag that appears in at least one tier, sorted
    pub fn languages(&self) -> Vec<String> {
        self.tiers
            .values()
            .flat_map(|languages| languages.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_corpus_has_english_for_every_level() {
        let corpus = Corpus::embedded().unwrap();

        for level in Level::ALL {
            let paragraphs = corpus.paragraphs(level, "en").unwrap();
            assert!(!paragraphs.is_empty(), "no english paragraphs for {level}");
        }
    }

    #[test]
    fn extreme_draws_from_difficult_pool() {
        let corpus = Corpus::default()
            .with_paragraphs("difficult", "en", ["hard words here"])
            .with_paragraphs("normal", "en", ["easy"]);

        assert_eq!(
            corpus.paragraphs(Level::Extreme, "en"),
            corpus.paragraphs(Level::Difficult, "en")
        );
        assert_ne!(
            corpus.paragraphs(Level::Normal, "en"),
            corpus.paragraphs(Level::Extreme, "en")
        );
    }

    #[test]
    fn missing_entries_are_none() {
        let corpus = Corpus::default().with_paragraphs("normal", "en", ["text"]);

        assert!(corpus.paragraphs(Level::Normal, "fr").is_none());
        assert!(corpus.paragraphs(Level::Difficult, "en").is_none());
    }

    #[test]
    fn languages_are_unique_and_sorted() {
        let corpus = Corpus::default()
            .with_paragraphs("normal", "fr", ["a"])
            .with_paragraphs("normal", "en", ["b"])
            .with_paragraphs("difficult", "en", ["c"])
            .with_paragraphs("difficult", "de", ["d"]);

        assert_eq!(corpus.languages(), vec!["de", "en", "fr"]);
    }

    #[test]
    fn corpus_deserializes_nested_mapping() {
        let json = r#"{ "normal": { "en": ["one", "two"] } }"#;
        let corpus = Corpus::from_json(json).unwrap();

        assert_eq!(
            corpus.paragraphs(Level::Normal, "en").unwrap(),
            &["one".to_string(), "two".to_string()]
        );
    }

    #[test]
    fn corpus_from_missing_path_is_io_error() {
        let err = Corpus::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("normal".parse::<Level>().unwrap(), Level::Normal);
        assert_eq!("Extreme".parse::<Level>().unwrap(), Level::Extreme);
        assert!(matches!(
            "impossible".parse::<Level>(),
            Err(Error::UnknownLevel(_))
        ));
    }

    #[test]
    fn level_cycles_through_all_tiers() {
        for level in Level::ALL {
            assert_eq!(level.next().prev(), level);
        }
        assert_eq!(Level::Extreme.next(), Level::Normal);
    }

    #[test]
    fn only_extreme_scrambles() {
        assert!(!Level::Normal.scrambles());
        assert!(!Level::Difficult.scrambles());
        assert!(Level::Extreme.scrambles());
    }
}
