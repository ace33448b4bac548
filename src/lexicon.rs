//! # Lexicon Store
//! Categorized word lists used by the scorer and the category classifier.
//!
//! The lexicon is an immutable value built once per process (from the embedded
//! `config/lexicon.toml` or a replacement file) and passed by reference to
//! everything that needs it. There is no global word table.
//!
//! TOML shape:
//! ```toml
//! common_words = ["the", "a"]
//!
//! [categories.i]
//! words = ["i", "me", "my"]
//!
//! [categories.funct]
//! sorted = true
//! words = ["the", "a", "of"]
//! ```
//!
//! A category marked `sorted` is sorted and deduplicated here, at load time,
//! and looked up with binary search. Input order is never trusted.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Lexicon shipped with the binary.
const EMBEDDED_LEXICON: &str = include_str!("../config/lexicon.toml");

const CLASS_COUNT: usize = 13;

/// Word classes the scorer depends on. Each maps to a required category key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordClass {
    FirstPersonSingular,
    SecondPerson,
    FirstPersonPlural,
    PositiveEmotion,
    NegativeEmotion,
    Article,
    Preposition,
    PersonalPronoun,
    ImpersonalPronoun,
    AuxiliaryVerb,
    Conjunction,
    Adverb,
    Negation,
}

impl WordClass {
    pub const ALL: [WordClass; CLASS_COUNT] = [
        WordClass::FirstPersonSingular,
        WordClass::SecondPerson,
        WordClass::FirstPersonPlural,
        WordClass::PositiveEmotion,
        WordClass::NegativeEmotion,
        WordClass::Article,
        WordClass::Preposition,
        WordClass::PersonalPronoun,
        WordClass::ImpersonalPronoun,
        WordClass::AuxiliaryVerb,
        WordClass::Conjunction,
        WordClass::Adverb,
        WordClass::Negation,
    ];

    /// Category key in the lexicon file.
    pub fn key(self) -> &'static str {
        match self {
            WordClass::FirstPersonSingular => "i",
            WordClass::SecondPerson => "you",
            WordClass::FirstPersonPlural => "we",
            WordClass::PositiveEmotion => "posemo",
            WordClass::NegativeEmotion => "negemo",
            WordClass::Article => "article",
            WordClass::Preposition => "preposition",
            WordClass::PersonalPronoun => "ppron",
            WordClass::ImpersonalPronoun => "ipron",
            WordClass::AuxiliaryVerb => "auxverb",
            WordClass::Conjunction => "conj",
            WordClass::Adverb => "adverb",
            WordClass::Negation => "negate",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("reading lexicon from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed lexicon: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("lexicon is missing required category `{0}`")]
    MissingCategory(&'static str),
    #[error("lexicon category `{0}` has no words")]
    EmptyCategory(String),
    #[error("lexicon entry `{word}` in `{list}` must be lowercase without whitespace")]
    InvalidWord { list: String, word: String },
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    common_words: Vec<String>,
    categories: BTreeMap<String, CategoryFile>,
}

#[derive(Debug, Deserialize)]
struct CategoryFile {
    #[serde(default)]
    sorted: bool,
    words: Vec<String>,
}

/// How membership in a category is tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Words are sorted; binary search.
    Binary,
    /// Words kept in file order; linear scan.
    Linear,
}

/// One named word list.
#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    words: Vec<String>,
    lookup: Lookup,
}

impl Category {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn lookup(&self) -> Lookup {
        self.lookup
    }

    /// Membership test for an already case-folded word.
    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        match self.lookup {
            Lookup::Binary => self
                .words
                .binary_search_by(|w| w.as_str().cmp(word))
                .is_ok(),
            Lookup::Linear => self.words.iter().any(|w| w == word),
        }
    }
}

/// Immutable set of categories plus the common-word stoplist.
#[derive(Debug, Clone)]
pub struct Lexicon {
    categories: Vec<Category>,
    /// `categories` index for each `WordClass`, in `WordClass::ALL` order.
    classes: [usize; CLASS_COUNT],
    common: HashSet<String>,
}

impl Lexicon {
    /// Parse the lexicon compiled into the binary.
    pub fn embedded() -> Result<Self, LexiconError> {
        Self::from_toml_str(EMBEDDED_LEXICON)
    }

    /// Load a lexicon file from disk.
    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let content = fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` when given, the embedded lexicon otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, LexiconError> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::embedded(),
        }
    }

    /// Parse and validate a TOML lexicon. Any defect fails the whole load.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = toml::from_str(toml_str)?;

        let mut categories = Vec::with_capacity(file.categories.len());
        for (name, cat) in file.categories {
            if cat.words.is_empty() {
                return Err(LexiconError::EmptyCategory(name));
            }
            validate_words(&name, &cat.words)?;

            let mut words = cat.words;
            let lookup = if cat.sorted {
                words.sort();
                words.dedup();
                Lookup::Binary
            } else {
                Lookup::Linear
            };
            categories.push(Category {
                name,
                words,
                lookup,
            });
        }

        let mut classes = [0usize; CLASS_COUNT];
        for class in WordClass::ALL {
            let idx = categories
                .iter()
                .position(|c| c.name == class.key())
                .ok_or(LexiconError::MissingCategory(class.key()))?;
            classes[class.index()] = idx;
        }

        validate_words("common_words", &file.common_words)?;
        let common = file.common_words.into_iter().collect();

        Ok(Self {
            categories,
            classes,
            common,
        })
    }

    /// All categories, ordered by name.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Membership of a case-folded word in one scorer class.
    #[inline]
    pub fn is(&self, class: WordClass, word: &str) -> bool {
        self.categories[self.classes[class.index()]].contains(word)
    }

    /// Stoplist test; folds case before comparing.
    pub fn is_common(&self, word: &str) -> bool {
        if self.common.contains(word) {
            return true;
        }
        self.common.contains(word.to_lowercase().as_str())
    }

    pub fn common_word_count(&self) -> usize {
        self.common.len()
    }
}

fn validate_words(list: &str, words: &[String]) -> Result<(), LexiconError> {
    for w in words {
        let bad = w.is_empty() || w.chars().any(char::is_whitespace) || *w != w.to_lowercase();
        if bad {
            return Err(LexiconError::InvalidWord {
                list: list.to_string(),
                word: w.clone(),
            });
        }
    }
    Ok(())
}
