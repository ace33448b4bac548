//! # Category Classifier
//! Maps a word to the set of lexicon categories containing it.
//!
//! `categories_of` is the pure lookup. `CategoryCache` memoizes it for one
//! analysis run: create one per run, pass it by `&mut` into finalization, drop
//! it with the run. A word is classified at most once per cache.

use crate::lexicon::Lexicon;
use std::collections::{BTreeSet, HashMap};

pub type CategorySet = BTreeSet<String>;

/// Every category containing `word`. The word is matched as given (lexicon
/// entries are lowercase, so callers fold case first if they want folding).
pub fn categories_of(lexicon: &Lexicon, word: &str) -> CategorySet {
    lexicon
        .categories()
        .iter()
        .filter(|c| c.contains(word))
        .map(|c| c.name().to_string())
        .collect()
}

/// Run-scoped word → categories memo, keyed by raw token.
#[derive(Debug, Default)]
pub struct CategoryCache {
    entries: HashMap<String, CategorySet>,
    computed: usize,
    hits: usize,
}

impl CategoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, lexicon: &Lexicon, word: &str) -> &CategorySet {
        if self.entries.contains_key(word) {
            self.hits += 1;
        } else {
            self.computed += 1;
            self.entries
                .insert(word.to_string(), categories_of(lexicon, word));
        }
        &self.entries[word]
    }

    /// Number of distinct words classified.
    pub fn computed(&self) -> usize {
        self.computed
    }

    /// Lookups answered without classifying.
    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
