//! # Ranker
//! Frequency rankings of a bucket's words (or emojis) and top-N selection
//! with the common-word stoplist.

use crate::lexicon::Lexicon;
use crate::stats::{StatBucket, StatsError};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

impl WordCount {
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

/// Words by count descending; equal counts by word ascending.
pub fn rank(bucket: &StatBucket) -> Vec<WordCount> {
    rank_counts(bucket.word_counts())
}

/// Same ordering over the emoji map.
pub fn rank_emojis(bucket: &StatBucket) -> Vec<WordCount> {
    rank_counts(bucket.emoji_counts())
}

pub fn rank_counts(counts: &HashMap<String, u64>) -> Vec<WordCount> {
    let mut out: Vec<WordCount> = counts
        .iter()
        .map(|(w, &c)| WordCount::new(w.clone(), c))
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    out
}

/// Up to `n` entries of `ranked`, skipping stoplist words unless
/// `include_common`. Returns fewer than `n` when the ranking runs out.
pub fn top_n(
    ranked: &[WordCount],
    n: usize,
    include_common: bool,
    lexicon: &Lexicon,
) -> Vec<WordCount> {
    ranked
        .iter()
        .filter(|wc| include_common || !lexicon.is_common(&wc.word))
        .take(n)
        .cloned()
        .collect()
}

/// Like `top_n`, but fewer than `n` eligible entries is an error.
pub fn try_top_n(
    ranked: &[WordCount],
    n: usize,
    include_common: bool,
    lexicon: &Lexicon,
) -> Result<Vec<WordCount>, StatsError> {
    let top = top_n(ranked, n, include_common, lexicon);
    if top.len() < n {
        return Err(StatsError::InsufficientData {
            requested: n,
            available: top.len(),
        });
    }
    Ok(top)
}
