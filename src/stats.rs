//! # Statistic buckets
//! One grouping's accumulator (overall, one user, one channel, one day, one month).
//!
//! A bucket only holds sums while messages are being folded in. `finalize`
//! divides once, stores the result as `Averages`, and freezes the bucket:
//! further folds and a second finalize are rejected. Averages of an
//! un-finalized bucket are simply not available (`averages()` is `None`).

use crate::classifier::CategoryCache;
use crate::lexicon::Lexicon;
use crate::message::Message;
use crate::scorer::Scores;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("bucket has no words or no messages; nothing to average")]
    EmptyBucket,
    #[error("bucket was already finalized")]
    AlreadyFinalized,
    #[error("bucket is finalized and no longer accepts messages")]
    Frozen,
    #[error("insufficient data: requested {requested} words, only {available} available")]
    InsufficientData { requested: usize, available: usize },
}

/// Raw sums, valid at any point of the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub messages: u64,
    pub words: u64,
    pub emojis: u64,
    /// Sum of message text lengths, in chars. Differs from the byte length of
    /// the exported text whenever it holds non-ASCII characters.
    pub text_length: u64,
    /// Sum of word token lengths, in chars.
    pub word_length: u64,
    pub clout: i64,
    pub tone: i64,
    pub analytic: i64,
}

/// Derived values, computed once by `finalize`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Averages {
    pub word_length: f64,
    pub words_per_message: f64,
    pub emojis_per_message: f64,
    pub clout_per_message: f64,
    pub tone_per_message: f64,
    pub analytic_per_message: f64,
}

/// Tokenizer + scorer output for one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzedMessage {
    pub words: Vec<String>,
    pub emojis: Vec<String>,
    pub scores: Scores,
}

#[derive(Debug, Clone, Default)]
pub struct StatBucket {
    totals: Totals,
    word_counts: HashMap<String, u64>,
    emoji_counts: HashMap<String, u64>,
    category_counts: BTreeMap<String, u64>,
    averages: Option<Averages>,
}

impl StatBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one message. Messages with empty text are ignored.
    pub fn fold(&mut self, message: &Message, analyzed: &AnalyzedMessage) -> Result<(), StatsError> {
        if self.averages.is_some() {
            return Err(StatsError::Frozen);
        }
        if !message.has_text() {
            return Ok(());
        }

        let t = &mut self.totals;
        t.messages += 1;
        t.text_length += message.text.chars().count() as u64;
        t.clout += analyzed.scores.clout;
        t.tone += analyzed.scores.tone;
        t.analytic += analyzed.scores.analytic;

        for w in analyzed.words.iter().filter(|w| !w.is_empty()) {
            t.words += 1;
            t.word_length += w.chars().count() as u64;
            *self.word_counts.entry(w.clone()).or_insert(0) += 1;
        }
        for e in analyzed.emojis.iter().filter(|e| !e.is_empty()) {
            t.emojis += 1;
            *self.emoji_counts.entry(e.clone()).or_insert(0) += 1;
        }
        Ok(())
    }

    /// Divide sums into averages and fill per-occurrence category counts.
    ///
    /// Empty buckets (no words or no messages) are left untouched and report
    /// `EmptyBucket`; callers skip them rather than emit NaN.
    pub fn finalize(
        &mut self,
        lexicon: &Lexicon,
        cache: &mut CategoryCache,
    ) -> Result<&Averages, StatsError> {
        if self.averages.is_some() {
            return Err(StatsError::AlreadyFinalized);
        }
        let t = self.totals;
        if t.words == 0 || t.messages == 0 {
            return Err(StatsError::EmptyBucket);
        }

        for (word, &count) in &self.word_counts {
            for cat in cache.get_or_compute(lexicon, word) {
                *self.category_counts.entry(cat.clone()).or_insert(0) += count;
            }
        }

        let words = t.words as f64;
        let messages = t.messages as f64;
        Ok(&*self.averages.insert(Averages {
            word_length: t.word_length as f64 / words,
            words_per_message: words / messages,
            emojis_per_message: t.emojis as f64 / messages,
            clout_per_message: t.clout as f64 / messages,
            tone_per_message: t.tone as f64 / messages,
            analytic_per_message: t.analytic as f64 / messages,
        }))
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn averages(&self) -> Option<&Averages> {
        self.averages.as_ref()
    }

    pub fn is_finalized(&self) -> bool {
        self.averages.is_some()
    }

    /// No words or no messages.
    pub fn is_empty(&self) -> bool {
        self.totals.words == 0 || self.totals.messages == 0
    }

    pub fn word_counts(&self) -> &HashMap<String, u64> {
        &self.word_counts
    }

    pub fn emoji_counts(&self) -> &HashMap<String, u64> {
        &self.emoji_counts
    }

    /// Empty until finalized.
    pub fn category_counts(&self) -> &BTreeMap<String, u64> {
        &self.category_counts
    }
}
