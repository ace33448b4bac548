//! # Aggregator
//! `StatSet`: the overall bucket plus lazily created per-entity buckets.
//!
//! Each folded message updates the overall bucket and every grouping bucket it
//! qualifies for. A dimension can be restricted to a roster of known keys;
//! messages with a key outside the roster update overall only.

use crate::classifier::CategoryCache;
use crate::lexicon::Lexicon;
use crate::message::Message;
use crate::stats::{AnalyzedMessage, StatBucket, StatsError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Grouping dimension of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    Overall,
    ByUser,
    ByChannel,
    ByDay,
    ByMonth,
}

/// Identity of one bucket inside a `StatSet`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "grouping", content = "key", rename_all = "snake_case")]
pub enum BucketKey {
    Overall,
    User(String),
    Channel(String),
    /// `YYYY-MM-DD` (UTC)
    Day(String),
    /// `YYYY-MM` (UTC)
    Month(String),
}

impl BucketKey {
    pub fn grouping(&self) -> Grouping {
        match self {
            BucketKey::Overall => Grouping::Overall,
            BucketKey::User(_) => Grouping::ByUser,
            BucketKey::Channel(_) => Grouping::ByChannel,
            BucketKey::Day(_) => Grouping::ByDay,
            BucketKey::Month(_) => Grouping::ByMonth,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            BucketKey::Overall => "overall",
            BucketKey::User(k)
            | BucketKey::Channel(k)
            | BucketKey::Day(k)
            | BucketKey::Month(k) => k,
        }
    }
}

/// Outcome of `StatSet::finalize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FinalizeSummary {
    pub finalized: usize,
    pub skipped_empty: usize,
}

#[derive(Debug, Default)]
pub struct StatSet {
    groupings: Vec<Grouping>,
    rosters: HashMap<Grouping, HashSet<String>>,
    overall: StatBucket,
    buckets: BTreeMap<BucketKey, StatBucket>,
    finalized: bool,
}

impl StatSet {
    /// `Overall` is always present; listing it again is harmless.
    pub fn new(groupings: impl IntoIterator<Item = Grouping>) -> Self {
        let mut gs: Vec<Grouping> = groupings
            .into_iter()
            .filter(|g| *g != Grouping::Overall)
            .collect();
        gs.sort();
        gs.dedup();
        Self {
            groupings: gs,
            ..Default::default()
        }
    }

    /// Only create buckets of `grouping` for these keys.
    pub fn with_roster<I, S>(mut self, grouping: Grouping, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rosters
            .insert(grouping, keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn groupings(&self) -> &[Grouping] {
        &self.groupings
    }

    /// Grouping buckets a message qualifies for (overall excluded).
    pub fn keys_for(&self, message: &Message, at: DateTime<Utc>) -> Vec<BucketKey> {
        let mut keys = Vec::with_capacity(self.groupings.len());
        for &g in &self.groupings {
            let key = match g {
                Grouping::Overall => continue,
                Grouping::ByUser if !message.author_id.is_empty() => {
                    BucketKey::User(message.author_id.clone())
                }
                Grouping::ByChannel => match &message.channel {
                    Some(c) => BucketKey::Channel(c.clone()),
                    None => continue,
                },
                Grouping::ByDay => BucketKey::Day(at.format("%Y-%m-%d").to_string()),
                Grouping::ByMonth => BucketKey::Month(at.format("%Y-%m").to_string()),
                Grouping::ByUser => continue,
            };
            if let Some(roster) = self.rosters.get(&g) {
                if !roster.contains(key.id()) {
                    continue;
                }
            }
            keys.push(key);
        }
        keys
    }

    /// Fold one analyzed message into overall and its grouping buckets.
    pub fn fold(
        &mut self,
        message: &Message,
        analyzed: &AnalyzedMessage,
        at: DateTime<Utc>,
    ) -> Result<(), StatsError> {
        if self.finalized {
            return Err(StatsError::Frozen);
        }
        if !message.has_text() {
            return Ok(());
        }
        self.overall.fold(message, analyzed)?;
        for key in self.keys_for(message, at) {
            self.buckets.entry(key).or_default().fold(message, analyzed)?;
        }
        Ok(())
    }

    /// Finalize every non-empty bucket. Runs once per set, after all folds.
    pub fn finalize(
        &mut self,
        lexicon: &Lexicon,
        cache: &mut CategoryCache,
    ) -> Result<FinalizeSummary, StatsError> {
        if self.finalized {
            return Err(StatsError::AlreadyFinalized);
        }
        let mut summary = FinalizeSummary::default();
        finalize_bucket(&BucketKey::Overall, &mut self.overall, lexicon, cache, &mut summary)?;
        for (key, bucket) in self.buckets.iter_mut() {
            finalize_bucket(key, bucket, lexicon, cache, &mut summary)?;
        }

        self.finalized = true;
        Ok(summary)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn overall(&self) -> &StatBucket {
        &self.overall
    }

    pub fn bucket(&self, key: &BucketKey) -> Option<&StatBucket> {
        match key {
            BucketKey::Overall => Some(&self.overall),
            k => self.buckets.get(k),
        }
    }

    /// Buckets of one grouping, in key order, as `(key id, bucket)`.
    pub fn buckets(&self, grouping: Grouping) -> impl Iterator<Item = (&str, &StatBucket)> {
        self.buckets
            .iter()
            .filter(move |(k, _)| k.grouping() == grouping)
            .map(|(k, b)| (k.id(), b))
    }

    /// Only buckets that were finalized (non-empty), for reporting.
    pub fn reportable(&self, grouping: Grouping) -> impl Iterator<Item = (&str, &StatBucket)> {
        self.buckets(grouping).filter(|(_, b)| b.is_finalized())
    }

    /// Number of buckets, overall included.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len() + 1
    }
}

fn finalize_bucket(
    key: &BucketKey,
    bucket: &mut StatBucket,
    lexicon: &Lexicon,
    cache: &mut CategoryCache,
    summary: &mut FinalizeSummary,
) -> Result<(), StatsError> {
    match bucket.finalize(lexicon, cache) {
        Ok(_) => summary.finalized += 1,
        Err(StatsError::EmptyBucket) => {
            debug!(?key, "skipping empty bucket");
            summary.skipped_empty += 1;
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::Scores;
    use crate::tokenize::tokenize;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn analyzed(text: &str) -> AnalyzedMessage {
        AnalyzedMessage {
            words: tokenize(text, true, true),
            emojis: Vec::new(),
            scores: Scores::default(),
        }
    }

    fn add(set: &mut StatSet, user: &str, text: &str, secs: i64) {
        let m = Message::new(user, text, secs.to_string()).in_channel("general");
        set.fold(&m, &analyzed(text), at(secs)).unwrap();
    }

    #[test]
    fn message_updates_overall_and_each_grouping() {
        let mut set = StatSet::new([Grouping::ByUser, Grouping::ByDay, Grouping::ByMonth]);
        add(&mut set, "U1", "hello there", 1_514_764_800); // 2018-01-01
        add(&mut set, "U2", "hi", 1_514_851_200); // 2018-01-02
        add(&mut set, "U1", "again", 1_517_443_200); // 2018-02-01

        assert_eq!(set.overall().totals().messages, 3);
        let u1 = set.bucket(&BucketKey::User("U1".into())).unwrap();
        assert_eq!(u1.totals().words, 3);
        assert_eq!(
            set.bucket(&BucketKey::Month("2018-01".into()))
                .unwrap()
                .totals()
                .messages,
            2
        );
        let days: Vec<&str> = set.buckets(Grouping::ByDay).map(|(k, _)| k).collect();
        assert_eq!(days, vec!["2018-01-01", "2018-01-02", "2018-02-01"]);
        assert!(set.buckets(Grouping::ByChannel).next().is_none());
    }

    #[test]
    fn unknown_roster_key_updates_overall_only() {
        let mut set = StatSet::new([Grouping::ByUser, Grouping::ByChannel])
            .with_roster(Grouping::ByUser, ["U1"])
            .with_roster(Grouping::ByChannel, ["general"]);
        add(&mut set, "U1", "one", 0);
        add(&mut set, "U9", "two words", 0);

        assert_eq!(set.overall().totals().words, 3);
        assert!(set.bucket(&BucketKey::User("U9".into())).is_none());
        assert_eq!(
            set.bucket(&BucketKey::Channel("general".into()))
                .unwrap()
                .totals()
                .words,
            3
        );
    }

    #[test]
    fn finalize_skips_empty_buckets_and_runs_once() {
        let lex = Lexicon::embedded().unwrap();
        let mut cache = CategoryCache::new();
        let mut set = StatSet::new([Grouping::ByUser]);
        add(&mut set, "U1", "real words here", 0);
        add(&mut set, "U2", "...", 0);

        let summary = set.finalize(&lex, &mut cache).unwrap();
        assert_eq!(
            summary,
            FinalizeSummary {
                finalized: 2,
                skipped_empty: 1
            }
        );
        let reportable: Vec<&str> = set.reportable(Grouping::ByUser).map(|(k, _)| k).collect();
        assert_eq!(reportable, vec!["U1"]);

        assert_eq!(
            set.finalize(&lex, &mut cache),
            Err(StatsError::AlreadyFinalized)
        );
        let m = Message::new("U1", "late", "0");
        assert_eq!(
            set.fold(&m, &analyzed("late"), at(0)),
            Err(StatsError::Frozen)
        );
    }

    #[test]
    fn repeated_words_share_one_classification() {
        let lex = Lexicon::embedded().unwrap();
        let mut cache = CategoryCache::new();
        let mut set = StatSet::new([Grouping::ByUser, Grouping::ByDay]);
        add(&mut set, "U1", "the the love", 0);
        add(&mut set, "U2", "the love", 86_400);
        set.finalize(&lex, &mut cache).unwrap();

        // 5 buckets look up the same two words; each is classified once
        assert_eq!(cache.computed(), 2);
        assert_eq!(cache.hits(), 8);
    }
}
