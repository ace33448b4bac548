//! # Analysis run
//! Wires tokenizer, scorer, aggregator and finalizer into one pass.
//!
//! Two modes, matching the two report shapes:
//! - `Channels`: per-user and per-channel buckets, symbol-stripped lowercase
//!   words, buckets restricted to the users/channels of the export.
//! - `Messages`: per-user, per-day and per-month buckets, emoji-aware
//!   tokenization, buckets created for every key seen.
//!
//! Order of operations is fixed: fold every message, then finalize every
//! bucket once with a run-scoped `CategoryCache`.

use crate::aggregate::{FinalizeSummary, Grouping, StatSet};
use crate::classifier::CategoryCache;
use crate::lexicon::Lexicon;
use crate::logging::anon_hash;
use crate::message::{Message, TimeSource};
use crate::roster::{Channel, User};
use crate::scorer::Scorer;
use crate::stats::{AnalyzedMessage, StatsError};
use crate::tokenize::{tokenize, tokenize_with_emoji};
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::borrow::Cow;
use tracing::{info, warn};

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "stats_messages_folded_total",
            "Messages folded into statistic buckets."
        );
        describe_counter!(
            "stats_messages_skipped_total",
            "Messages skipped because their text was empty."
        );
        describe_counter!(
            "stats_timestamp_fallback_total",
            "Messages whose timestamp could not be parsed and were dated now."
        );
        describe_counter!(
            "stats_buckets_finalized_total",
            "Buckets finalized into averages."
        );
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Channels,
    Messages,
}

impl AnalysisMode {
    pub fn groupings(self) -> &'static [Grouping] {
        match self {
            AnalysisMode::Channels => &[Grouping::ByUser, Grouping::ByChannel],
            AnalysisMode::Messages => &[Grouping::ByUser, Grouping::ByDay, Grouping::ByMonth],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub mode: AnalysisMode,
    /// Fold word case before counting.
    pub lowercase: bool,
}

impl AnalysisOptions {
    /// Channel mode folds case; message mode keeps words as written.
    pub fn for_mode(mode: AnalysisMode) -> Self {
        Self {
            mode,
            lowercase: matches!(mode, AnalysisMode::Channels),
        }
    }
}

/// Counters describing one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub messages_seen: u64,
    pub messages_folded: u64,
    pub skipped_empty: u64,
    /// Messages dated "now" because `ts` was unusable.
    pub fallback_timestamps: u64,
    pub buckets_finalized: usize,
    pub buckets_skipped_empty: usize,
    pub words_classified: usize,
}

/// A finished, finalized run.
#[derive(Debug)]
pub struct Analysis {
    pub captured_at: DateTime<Utc>,
    pub mode: AnalysisMode,
    pub stats: StatSet,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    lexicon: &'a Lexicon,
    options: AnalysisOptions,
}

impl<'a> Analyzer<'a> {
    pub fn new(lexicon: &'a Lexicon, options: AnalysisOptions) -> Self {
        Self { lexicon, options }
    }

    /// Tokenize and score one message body.
    pub fn analyze_message(&self, message: &Message) -> AnalyzedMessage {
        let (words, emojis) = match self.options.mode {
            AnalysisMode::Channels => (
                tokenize(&message.text, true, self.options.lowercase),
                Vec::new(),
            ),
            AnalysisMode::Messages => tokenize_with_emoji(&message.text, self.options.lowercase),
        };
        let scores = Scorer::new(self.lexicon).score(&words);
        AnalyzedMessage {
            words,
            emojis,
            scores,
        }
    }

    /// Empty set with this mode's groupings.
    pub fn stat_set(&self) -> StatSet {
        StatSet::new(self.options.mode.groupings().iter().copied())
    }

    /// Fold messages into `set`. `now` dates messages with unusable timestamps.
    pub fn fold_all<'m, I>(
        &self,
        set: &mut StatSet,
        messages: I,
        now: DateTime<Utc>,
        summary: &mut RunSummary,
    ) -> Result<(), StatsError>
    where
        I: IntoIterator<Item = Cow<'m, Message>>,
    {
        ensure_metrics_described();
        let needs_time = set
            .groupings()
            .iter()
            .any(|g| matches!(g, Grouping::ByDay | Grouping::ByMonth));

        for m in messages {
            summary.messages_seen += 1;
            if !m.has_text() {
                summary.skipped_empty += 1;
                counter!("stats_messages_skipped_total").increment(1);
                continue;
            }

            let at = if needs_time {
                let (at, source) = m.resolve_time(now);
                if source == TimeSource::Fallback {
                    summary.fallback_timestamps += 1;
                    counter!("stats_timestamp_fallback_total").increment(1);
                    warn!(
                        msg = %anon_hash(&m.text),
                        ts = %m.timestamp,
                        "unparsable message timestamp; dating it now"
                    );
                }
                at
            } else {
                now
            };

            let analyzed = self.analyze_message(&m);
            set.fold(&m, &analyzed, at)?;
            summary.messages_folded += 1;
            counter!("stats_messages_folded_total").increment(1);
        }
        Ok(())
    }

    /// Finalize `set` with a fresh run-scoped cache.
    pub fn finalize(
        &self,
        set: &mut StatSet,
        summary: &mut RunSummary,
    ) -> Result<FinalizeSummary, StatsError> {
        let mut cache = CategoryCache::new();
        let fin = set.finalize(self.lexicon, &mut cache)?;
        summary.buckets_finalized = fin.finalized;
        summary.buckets_skipped_empty = fin.skipped_empty;
        summary.words_classified = cache.computed();
        counter!("stats_buckets_finalized_total").increment(fin.finalized as u64);
        Ok(fin)
    }

    /// Workspace analysis: per-user and per-channel buckets for the given
    /// roster, messages taken from each channel.
    pub fn run_channels(
        &self,
        users: &[User],
        channels: &[Channel],
    ) -> Result<Analysis, StatsError> {
        self.run_channels_at(users, channels, Utc::now())
    }

    pub fn run_channels_at(
        &self,
        users: &[User],
        channels: &[Channel],
        now: DateTime<Utc>,
    ) -> Result<Analysis, StatsError> {
        let mut set = self
            .stat_set()
            .with_roster(Grouping::ByUser, users.iter().map(|u| u.id.clone()))
            .with_roster(Grouping::ByChannel, channels.iter().map(|c| c.name.clone()));

        let messages = channels.iter().flat_map(|c| {
            c.messages.iter().map(move |m| {
                if m.channel.as_deref() == Some(c.name.as_str()) {
                    Cow::Borrowed(m)
                } else {
                    Cow::Owned(m.clone().in_channel(c.name.clone()))
                }
            })
        });

        let summary = self.run_into(&mut set, messages, now)?;
        Ok(Analysis {
            captured_at: now,
            mode: self.options.mode,
            stats: set,
            summary,
        })
    }

    /// Flat message analysis: overall, per-user, per-day and per-month buckets.
    pub fn run_messages(&self, messages: &[Message]) -> Result<Analysis, StatsError> {
        self.run_messages_at(messages, Utc::now())
    }

    pub fn run_messages_at(
        &self,
        messages: &[Message],
        now: DateTime<Utc>,
    ) -> Result<Analysis, StatsError> {
        let mut set = self.stat_set();
        let summary = self.run_into(&mut set, messages.iter().map(Cow::Borrowed), now)?;
        Ok(Analysis {
            captured_at: now,
            mode: self.options.mode,
            stats: set,
            summary,
        })
    }

    fn run_into<'m, I>(
        &self,
        set: &mut StatSet,
        messages: I,
        now: DateTime<Utc>,
    ) -> Result<RunSummary, StatsError>
    where
        I: IntoIterator<Item = Cow<'m, Message>>,
    {
        let mut summary = RunSummary::default();
        self.fold_all(set, messages, now, &mut summary)?;
        self.finalize(set, &mut summary)?;
        info!(
            mode = ?self.options.mode,
            folded = summary.messages_folded,
            skipped = summary.skipped_empty,
            fallback_ts = summary.fallback_timestamps,
            buckets = summary.buckets_finalized,
            "analysis finished"
        );
        Ok(summary)
    }
}
