//! # Reports
//! Serializable views over a finalized `Analysis`, a console renderer, and the
//! timestamped JSON export.
//!
//! Only finalized buckets appear in a report; empty buckets were skipped at
//! finalization and so never show up with NaN averages.

use crate::aggregate::Grouping;
use crate::analysis::{Analysis, RunSummary};
use crate::lexicon::Lexicon;
use crate::rank::{rank, rank_emojis, top_n, WordCount};
use crate::roster::{Channel, User};
use crate::stats::{Averages, StatBucket, Totals};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub top_n: usize,
    pub include_common: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: 20,
            include_common: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketReport {
    pub totals: Totals,
    pub averages: Averages,
    pub category_counts: BTreeMap<String, u64>,
    pub top_words: Vec<WordCount>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_emojis: Vec<WordCount>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub emoji_counts: BTreeMap<String, u64>,
}

impl BucketReport {
    /// `None` for buckets that were never finalized.
    pub fn from_bucket(
        bucket: &StatBucket,
        lexicon: &Lexicon,
        opts: &ReportOptions,
        with_emojis: bool,
    ) -> Option<Self> {
        let averages = *bucket.averages()?;
        let top_words = top_n(&rank(bucket), opts.top_n, opts.include_common, lexicon);
        let (top_emojis, emoji_counts) = if with_emojis {
            (
                rank_emojis(bucket).into_iter().take(opts.top_n).collect(),
                bucket
                    .emoji_counts()
                    .iter()
                    .map(|(k, v)| (k.clone(), *v))
                    .collect(),
            )
        } else {
            (Vec::new(), BTreeMap::new())
        };
        Some(Self {
            totals: *bucket.totals(),
            averages,
            category_counts: bucket.category_counts().clone(),
            top_words,
            top_emojis,
            emoji_counts,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityReport {
    pub id: String,
    pub name: String,
    pub stats: BucketReport,
}

/// Workspace report: overall, per-user and per-channel.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    pub time: i64,
    pub overall: Option<BucketReport>,
    pub users: Vec<EntityReport>,
    pub channels: Vec<EntityReport>,
    pub summary: RunSummary,
}

/// Message-file report: overall, per-user, per-day and per-month.
#[derive(Debug, Clone, Serialize)]
pub struct MessageReport {
    pub time: i64,
    pub overall: Option<BucketReport>,
    pub users: BTreeMap<String, BucketReport>,
    pub daily: BTreeMap<String, BucketReport>,
    pub monthly: BTreeMap<String, BucketReport>,
    pub summary: RunSummary,
}

/// Build the workspace report. Deleted users are left out; users and channels
/// without a finalized bucket are left out.
pub fn channel_report(
    analysis: &Analysis,
    users: &[User],
    channels: &[Channel],
    lexicon: &Lexicon,
    opts: &ReportOptions,
) -> ChannelReport {
    let stats = &analysis.stats;
    let user_buckets: HashMap<&str, &StatBucket> = stats.reportable(Grouping::ByUser).collect();
    let channel_buckets: HashMap<&str, &StatBucket> =
        stats.reportable(Grouping::ByChannel).collect();

    let users = users
        .iter()
        .filter(|u| !u.deleted)
        .filter_map(|u| {
            let bucket = user_buckets.get(u.id.as_str())?;
            Some(EntityReport {
                id: u.id.clone(),
                name: u.display_name().to_string(),
                stats: BucketReport::from_bucket(bucket, lexicon, opts, false)?,
            })
        })
        .collect();

    let channels = channels
        .iter()
        .filter_map(|c| {
            let bucket = channel_buckets.get(c.name.as_str())?;
            Some(EntityReport {
                id: c.id.clone(),
                name: c.name.clone(),
                stats: BucketReport::from_bucket(bucket, lexicon, opts, false)?,
            })
        })
        .collect();

    ChannelReport {
        time: analysis.captured_at.timestamp(),
        overall: BucketReport::from_bucket(stats.overall(), lexicon, opts, false),
        users,
        channels,
        summary: analysis.summary,
    }
}

/// Build the message report. `users` only filters out deleted accounts; ids
/// missing from it are still reported.
pub fn message_report(
    analysis: &Analysis,
    users: &[User],
    lexicon: &Lexicon,
    opts: &ReportOptions,
) -> MessageReport {
    let stats = &analysis.stats;
    let deleted: Vec<&str> = users
        .iter()
        .filter(|u| u.deleted)
        .map(|u| u.id.as_str())
        .collect();

    let collect = |grouping: Grouping| -> BTreeMap<String, BucketReport> {
        stats
            .reportable(grouping)
            .filter(|(id, _)| grouping != Grouping::ByUser || !deleted.contains(id))
            .filter_map(|(id, b)| {
                BucketReport::from_bucket(b, lexicon, opts, true).map(|r| (id.to_string(), r))
            })
            .collect()
    };

    MessageReport {
        time: analysis.captured_at.timestamp(),
        overall: BucketReport::from_bucket(stats.overall(), lexicon, opts, true),
        users: collect(Grouping::ByUser),
        daily: collect(Grouping::ByDay),
        monthly: collect(Grouping::ByMonth),
        summary: analysis.summary,
    }
}

fn render_bucket(out: &mut String, r: &BucketReport) {
    let t = &r.totals;
    let a = &r.averages;
    let _ = writeln!(out, "Total text length: {}", t.text_length);
    let _ = writeln!(out, "Total words: {}", t.words);
    let _ = writeln!(out, "Total messages: {}", t.messages);
    let _ = writeln!(out, "Avg word length: {:.4}", a.word_length);
    let _ = writeln!(out, "Avg words per message: {:.4}", a.words_per_message);
    if t.emojis > 0 {
        let _ = writeln!(out, "Avg emojis per message: {:.4}", a.emojis_per_message);
    }
    let _ = writeln!(out, "Avg message clout: {:.4}", a.clout_per_message);
    let _ = writeln!(out, "Avg message tone: {:.4}", a.tone_per_message);
    let _ = writeln!(out, "Avg message analytic: {:.4}", a.analytic_per_message);
}

fn render_words(out: &mut String, words: &[WordCount]) {
    for wc in words {
        let _ = writeln!(out, "{} {}", wc.word, wc.count);
    }
}

/// Shared surface of the two report shapes.
pub trait Report: Serialize {
    /// Capture time, unix seconds.
    fn time(&self) -> i64;
    fn render_text(&self) -> String;
}

impl Report for ChannelReport {
    fn time(&self) -> i64 {
        self.time
    }

    fn render_text(&self) -> String {
        render_channel_report(self)
    }
}

impl Report for MessageReport {
    fn time(&self) -> i64 {
        self.time
    }

    fn render_text(&self) -> String {
        render_message_report(self)
    }
}

/// Console rendering of either report.
pub fn render_text<R: Report>(report: &R) -> String {
    report.render_text()
}

fn render_channel_report(report: &ChannelReport) -> String {
    let mut out = String::new();
    match &report.overall {
        Some(overall) => {
            render_bucket(&mut out, overall);
            let cats: Vec<String> = overall
                .category_counts
                .iter()
                .map(|(k, v)| format!("{k}:{v}"))
                .collect();
            let _ = writeln!(out, "Category counts:");
            let _ = writeln!(out, "{}", cats.join(" "));
            let _ = writeln!(out);
            render_words(&mut out, &overall.top_words);
        }
        None => {
            let _ = writeln!(out, "No words found.");
        }
    }

    for section in [("Users", &report.users), ("Channels", &report.channels)] {
        let (title, entities) = section;
        if entities.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n== {title} ==");
        for e in entities {
            let _ = writeln!(out, "\n{}\n", e.name);
            render_bucket(&mut out, &e.stats);
        }
    }
    out
}

fn render_message_report(report: &MessageReport) -> String {
    let mut out = String::new();
    if let Some(overall) = &report.overall {
        render_bucket(&mut out, overall);
        render_words(&mut out, &overall.top_words);
    }
    let _ = writeln!(
        out,
        "\n{} users, {} days, {} months",
        report.users.len(),
        report.daily.len(),
        report.monthly.len()
    );
    if report.summary.fallback_timestamps > 0 {
        let _ = writeln!(
            out,
            "warning: {} messages had unusable timestamps and were dated at capture time",
            report.summary.fallback_timestamps
        );
    }
    out
}

/// Write `report` as pretty JSON to `<dir>/<capture time>.json`.
pub fn export_json<R: Report>(report: &R, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating output dir {}", dir.display()))?;
    let path = dir.join(format!("{}.json", report.time()));
    let body = serde_json::to_string_pretty(report).context("serializing report")?;
    fs::write(&path, body).with_context(|| format!("writing report to {}", path.display()))?;
    Ok(path)
}
