// src/lib.rs
// Library surface shared by the CLI and the integration tests.

pub mod aggregate;
pub mod analysis;
pub mod classifier;
pub mod config;
pub mod lexicon;
pub mod logging;
pub mod message;
pub mod rank;
pub mod report;
pub mod roster;
pub mod scorer;
pub mod stats;
pub mod tokenize;

// Slack export loader
pub mod ingest;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{BucketKey, Grouping, StatSet};
pub use crate::analysis::{Analysis, AnalysisMode, AnalysisOptions, Analyzer, RunSummary};
pub use crate::classifier::CategoryCache;
pub use crate::config::AnalyzerConfig;
pub use crate::lexicon::{Lexicon, LexiconError, WordClass};
pub use crate::message::Message;
pub use crate::rank::{rank, top_n, try_top_n, WordCount};
pub use crate::report::{
    channel_report, export_json, message_report, render_text, ChannelReport, MessageReport,
    Report, ReportOptions,
};
pub use crate::roster::{Channel, User};
pub use crate::scorer::{Scorer, Scores};
pub use crate::stats::{Averages, StatBucket, StatsError, Totals};
