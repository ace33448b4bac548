//! slack-stats: text statistics for a Slack workspace export.
//!
//! Two modes:
//! - default: `--path` is an export directory; prints overall, per-user and
//!   per-channel stats.
//! - `-m`: `--path` is a JSON array of messages; writes a `<unix>.json`
//!   report with overall, per-user, per-day and per-month stats.

use anyhow::{Context, Result};
use clap::Parser;
use slack_stats::ingest::{filter_by_user, load_channels, load_users, read_messages_file};
use slack_stats::logging::init_tracing;
use slack_stats::{
    channel_report, export_json, message_report, render_text, AnalysisMode, AnalysisOptions,
    Analyzer, AnalyzerConfig, Lexicon, ReportOptions,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "slack-stats")]
#[command(about = "Word, emoji and tone statistics for a Slack export")]
#[command(version)]
struct Args {
    /// Export directory, or message file with -m (default from config: ../data)
    #[arg(short = 'p', long, env = "SLACK_STATS_PATH")]
    path: Option<PathBuf>,

    /// Path points to a JSON file containing a messages array
    #[arg(short = 'm', long)]
    messages: bool,

    /// Only analyze messages from this user id (message mode)
    #[arg(long)]
    user: Option<String>,

    /// Top words listed per bucket
    #[arg(long)]
    top: Option<usize>,

    /// Keep common words in top-word lists
    #[arg(long)]
    include_common: bool,

    /// Lexicon TOML replacing the built-in one
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Directory for JSON reports
    #[arg(long)]
    out: Option<PathBuf>,

    /// Analyzer config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    let cfg = AnalyzerConfig::load(args.config.as_deref()).context("failed to load configuration")?;

    let lexicon_path = args.lexicon.as_ref().or(cfg.lexicon_path.as_ref());
    let lexicon = Lexicon::load(lexicon_path.map(PathBuf::as_path))
        .context("failed to load lexicon")?;
    let opts = ReportOptions {
        top_n: args.top.unwrap_or(cfg.top_n),
        include_common: args.include_common || cfg.include_common,
    };
    let path = args.path.clone().unwrap_or_else(|| cfg.data_path.clone());

    if args.messages {
        let mut messages = read_messages_file(&path)?;
        if let Some(user) = &args.user {
            messages = filter_by_user(&messages, user);
        }
        let analyzer = Analyzer::new(&lexicon, AnalysisOptions::for_mode(AnalysisMode::Messages));
        let analysis = analyzer.run_messages(&messages)?;
        let report = message_report(&analysis, &[], &lexicon, &opts);

        let out_dir = args.out.unwrap_or(cfg.output_dir);
        let written = export_json(&report, &out_dir)?;
        print!("{}", render_text(&report));
        info!(path = %written.display(), "report written");
        println!("Report written to {}", written.display());
        return Ok(());
    }

    let users = load_users(&path)?;
    let channels = load_channels(&path)?;
    let analyzer = Analyzer::new(&lexicon, AnalysisOptions::for_mode(AnalysisMode::Channels));
    let analysis = analyzer.run_channels(&users, &channels)?;
    let report = channel_report(&analysis, &users, &channels, &lexicon, &opts);
    print!("{}", render_text(&report));

    if let Some(out_dir) = args.out {
        let written = export_json(&report, &out_dir)?;
        println!("Report written to {}", written.display());
    }
    Ok(())
}
