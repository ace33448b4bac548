// src/config.rs
//! Analyzer settings from TOML with env overrides.
//!
//! Resolution order:
//! 1) explicit path (CLI `--config`)
//! 2) $SLACK_STATS_CONFIG
//! 3) config/slack_stats.toml
//! 4) built-in defaults
//!
//! `SLACK_STATS_TOP_N` and `SLACK_STATS_LEXICON` then override single fields.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

pub const ENV_CONFIG: &str = "SLACK_STATS_CONFIG";
pub const ENV_TOP_N: &str = "SLACK_STATS_TOP_N";
pub const ENV_LEXICON: &str = "SLACK_STATS_LEXICON";
const DEFAULT_CONFIG_PATH: &str = "config/slack_stats.toml";

fn default_top_n() -> usize {
    20
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_data_path() -> PathBuf {
    PathBuf::from("../data")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Top words listed per bucket.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Keep stoplist words in top-N lists.
    #[serde(default)]
    pub include_common: bool,
    /// Replacement lexicon; the embedded one when unset.
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
    /// Where JSON reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Export directory (or message file) read when the CLI gets no path.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            include_common: false,
            lexicon_path: None,
            output_dir: default_output_dir(),
            data_path: default_data_path(),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: AnalyzerConfig = toml::from_str(s).context("parsing analyzer config")?;
        Ok(cfg)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Resolve the file per the module-level order, then apply env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = if let Some(p) = explicit {
            Self::load_from_file(p)?
        } else if let Ok(p) = env::var(ENV_CONFIG) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG} points to non-existent path"));
            }
            Self::load_from_file(&pb)?
        } else {
            let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_p.exists() {
                Self::load_from_file(&default_p)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env()?;
        Ok(cfg)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(v) = env::var(ENV_TOP_N) {
            self.top_n = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_TOP_N} must be a non-negative integer, got {v:?}"))?;
        }
        if let Ok(v) = env::var(ENV_LEXICON) {
            if !v.trim().is_empty() {
                self.lexicon_path = Some(PathBuf::from(v));
            }
        }
        Ok(())
    }
}
