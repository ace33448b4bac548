// src/ingest/archive.rs
//! Slack-shaped export on disk:
//!
//! ```text
//! <dir>/users.json          [{id, name, deleted, real_name, profile}, ...]
//! <dir>/channels.json       [{id, name}, ...]
//! <dir>/<channel>/<day>.json  [{user, type, subtype, text, ts}, ...]
//! ```
//!
//! Metadata files are required; a bad daily file is skipped with a warning so
//! one corrupt day never sinks a whole workspace.

use super::ensure_metrics_described;
use crate::message::Message;
use crate::roster::{Channel, User};
use anyhow::{Context, Result};
use metrics::counter;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Directory entries sorted by file name, so daily files load in date order.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    paths.sort();
    Ok(paths)
}

/// `<dir>/users.json`.
pub fn load_users(dir: &Path) -> Result<Vec<User>> {
    read_json(&dir.join("users.json"))
}

/// `<dir>/channels.json`, each channel carrying the messages of
/// `<dir>/<channel name>/`. A channel whose directory is missing or
/// unreadable has no messages.
pub fn load_channels(dir: &Path) -> Result<Vec<Channel>> {
    let mut channels: Vec<Channel> = read_json(&dir.join("channels.json"))?;
    for channel in &mut channels {
        let channel_dir = dir.join(&channel.name);
        if !channel_dir.exists() {
            debug!(channel = %channel.name, "no message directory for channel");
            continue;
        }
        match read_channel_messages(&channel_dir) {
            Ok(found) => {
                channel.messages = found
                    .into_iter()
                    .map(|m| m.in_channel(channel.name.clone()))
                    .collect();
            }
            Err(e) => {
                warn!(dir = %channel_dir.display(), error = %e, "skipping channel directory")
            }
        }
    }
    Ok(channels)
}

/// Every `*.json` file in a channel directory, concatenated in file-name order.
pub fn read_channel_messages(channel_dir: &Path) -> Result<Vec<Message>> {
    ensure_metrics_described();
    let mut messages = Vec::new();
    for path in sorted_entries(channel_dir)? {
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match read_json::<Vec<Message>>(&path) {
            Ok(day) => {
                counter!("archive_files_read_total").increment(1);
                messages.extend(day);
            }
            Err(e) => {
                counter!("archive_files_skipped_total").increment(1);
                warn!(file = %path.display(), error = %e, "skipping message file");
            }
        }
    }
    Ok(messages)
}

/// Messages of every channel directory under `dir`, tagged with the directory
/// name. Unreadable channel directories are skipped.
pub fn read_all_messages(dir: &Path) -> Result<Vec<Message>> {
    let mut messages = Vec::new();
    for path in sorted_entries(dir)? {
        if !path.is_dir() {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match read_channel_messages(&path) {
            Ok(found) => messages.extend(found.into_iter().map(|m| m.in_channel(name.clone()))),
            Err(e) => warn!(dir = %path.display(), error = %e, "skipping channel directory"),
        }
    }
    Ok(messages)
}

/// A single JSON array of messages. Any error is fatal.
pub fn read_messages_file(path: &Path) -> Result<Vec<Message>> {
    read_json(path)
}

pub fn filter_by_user(messages: &[Message], user_id: &str) -> Vec<Message> {
    messages
        .iter()
        .filter(|m| m.author_id == user_id)
        .cloned()
        .collect()
}
