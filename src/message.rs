// src/message.rs
//! Normalized message record handed to the engine by the archive loader.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One chat message. Field names follow the Slack export format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "user", default)]
    pub author_id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "subtype", default)]
    pub subkind: String,
    #[serde(default)]
    pub text: String,
    /// Decimal seconds since epoch, e.g. `"1514764800.000200"`.
    #[serde(rename = "ts", default)]
    pub timestamp: String,
    /// Channel the loader read this message from (not part of the export record).
    #[serde(skip)]
    pub channel: Option<String>,
}

/// Where a message's time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    Parsed,
    /// `ts` was missing or unparsable; "now" was substituted.
    Fallback,
}

impl Message {
    pub fn new(
        author_id: impl Into<String>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            kind: "message".to_string(),
            text: text.into(),
            timestamp: timestamp.into(),
            ..Default::default()
        }
    }

    pub fn in_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Whole seconds of `ts`; fractional part truncated.
    pub fn timestamp_secs(&self) -> Option<i64> {
        let secs = self.timestamp.trim().parse::<f64>().ok()?;
        if !secs.is_finite() || secs < i64::MIN as f64 || secs > i64::MAX as f64 {
            return None;
        }
        Some(secs.trunc() as i64)
    }

    /// Message time, falling back to `now` when `ts` can't be used.
    pub fn resolve_time(&self, now: DateTime<Utc>) -> (DateTime<Utc>, TimeSource) {
        match self
            .timestamp_secs()
            .and_then(|s| DateTime::from_timestamp(s, 0))
        {
            Some(t) => (t, TimeSource::Parsed),
            None => (now, TimeSource::Fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_slack_fields() {
        let raw = r#"{"type":"message","user":"U1","text":"hi","ts":"1514764800.000200","client_msg_id":"x"}"#;
        let m: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(m.author_id, "U1");
        assert_eq!(m.kind, "message");
        assert_eq!(m.subkind, "");
        assert_eq!(m.timestamp_secs(), Some(1_514_764_800));
        assert_eq!(m.channel, None);
    }

    #[test]
    fn bad_timestamp_falls_back_to_now() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let m = Message::new("U1", "hi", "yesterday");
        assert_eq!(m.resolve_time(now), (now, TimeSource::Fallback));

        let ok = Message::new("U1", "hi", "86400.9");
        let (t, src) = ok.resolve_time(now);
        assert_eq!(src, TimeSource::Parsed);
        assert_eq!(t.format("%Y-%m-%d").to_string(), "1970-01-02");
    }
}
