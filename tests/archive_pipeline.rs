// tests/archive_pipeline.rs
// Workspace export on disk -> loader -> analysis -> report -> JSON artifact.

use chrono::DateTime;
use slack_stats::ingest::{load_channels, load_users, read_all_messages, read_messages_file};
use slack_stats::{
    channel_report, export_json, message_report, render_text, AnalysisMode, AnalysisOptions,
    Analyzer, Lexicon, ReportOptions,
};
use std::fs;
use std::path::Path;

const USERS: &str = r#"[
  {"id": "U1", "name": "ada", "deleted": false, "real_name": "Ada Lovelace",
   "profile": {"real_name": "Ada Lovelace", "display_name": "ada"}, "tz": "Europe/London"},
  {"id": "U2", "name": "bob", "deleted": false, "real_name": "",
   "profile": {"real_name": "", "display_name": "bobby"}},
  {"id": "U3", "name": "gone", "deleted": true, "profile": {}}
]"#;

const CHANNELS: &str = r#"[
  {"id": "C1", "name": "general", "is_archived": false, "members": ["U1", "U2"],
   "topic": {"value": "", "creator": "", "last_set": 0}},
  {"id": "C2", "name": "random", "is_archived": true, "members": []}
]"#;

fn write(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn workspace(root: &Path) {
    write(&root.join("users.json"), USERS);
    write(&root.join("channels.json"), CHANNELS);
    write(
        &root.join("general/2018-01-01.json"),
        r#"[
          {"type": "message", "user": "U1", "text": "We love Rust!", "ts": "1514764800.000100"},
          {"type": "message", "subtype": "channel_join", "user": "U2", "text": "", "ts": "1514764801.000200"}
        ]"#,
    );
    write(
        &root.join("general/2018-01-02.json"),
        r#"[
          {"type": "message", "user": "U2", "text": "rust is great, you know", "ts": "1514851200.000100"},
          {"type": "message", "user": "U3", "text": "bye", "ts": "1514851300.000100"},
          {"type": "message", "user": "U9", "text": "who am i", "ts": "1514851400.000100"}
        ]"#,
    );
    write(&root.join("general/broken.json"), "[{");
}

#[test]
fn loader_reads_metadata_and_channel_days() {
    let tmp = tempfile::tempdir().unwrap();
    workspace(tmp.path());

    let users = load_users(tmp.path()).unwrap();
    assert_eq!(users.len(), 3);
    assert_eq!(users[1].display_name(), "bobby");
    assert!(users[2].deleted);

    let channels = load_channels(tmp.path()).unwrap();
    assert_eq!(channels.len(), 2);
    assert_eq!(channels[0].messages.len(), 5);
    assert!(channels[0]
        .messages
        .iter()
        .all(|m| m.channel.as_deref() == Some("general")));
    assert_eq!(channels[1].name, "random");
    assert!(channels[1].messages.is_empty());

    let all = read_all_messages(tmp.path()).unwrap();
    assert_eq!(all.len(), 5);
}

#[test]
fn workspace_report_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    workspace(tmp.path());
    let lex = Lexicon::embedded().unwrap();

    let users = load_users(tmp.path()).unwrap();
    let channels = load_channels(tmp.path()).unwrap();
    let analyzer = Analyzer::new(&lex, AnalysisOptions::for_mode(AnalysisMode::Channels));
    let now = DateTime::from_timestamp(1_600_000_000, 0).unwrap();
    let analysis = analyzer.run_channels_at(&users, &channels, now).unwrap();

    assert_eq!(analysis.summary.messages_seen, 5);
    assert_eq!(analysis.summary.skipped_empty, 1);
    assert_eq!(analysis.stats.overall().word_counts().get("rust"), Some(&2));

    let opts = ReportOptions {
        top_n: 3,
        include_common: false,
    };
    let report = channel_report(&analysis, &users, &channels, &lex, &opts);
    let names: Vec<&str> = report.users.iter().map(|u| u.name.as_str()).collect();
    // deleted U3 and unknown U9 are not reported per user
    assert_eq!(names, vec!["Ada Lovelace", "bobby"]);
    assert_eq!(report.channels.len(), 1);

    let overall = report.overall.as_ref().unwrap();
    assert_eq!(overall.totals.messages, 4);
    assert_eq!(overall.top_words[0].word, "rust");
    assert!(overall.top_words.len() <= 3);

    let text = render_text(&report);
    assert!(text.contains("Ada Lovelace"));
    assert!(text.contains("Total messages: 4"));

    let out = tempfile::tempdir().unwrap();
    let path = export_json(&report, out.path()).unwrap();
    assert_eq!(path, out.path().join("1600000000.json"));
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(json["channels"][0]["name"], "general");
    assert_eq!(json["summary"]["skipped_empty"], 1);
}

#[test]
fn message_file_report_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("messages.json");
    write(
        &file,
        r#"[
          {"type": "message", "user": "U1", "text": "ship it :rocket:", "ts": "1514764800.000100"},
          {"type": "message", "user": "U1", "text": "Again :rocket:", "ts": "1517443200.000100"},
          {"type": "message", "user": "U2", "text": "when?", "ts": "garbage"}
        ]"#,
    );
    let messages = read_messages_file(&file).unwrap();
    let lex = Lexicon::embedded().unwrap();
    let analyzer = Analyzer::new(&lex, AnalysisOptions::for_mode(AnalysisMode::Messages));
    let now = DateTime::from_timestamp(1_600_000_000, 0).unwrap();
    let analysis = analyzer.run_messages_at(&messages, now).unwrap();
    assert_eq!(analysis.summary.fallback_timestamps, 1);

    let report = message_report(&analysis, &[], &lex, &ReportOptions::default());
    let months: Vec<&str> = report.monthly.keys().map(String::as_str).collect();
    assert_eq!(months, vec!["2018-01", "2018-02", "2020-09"]);
    assert_eq!(
        report.overall.as_ref().unwrap().emoji_counts.get(":rocket:"),
        Some(&2)
    );
    // message mode keeps case
    assert!(report.users["U1"]
        .top_words
        .iter()
        .any(|w| w.word == "Again"));

    let path = export_json(&report, tmp.path()).unwrap();
    assert!(path.ends_with("1600000000.json"));
}

#[test]
fn malformed_message_file_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("messages.json");
    write(&file, r#"{"not": "an array"}"#);
    assert!(read_messages_file(&file).is_err());
}
