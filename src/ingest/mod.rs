// src/ingest/mod.rs
//! Reading chat exports from disk.

pub mod archive;

pub use archive::{
    filter_by_user, load_channels, load_users, read_all_messages, read_channel_messages,
    read_messages_file,
};

use metrics::describe_counter;
use once_cell::sync::OnceCell;

/// One-time metrics registration.
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "archive_files_read_total",
            "Daily message files parsed from channel directories."
        );
        describe_counter!(
            "archive_files_skipped_total",
            "Daily message files skipped as unreadable or malformed."
        );
    });
}
