// src/roster.rs
//! User and channel metadata from the export. Only identity, display name and
//! the deleted/archived flags matter to the engine; other fields are ignored.

use crate::message::Message;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub real_name: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub real_name: String,
    #[serde(default)]
    pub profile: Profile,
}

impl User {
    pub fn new(id: impl Into<String>, real_name: impl Into<String>) -> Self {
        let real_name = real_name.into();
        Self {
            id: id.into(),
            profile: Profile {
                real_name: real_name.clone(),
                display_name: String::new(),
            },
            real_name,
            ..Default::default()
        }
    }

    /// Real name, falling back to the display name, then the handle, then the id.
    pub fn display_name(&self) -> &str {
        [
            self.profile.real_name.as_str(),
            self.real_name.as_str(),
            self.profile.display_name.as_str(),
            self.name.as_str(),
        ]
        .into_iter()
        .find(|s| !s.trim().is_empty())
        .unwrap_or(self.id.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    /// Filled by the loader from the channel's directory.
    #[serde(skip)]
    pub messages: Vec<Message>,
}

impl Channel {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}
