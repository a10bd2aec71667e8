use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The author of a [`Message`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking questions.
    User,
    /// The coordinator's own answer.
    System,
}

/// A single turn in the coordinator's conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the turn's author.
    pub role: Role,
    /// The textual content of the turn.
    pub content: String,
    /// UTC timestamp of when the turn was recorded.
    pub timestamp: DateTime<Utc>,
    /// Arbitrary key-value metadata attached to the turn.
    #[serde(default)]
    pub meta: serde_json::Map<String, serde_json::Value>,
}

impl Message {
    /// Creates a new message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            meta: serde_json::Map::new(),
        }
    }

    /// Creates a new message with [`Role::User`].
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a new message with [`Role::System`].
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Attach metadata. Chainable builder method.
    pub fn with_meta(mut self, meta: serde_json::Map<String, serde_json::Value>) -> Self {
        self.meta = meta;
        self
    }
}
