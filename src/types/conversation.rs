//! Conversation records and identity newtypes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resolved user identity, supplied by an external identity collaborator.
///
/// The engine trusts it unconditionally; it is only used to scope lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Conversation identifier.
///
/// A conversation maps 1:1 to one remote thread, so this wraps the remote
/// thread id directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A conversation owned by one user.
///
/// Created on the first message when no id is supplied; immutable afterward
/// except for the title (rename) and deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    pub user: UserId,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(id: ConversationId, title: impl Into<String>, user: UserId) -> Self {
        Self {
            id,
            title: title.into(),
            user,
            created_at: Utc::now(),
        }
    }
}
