//! Message records. Append-only; never mutated after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::conversation::{ConversationId, UserId};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// A suggested follow-up prompt attached to an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUp {
    pub question: String,
}

/// One message in a conversation.
///
/// `text` is raw input for user messages and rendered markup for assistant
/// messages. Follow-ups and citations are populated only for the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: ConversationId,
    pub sender: Sender,
    pub text: String,
    #[serde(default)]
    pub follow_up_questions: Vec<FollowUp>,
    #[serde(default)]
    pub citations: Vec<String>,
    pub user: UserId,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a user message with raw text.
    pub fn from_user(conversation_id: ConversationId, user: UserId, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            sender: Sender::User,
            text: text.into(),
            follow_up_questions: Vec::new(),
            citations: Vec::new(),
            user,
            created_at: Utc::now(),
        }
    }

    /// Create an assistant message with rendered markup.
    pub fn from_assistant(
        conversation_id: ConversationId,
        user: UserId,
        rendered: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            sender: Sender::Assistant,
            text: rendered.into(),
            follow_up_questions: Vec::new(),
            citations: Vec::new(),
            user,
            created_at: Utc::now(),
        }
    }
}
