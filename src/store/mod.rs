//! Persistence collaborator boundary for conversation and message records.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::types::{Conversation, ConversationId, Message, UserId};

/// Create/find/delete access to conversation and message records, keyed by
/// conversation identifier and user identity.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn create_conversation(&self, conversation: Conversation) -> Result<()>;

    async fn find_conversation(
        &self,
        id: &ConversationId,
        user: &UserId,
    ) -> Result<Option<Conversation>>;

    /// All conversations for a user, newest first.
    async fn list_conversations(&self, user: &UserId) -> Result<Vec<Conversation>>;

    async fn rename_conversation(
        &self,
        id: &ConversationId,
        user: &UserId,
        title: &str,
    ) -> Result<()>;

    /// Delete a conversation and all of its messages.
    async fn delete_conversation(&self, id: &ConversationId, user: &UserId) -> Result<()>;

    /// Append-only message insert.
    async fn append_message(&self, message: Message) -> Result<()>;

    /// Messages of one conversation, oldest first.
    async fn list_messages(&self, id: &ConversationId, user: &UserId) -> Result<Vec<Message>>;
}

/// In-memory store for tests and embedders without a database.
#[derive(Default)]
pub struct MemoryStore {
    conversations: RwLock<HashMap<ConversationId, Conversation>>,
    messages: RwLock<Vec<Message>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn create_conversation(&self, conversation: Conversation) -> Result<()> {
        self.conversations
            .write()
            .await
            .insert(conversation.id.clone(), conversation);
        Ok(())
    }

    async fn find_conversation(
        &self,
        id: &ConversationId,
        user: &UserId,
    ) -> Result<Option<Conversation>> {
        Ok(self
            .conversations
            .read()
            .await
            .get(id)
            .filter(|c| &c.user == user)
            .cloned())
    }

    async fn list_conversations(&self, user: &UserId) -> Result<Vec<Conversation>> {
        let mut conversations: Vec<_> = self
            .conversations
            .read()
            .await
            .values()
            .filter(|c| &c.user == user)
            .cloned()
            .collect();
        conversations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(conversations)
    }

    async fn rename_conversation(
        &self,
        id: &ConversationId,
        user: &UserId,
        title: &str,
    ) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        if let Some(conversation) = conversations.get_mut(id).filter(|c| &c.user == user) {
            conversation.title = title.to_string();
        }
        Ok(())
    }

    async fn delete_conversation(&self, id: &ConversationId, user: &UserId) -> Result<()> {
        let removed = {
            let mut conversations = self.conversations.write().await;
            match conversations.get(id) {
                Some(c) if &c.user == user => {
                    conversations.remove(id);
                    true
                }
                _ => false,
            }
        };
        if removed {
            self.messages
                .write()
                .await
                .retain(|m| &m.conversation_id != id);
        }
        Ok(())
    }

    async fn append_message(&self, message: Message) -> Result<()> {
        self.messages.write().await.push(message);
        Ok(())
    }

    async fn list_messages(&self, id: &ConversationId, user: &UserId) -> Result<Vec<Message>> {
        let mut messages: Vec<_> = self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| &m.conversation_id == id && &m.user == user)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }
}
