//! Conversation facade: endpoint-shaped operations over the engine.
//!
//! `send_message` is the consolidated flow: validate, find-or-create the
//! conversation, reconcile stale runs, run the assistant to completion, and
//! stream the reply. Structured-data emission and reconciliation always
//! happen together; there is no reduced variant.

use std::sync::Arc;

use async_stream::stream;
use futures::{pin_mut, Stream, StreamExt};

use crate::backend::AssistantBackend;
use crate::config::ZorvaConfig;
use crate::error::{Result, ZorvaError};
use crate::render::{MarkupRenderer, PlainRenderer};
use crate::run::{RunDriver, RunOutcome, RunReconciler};
use crate::store::ConversationStore;
use crate::stream::{StreamEmitter, StreamEvent};
use crate::tools::ToolDispatcher;
use crate::types::{Conversation, ConversationId, Message, UserId};

/// How many of the thread's newest remote messages to scan for the reply.
const REPLY_LOOKUP_LIMIT: u32 = 20;

/// Maximum characters taken from the first message for an auto title.
const AUTO_TITLE_LEN: usize = 40;

/// The engine behind every conversation endpoint.
///
/// Holds one explicitly constructed client per collaborator; construct once
/// at startup and share (`Clone` is shallow).
#[derive(Clone)]
pub struct ChatEngine {
    config: ZorvaConfig,
    backend: Arc<dyn AssistantBackend>,
    dispatcher: ToolDispatcher,
    store: Arc<dyn ConversationStore>,
    renderer: Arc<dyn MarkupRenderer>,
}

impl ChatEngine {
    pub fn new(
        config: ZorvaConfig,
        backend: Arc<dyn AssistantBackend>,
        dispatcher: ToolDispatcher,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        Self {
            config,
            backend,
            dispatcher,
            store,
            renderer: Arc::new(PlainRenderer),
        }
    }

    /// Replace the markup renderer used for persisted assistant messages.
    pub fn with_renderer(mut self, renderer: Arc<dyn MarkupRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Create a conversation (and its remote thread) with an explicit title.
    pub async fn create_conversation(&self, user: &UserId, title: &str) -> Result<Conversation> {
        let thread_id = self.backend.create_thread().await?;
        let conversation =
            Conversation::new(ConversationId::new(thread_id), title, user.clone());
        self.store.create_conversation(conversation.clone()).await?;
        Ok(conversation)
    }

    /// All conversations owned by the user, newest first.
    pub async fn list_conversations(&self, user: &UserId) -> Result<Vec<Conversation>> {
        self.store.list_conversations(user).await
    }

    /// Messages of one conversation, oldest first.
    pub async fn list_messages(
        &self,
        user: &UserId,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>> {
        self.store.list_messages(conversation_id, user).await
    }

    /// Delete a conversation and all of its messages.
    pub async fn delete_conversation(
        &self,
        user: &UserId,
        conversation_id: &ConversationId,
    ) -> Result<()> {
        self.require_conversation(user, conversation_id).await?;
        self.store.delete_conversation(conversation_id, user).await
    }

    /// Rename a conversation. Empty titles are rejected.
    pub async fn rename_conversation(
        &self,
        user: &UserId,
        conversation_id: &ConversationId,
        title: &str,
    ) -> Result<()> {
        if title.trim().is_empty() {
            return Err(ZorvaError::Validation("Title cannot be empty".into()));
        }
        self.require_conversation(user, conversation_id).await?;
        self.store
            .rename_conversation(conversation_id, user, title)
            .await
    }

    /// Run one assistant turn and stream the reply.
    ///
    /// Empty text and unknown conversations are rejected up front, before
    /// any stream is opened or remote side effect happens. Every later
    /// failure — remote outage, tool failure, run timeout — surfaces inside
    /// the stream as a single `Error` event, so the stream always terminates
    /// with `Done` or `Error`.
    pub async fn send_message(
        &self,
        user: &UserId,
        conversation_id: Option<&ConversationId>,
        text: &str,
    ) -> Result<impl Stream<Item = StreamEvent> + Send> {
        if text.trim().is_empty() {
            return Err(ZorvaError::Validation("Text is required".into()));
        }

        // Conversation lookup fails the request before streaming side
        // effects; auto-creation is deferred into the stream since it needs
        // a remote call.
        let existing = match conversation_id {
            Some(id) => Some(self.require_conversation(user, id).await?),
            None => None,
        };

        let engine = self.clone();
        let user = user.clone();
        let text = text.to_string();

        Ok(stream! {
            let turn = engine.run_turn(&user, existing, &text).await;
            let (conversation, outcome, raw) = match turn {
                Ok(parts) => parts,
                Err(err) => {
                    tracing::error!(error = %err, "send-message flow failed");
                    yield StreamEvent::Error(err.to_string());
                    return;
                }
            };

            let emitter = StreamEmitter::new(&engine.config);
            let events = emitter.emit(outcome, raw.clone());
            pin_mut!(events);
            let mut done = false;
            while let Some(event) = events.next().await {
                done |= matches!(event, StreamEvent::Done);
                yield event;
            }

            // The rendered copy is persisted only after streaming completes.
            if done {
                let rendered = engine.renderer.render(&raw);
                let message =
                    Message::from_assistant(conversation.id.clone(), user.clone(), rendered);
                if let Err(err) = engine.store.append_message(message).await {
                    tracing::warn!(error = %err, "failed to persist assistant message");
                }
            }
        })
    }

    /// Everything between validation and emission: find-or-create the
    /// conversation, reconcile, persist and push the user message, drive
    /// the run, and fetch the assistant's reply text.
    async fn run_turn(
        &self,
        user: &UserId,
        existing: Option<Conversation>,
        text: &str,
    ) -> Result<(Conversation, RunOutcome, String)> {
        let conversation = match existing {
            Some(conversation) => conversation,
            None => {
                let title: String = text.chars().take(AUTO_TITLE_LEN).collect();
                self.create_conversation(user, &title).await?
            }
        };
        let thread_id = conversation.id.as_str();

        // A prior interrupted request may have left an active run behind;
        // the new run is created only after this attempt completes.
        RunReconciler::new(self.backend.clone(), &self.config)
            .reconcile(thread_id)
            .await?;

        self.store
            .append_message(Message::from_user(
                conversation.id.clone(),
                user.clone(),
                text,
            ))
            .await?;
        self.backend.create_message(thread_id, text).await?;

        let run = self.backend.create_run(thread_id).await?;
        let driver = RunDriver::new(self.backend.clone(), self.dispatcher.clone(), &self.config);
        let outcome = driver.drive(thread_id, &run.id).await?;

        let messages = self.backend.list_messages(thread_id, REPLY_LOOKUP_LIMIT).await?;
        let raw = messages
            .iter()
            .find(|m| m.role == "assistant")
            .and_then(|m| m.text())
            .unwrap_or_default()
            .to_string();

        Ok((conversation, outcome, raw))
    }

    async fn require_conversation(
        &self,
        user: &UserId,
        conversation_id: &ConversationId,
    ) -> Result<Conversation> {
        self.store
            .find_conversation(conversation_id, user)
            .await?
            .ok_or_else(|| {
                ZorvaError::NotFound(format!("conversation {conversation_id} not found"))
            })
    }
}

impl std::fmt::Debug for ChatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatEngine")
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
