//! Common imports for embedders.

pub use crate::backend::{openai::OpenAiBackend, AssistantBackend};
pub use crate::chat::ChatEngine;
pub use crate::config::ZorvaConfig;
pub use crate::error::{Result, ZorvaError};
pub use crate::render::{MarkupRenderer, PlainRenderer};
pub use crate::store::{ConversationStore, MemoryStore};
pub use crate::stream::StreamEvent;
pub use crate::tools::{FnTool, Tool, ToolDispatcher, ToolParameters};
pub use crate::types::{Conversation, ConversationId, Message, RunStatus, Sender, UserId};
