//! Core data model: conversations, messages, runs, tool calls.

pub mod conversation;
pub mod message;
pub mod run;

pub use conversation::{Conversation, ConversationId, UserId};
pub use message::{FollowUp, Message, Sender};
pub use run::{RunStatus, ToolCall, ToolOutput};
