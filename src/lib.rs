//! Zorva — run-orchestration engine for a tool-calling assistant backend.
//!
//! Drives a single assistant "run" from creation through tool-call servicing
//! to completion against a remote assistant-run backend, reconciles stale
//! runs so a conversation never has more than one active run, and streams
//! the finished reply back to the caller token by token.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use futures::StreamExt;
//! use zorva::chat::ChatEngine;
//! use zorva::config::ZorvaConfig;
//! use zorva::backend::openai::OpenAiBackend;
//! use zorva::store::MemoryStore;
//! use zorva::tools::ToolDispatcher;
//! use zorva::types::UserId;
//!
//! # async fn example() -> zorva::error::Result<()> {
//! let config = ZorvaConfig::from_env()?;
//! let backend = Arc::new(OpenAiBackend::new(&config));
//! let tools = ToolDispatcher::new(Vec::new());
//! let engine = ChatEngine::new(config, backend, tools, Arc::new(MemoryStore::new()));
//!
//! let user = UserId::new("user-1");
//! let stream = engine.send_message(&user, None, "What's the pulse on rust?").await?;
//! futures::pin_mut!(stream);
//! while let Some(event) = stream.next().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod prelude;
pub mod render;
pub mod run;
pub mod store;
pub mod stream;
pub mod tools;
pub mod types;
