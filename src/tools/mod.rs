//! Tool system: the dispatch protocol between runs and external functions.

pub mod arguments;
pub mod dispatcher;
pub mod reddit;
pub mod tool;
pub mod types;

pub use arguments::ToolArguments;
pub use dispatcher::ToolDispatcher;
pub use tool::{FnTool, Tool};
pub use types::ToolParameters;
