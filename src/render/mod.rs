//! Markup rendering boundary.
//!
//! Streamed tokens are always plain text; only the persisted assistant
//! message goes through the renderer. The rendering algorithm itself is an
//! external collaborator.

/// Renders raw assistant text into persisted markup.
pub trait MarkupRenderer: Send + Sync {
    fn render(&self, raw: &str) -> String;
}

/// Identity renderer; persists the raw text unchanged.
#[derive(Debug, Default)]
pub struct PlainRenderer;

impl MarkupRenderer for PlainRenderer {
    fn render(&self, raw: &str) -> String {
        raw.to_string()
    }
}
