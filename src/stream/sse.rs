//! Text event-stream wire encoding.
//!
//! One event per line-pair `event:<name>\ndata:<payload>\n\n`; tokens ride
//! on unnamed default events.

use super::StreamEvent;

/// Sentinel payload for the terminal `done` event.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Encode one stream event into its wire form.
pub fn encode(event: &StreamEvent) -> String {
    match event {
        StreamEvent::Data(value) => {
            let payload = serde_json::json!({ "structured": value });
            format!("event:data\ndata: {payload}\n\n")
        }
        StreamEvent::Token(token) => format!("data: {token}\n\n"),
        StreamEvent::Error(message) => format!("event:error\ndata:{message}\n\n"),
        StreamEvent::Done => format!("event:done\ndata:{DONE_SENTINEL}\n\n"),
    }
}
