//! Token-streaming delivery: event types, tokenizer, and emitter.

pub mod sse;

use std::time::Duration;

use async_stream::stream;
use futures::Stream;

use crate::config::ZorvaConfig;
use crate::run::RunOutcome;
use crate::types::RunStatus;

/// One event in the caller-facing stream.
///
/// A stream always ends with exactly one `Done` or one `Error`, never
/// silently.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Structured tool payload, emitted before any text.
    Data(serde_json::Value),
    /// One text token (whitespace runs are tokens of their own).
    Token(String),
    /// Terminal failure; no partial text precedes it.
    Error(String),
    /// Terminal success marker.
    Done,
}

/// Split text into tokens at whitespace boundaries, keeping whitespace runs
/// as their own tokens so concatenation reproduces the input byte-for-byte.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_whitespace = None;

    for (i, c) in text.char_indices() {
        let ws = c.is_whitespace();
        match in_whitespace {
            None => in_whitespace = Some(ws),
            Some(prev) if prev != ws => {
                tokens.push(&text[start..i]);
                start = i;
                in_whitespace = Some(ws);
            }
            _ => {}
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Turns a finished run into the ordered caller-facing event sequence.
pub struct StreamEmitter {
    token_delay: Duration,
}

impl StreamEmitter {
    pub fn new(config: &ZorvaConfig) -> Self {
        Self {
            token_delay: config.token_delay,
        }
    }

    /// Emit the event sequence for a finished run.
    ///
    /// Ordering contract: on a non-`Completed` status or empty text, a
    /// single `Error` and nothing else. Otherwise: one `Data` event if the
    /// first tool output parses as JSON, then one `Token` per token of the
    /// text in original order (a small delay between tokens gives the
    /// perceived typing effect), then `Done`.
    pub fn emit(
        &self,
        outcome: RunOutcome,
        text: String,
    ) -> impl Stream<Item = StreamEvent> + Send {
        let delay = self.token_delay;
        stream! {
            if outcome.status != RunStatus::Completed {
                yield StreamEvent::Error(format!("Run ended with status {}", outcome.status));
                return;
            }
            if text.trim().is_empty() {
                yield StreamEvent::Error("No assistant response".to_string());
                return;
            }

            if let Some(first) = outcome.tool_outputs.first() {
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(&first.output) {
                    yield StreamEvent::Data(value);
                }
            }

            let tokens: Vec<String> = tokenize(&text).into_iter().map(str::to_string).collect();
            for token in tokens {
                yield StreamEvent::Token(token);
                tokio::time::sleep(delay).await;
            }

            yield StreamEvent::Done;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;

    use crate::types::ToolOutput;

    fn emitter() -> StreamEmitter {
        StreamEmitter::new(&ZorvaConfig::new("sk-test", "asst_1").with_token_delay(Duration::ZERO))
    }

    fn completed(outputs: Vec<ToolOutput>) -> RunOutcome {
        RunOutcome {
            status: RunStatus::Completed,
            tool_outputs: outputs,
        }
    }

    #[test]
    fn tokenize_keeps_whitespace_runs() {
        assert_eq!(tokenize("hello  world"), vec!["hello", "  ", "world"]);
    }

    #[test]
    fn tokenize_round_trips_exactly() {
        let samples = [
            "hello  world",
            "  leading and trailing  ",
            "one\ntwo\t\tthree",
            "no-whitespace",
            "",
            "   ",
            "a b",
        ];
        for text in samples {
            let rebuilt: String = tokenize(text).concat();
            assert_eq!(rebuilt, text, "round trip failed for {text:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn emits_tokens_in_order_then_done() {
        let events: Vec<_> = emitter()
            .emit(completed(vec![]), "hello  world".to_string())
            .collect()
            .await;

        assert_eq!(
            events,
            vec![
                StreamEvent::Token("hello".into()),
                StreamEvent::Token("  ".into()),
                StreamEvent::Token("world".into()),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_run_emits_single_error() {
        let outcome = RunOutcome {
            status: RunStatus::Failed,
            tool_outputs: vec![ToolOutput {
                tool_call_id: "call_1".into(),
                output: "{\"x\":1}".into(),
            }],
        };
        let events: Vec<_> = emitter().emit(outcome, "some text".to_string()).collect().await;

        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], StreamEvent::Error(msg) if msg.contains("failed")));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_text_emits_single_error() {
        let events: Vec<_> = emitter()
            .emit(completed(vec![]), "   \n ".to_string())
            .collect()
            .await;
        assert_eq!(
            events,
            vec![StreamEvent::Error("No assistant response".into())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn structured_data_precedes_tokens() {
        let outcome = completed(vec![ToolOutput {
            tool_call_id: "call_1".into(),
            output: "{\"keyword\":\"rust\"}".into(),
        }]);
        let events: Vec<_> = emitter().emit(outcome, "ok".to_string()).collect().await;

        assert_eq!(events[0], StreamEvent::Data(serde_json::json!({"keyword": "rust"})));
        assert_eq!(events[1], StreamEvent::Token("ok".into()));
        assert_eq!(events.last(), Some(&StreamEvent::Done));
    }

    #[tokio::test(start_paused = true)]
    async fn unparseable_tool_output_is_skipped() {
        let outcome = completed(vec![ToolOutput {
            tool_call_id: "call_1".into(),
            output: "not json".into(),
        }]);
        let events: Vec<_> = emitter().emit(outcome, "ok".to_string()).collect().await;
        assert!(!events.iter().any(|e| matches!(e, StreamEvent::Data(_))));
        assert_eq!(events.last(), Some(&StreamEvent::Done));
    }
}
