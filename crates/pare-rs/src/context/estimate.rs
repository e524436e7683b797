//! The token-counting seam and a stock chars-per-token estimator.
//!
//! Trimming never counts tokens itself — the counter is a collaborator
//! supplied by the caller, because accurate counts are model-specific and
//! may require materializing the full serialized request. [`TokenCounter`]
//! is that seam; implement it, or pass a closure, or use
//! [`TokenEstimator`] when a heuristic is good enough to drive trimming.

use crate::{Content, ContentBlock, Message};

/// Default characters per token (conservative estimate for English text).
/// Most tokenizers average 3-4 chars per token; we use 3.5 as a middle ground.
pub const DEFAULT_CHARS_PER_TOKEN: f64 = 3.5;

/// Maps an ordered message list to a token count.
///
/// Counts must be computed for the exact list given: the trimmer calls this
/// on whole candidate transcripts, never on messages in isolation, so
/// implementations are free to charge per-request framing overhead.
pub trait TokenCounter {
    fn count(&self, messages: &[Message]) -> usize;
}

impl<F> TokenCounter for F
where
    F: Fn(&[Message]) -> usize,
{
    fn count(&self, messages: &[Message]) -> usize {
        self(messages)
    }
}

/// Heuristic token counter: total content characters over a
/// chars-per-token ratio.
///
/// Counts visible text, structured block text, serialized tool-use inputs,
/// auxiliary tool-call names and arguments, and result back-references.
/// The ratio can be calibrated from observed API usage data.
///
/// # Example
///
/// ```
/// use pare_rs::{Message, TokenEstimator, TokenCounter};
///
/// let estimator = TokenEstimator::new();
/// let messages = vec![Message::user("Summarize src/lib.rs for me.")];
/// assert!(estimator.count(&messages) > 0);
/// ```
#[derive(Debug, Clone)]
pub struct TokenEstimator {
    chars_per_token: f64,
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenEstimator {
    /// Estimator with the default chars-per-token ratio.
    pub fn new() -> Self {
        Self {
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
        }
    }

    /// Estimator with a ratio calibrated from historical API usage data.
    /// Pass `None` to use the default.
    pub fn with_calibration(calibrated_cpt: Option<f64>) -> Self {
        Self {
            chars_per_token: calibrated_cpt.unwrap_or(DEFAULT_CHARS_PER_TOKEN),
        }
    }

    /// Override the chars-per-token ratio.
    pub fn with_chars_per_token(mut self, ratio: f64) -> Self {
        self.chars_per_token = ratio;
        self
    }

    /// Character weight of one message across all payload fields.
    fn message_chars(message: &Message) -> usize {
        let mut chars = 0;

        match &message.content {
            Some(Content::Text(text)) => chars += text.len(),
            Some(Content::Blocks(blocks)) => {
                for block in blocks {
                    match block {
                        ContentBlock::Text { text } => chars += text.len(),
                        ContentBlock::ToolUse { id, name, input } => {
                            chars += id.len() + name.len();
                            chars += serde_json::to_string(input).map_or(0, |s| s.len());
                        }
                    }
                }
            }
            None => {}
        }

        if let Some(calls) = &message.tool_calls {
            for call in calls {
                chars += call.id.len() + call.function.name.len() + call.function.arguments.len();
            }
        }

        if let Some(id) = &message.tool_call_id {
            chars += id.len();
        }

        chars
    }
}

impl TokenCounter for TokenEstimator {
    fn count(&self, messages: &[Message]) -> usize {
        let total_chars: usize = messages.iter().map(Self::message_chars).sum();
        (total_chars as f64 / self.chars_per_token) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolCall;

    #[test]
    fn empty_list_counts_zero() {
        assert_eq!(TokenEstimator::new().count(&[]), 0);
    }

    #[test]
    fn text_scales_with_length() {
        let estimator = TokenEstimator::new();
        let short = vec![Message::user("hi")];
        let long = vec![Message::user("a".repeat(7_000))];
        assert!(estimator.count(&long) > estimator.count(&short));
        // 7000 chars at 3.5 chars/token → 2000 tokens.
        assert_eq!(estimator.count(&long), 2_000);
    }

    #[test]
    fn calibrated_ratio_changes_the_estimate() {
        let messages = vec![Message::user("a".repeat(4_000))];
        let default = TokenEstimator::with_calibration(None);
        let calibrated = TokenEstimator::with_calibration(Some(4.0));
        assert!(calibrated.count(&messages) < default.count(&messages));
    }

    #[test]
    fn tool_payloads_are_counted() {
        let estimator = TokenEstimator::new();
        let bare = vec![Message::assistant_tool_calls(vec![])];
        let with_call = vec![Message::assistant_tool_calls(vec![ToolCall::new(
            "call-1",
            "read_file",
            r#"{"path": "a/long/path/into/the/repo.rs"}"#,
        )])];
        assert!(estimator.count(&with_call) > estimator.count(&bare));
    }

    #[test]
    fn block_content_is_counted() {
        let estimator = TokenEstimator::new();
        let msg = Message::assistant_blocks(vec![
            crate::ContentBlock::text("x".repeat(700)),
            crate::ContentBlock::tool_use("c1", "grep", serde_json::json!({"pattern": "fn "})),
        ]);
        assert!(estimator.count(&[msg]) >= 200);
    }

    #[test]
    fn closures_satisfy_the_counter_seam() {
        let by_len = |messages: &[Message]| messages.len() * 10;
        let messages = vec![Message::user("one"), Message::user("two")];
        assert_eq!(by_len.count(&messages), 20);
    }
}
