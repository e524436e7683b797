//! Transcript trimming that keeps tool call/result pairs intact.
//!
//! Dropping arbitrary messages from a tool-use conversation produces
//! requests providers reject: a tool result whose invocation is gone, or a
//! transcript that ends on an invocation nothing answers. This module trims
//! by *segment* instead — a segment is either a lone message or an adjacent
//! (invocation, result) pair — so no budget decision can ever split a pair.
//!
//! Selection runs in one synchronous pass: short-circuit if the transcript
//! already fits, resolve the always-kept prefix (widening by one if the
//! boundary would land inside a pair), segment the remainder, then fill the
//! remaining budget from the chosen end of the conversation.

use crate::{Content, ContentBlock, Message, MessageRole};
use crate::context::TokenCounter;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Number of leading messages kept unconditionally by default — typically
/// the system prompt and the initial user task.
pub const DEFAULT_MESSAGES_TO_KEEP: usize = 2;

/// Marker scanned for in plain-text assistant content. Legacy transcripts
/// flatten structured blocks into serialized text; the marker scan keeps
/// those classifiable as pending invocations.
const TOOL_USE_MARKER: &str = "tool_use";

// ── Configuration ──────────────────────────────────────────────────

/// Which end of the transcript survives when content must be dropped.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrimStrategy {
    /// Keep the most recent content. The robust path for agent history.
    #[default]
    Last,
    /// Keep the earliest content.
    First,
}

/// Configuration for [`trim_messages`].
#[derive(Debug, Clone)]
pub struct TrimConfig {
    /// Token ceiling for the entire output transcript.
    pub max_tokens: usize,
    /// Which end of the transcript to preserve.
    pub strategy: TrimStrategy,
    /// Number of leading messages always kept, budget notwithstanding.
    pub num_messages_to_keep: usize,
    /// Reserved. Accepted for API compatibility; the current selector keeps
    /// the leading window regardless of role.
    pub include_system: bool,
}

impl TrimConfig {
    /// Create a config with the given token ceiling and default policy:
    /// [`TrimStrategy::Last`], first [`DEFAULT_MESSAGES_TO_KEEP`] messages
    /// kept.
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            strategy: TrimStrategy::default(),
            num_messages_to_keep: DEFAULT_MESSAGES_TO_KEEP,
            include_system: true,
        }
    }

    /// Set the trimming strategy.
    pub fn with_strategy(mut self, strategy: TrimStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set how many leading messages are always kept.
    pub fn with_messages_to_keep(mut self, count: usize) -> Self {
        self.num_messages_to_keep = count;
        self
    }
}

// ── Classifier ─────────────────────────────────────────────────────

/// Whether a message carries at least one pending tool invocation.
///
/// True only for assistant messages. All three invocation representations
/// are checked: the legacy marker in plain text, [`ContentBlock::ToolUse`]
/// blocks, and a non-empty auxiliary `tool_calls` list.
pub fn has_tool_use(message: &Message) -> bool {
    if message.role != MessageRole::Assistant {
        return false;
    }

    match &message.content {
        Some(Content::Text(text)) => {
            if text.contains(TOOL_USE_MARKER) {
                return true;
            }
        }
        Some(Content::Blocks(blocks)) => {
            if blocks
                .iter()
                .any(|block| matches!(block, ContentBlock::ToolUse { .. }))
            {
                return true;
            }
        }
        None => {}
    }

    message
        .tool_calls
        .as_ref()
        .is_some_and(|calls| !calls.is_empty())
}

/// Whether two adjacent messages form an (invocation, result) pair.
///
/// Pairing is positional: the result's `tool_call_id` is not matched
/// against the invocation ids. Adjacency and kind alone qualify.
pub fn is_tool_pair(first: &Message, second: &Message) -> bool {
    first.role == MessageRole::Assistant && second.role == MessageRole::Tool && has_tool_use(first)
}

// ── Segmenter ──────────────────────────────────────────────────────

/// Partition the post-prefix remainder into atomic segments: an adjacent
/// tool pair, or a single message. Concatenating the segments in order
/// reproduces the remainder exactly.
fn segments(remainder: &[Message]) -> Vec<&[Message]> {
    let mut segs = Vec::new();
    let mut i = 0;
    while i < remainder.len() {
        if i + 1 < remainder.len() && is_tool_pair(&remainder[i], &remainder[i + 1]) {
            segs.push(&remainder[i..i + 2]);
            i += 2;
        } else {
            segs.push(&remainder[i..i + 1]);
            i += 1;
        }
    }
    segs
}

// ── Selector ───────────────────────────────────────────────────────

/// Trim a transcript to fit a token budget without breaking tool pairs.
///
/// Returns the input unchanged when it already fits. Otherwise the first
/// `num_messages_to_keep` messages (one more if that boundary would split a
/// tool pair) are kept unconditionally — even when they alone exceed the
/// budget — and the remainder is filled segment by segment from the end
/// selected by [`TrimStrategy`]. Under `Last`, a trailing unanswered
/// invocation left by selection is dropped.
///
/// The counter is invoked on exact candidate lists at every step, so
/// counters with non-additive cost (framing overhead that depends on the
/// whole list) still produce correct selections. Worst case that is
/// O(segments²) counter calls.
///
/// The function is total: any well-formed transcript and config produce a
/// result, degrading to prefix-only output under a budget nothing else
/// fits in.
pub fn trim_messages<C>(messages: &[Message], config: &TrimConfig, counter: &C) -> Vec<Message>
where
    C: TokenCounter + ?Sized,
{
    if messages.is_empty() {
        return Vec::new();
    }

    let initial_tokens = counter.count(messages);
    if initial_tokens <= config.max_tokens {
        return messages.to_vec();
    }

    debug!(
        "trimming transcript: initial_tokens={}, max_tokens={}, messages={}",
        initial_tokens,
        config.max_tokens,
        messages.len()
    );

    // Widen the prefix by one if the boundary would split a tool pair.
    let mut keep = config.num_messages_to_keep;
    if keep > 0 && messages.len() > keep && is_tool_pair(&messages[keep - 1], &messages[keep]) {
        keep += 1;
    }
    let keep = keep.min(messages.len());

    let (kept, remainder) = messages.split_at(keep);
    let kept_tokens = counter.count(kept);
    debug!(
        "keeping first {} messages unconditionally, tokens={}",
        kept.len(),
        kept_tokens
    );

    let segments = segments(remainder);

    match config.strategy {
        TrimStrategy::Last => {
            // Fill from the newest segment backwards. `result` stays in
            // chronological order; each accepted segment goes on the front.
            let mut result: Vec<Message> = Vec::new();
            for segment in segments.iter().rev() {
                let segment_tokens = counter.count(segment);
                let result_tokens = counter.count(&result);
                if kept_tokens + segment_tokens + result_tokens > config.max_tokens {
                    // Older segments are never reconsidered: re-admitting a
                    // smaller one after a rejection would open a gap in the
                    // conversation.
                    debug!(
                        "segment of {} messages ({} tokens) does not fit: {} > {}, stopping",
                        segment.len(),
                        segment_tokens,
                        kept_tokens + segment_tokens + result_tokens,
                        config.max_tokens
                    );
                    break;
                }
                trace!(
                    "accepting segment of {} messages ({} tokens)",
                    segment.len(),
                    segment_tokens
                );
                let mut with_segment = segment.to_vec();
                with_segment.append(&mut result);
                result = with_segment;
            }

            let mut output = kept.to_vec();
            output.append(&mut result);

            // A lone assistant invocation can survive selection when its
            // result was rejected as a separate segment (or never existed).
            // An unanswered invocation at the tail is an invalid request.
            if output.last().is_some_and(has_tool_use) {
                output.pop();
            }

            debug!(
                "trimming complete: {} messages, final_tokens={}",
                output.len(),
                counter.count(&output)
            );
            output
        }
        TrimStrategy::First => {
            // Fill from the earliest segment forwards. The candidate list is
            // assembled in place and rolled back when a segment doesn't fit.
            let mut output = kept.to_vec();
            for segment in &segments {
                let len_before = output.len();
                output.extend(segment.iter().cloned());
                if counter.count(&output) > config.max_tokens {
                    output.truncate(len_before);
                    break;
                }
            }
            output
        }
    }
}
