//! Budget-aware transcript trimming for LLM tool-use agents.
//!
//! `pare-rs` solves one problem well: given an ordered conversation
//! transcript that no longer fits a provider's context budget, select the
//! subsequence to send. The selection keeps the leading system/task
//! messages unconditionally, never separates a tool invocation from the
//! result that answers it, and never ends a trimmed request on an
//! unanswered invocation — the three ways a naive "drop oldest" loop
//! produces requests the provider rejects.
//!
//! Token counting is delegated: the caller supplies any
//! [`TokenCounter`](context::TokenCounter) — a tokenizer-backed counter, a
//! closure, or the stock [`TokenEstimator`](context::TokenEstimator)
//! heuristic — and trimming decisions are made against exact candidate
//! message lists, so non-additive counters (per-request formatting
//! overhead, message-list framing) are handled correctly.
//!
//! # Getting started
//!
//! ```
//! use pare_rs::prelude::*;
//!
//! let transcript = vec![
//!     Message::system("You are a careful coding assistant."),
//!     Message::user("Fix the failing test in src/lib.rs."),
//!     Message::assistant_tool_calls(vec![ToolCall::new("c1", "read_file", "{\"path\":\"src/lib.rs\"}")]),
//!     Message::tool_result("c1", "fn main() { ... }"),
//!     Message::assistant_text("The test expects a trailing newline."),
//! ];
//!
//! // Counter here is "one token per message" for brevity; real callers
//! // plug in a tokenizer or a TokenEstimator.
//! let config = TrimConfig::new(4);
//! let trimmed = trim_messages(&transcript, &config, &|m: &[Message]| m.len());
//!
//! assert_eq!(trimmed.len(), 3);
//! assert_eq!(trimmed[0].role, MessageRole::System);
//! ```
//!
//! # Where to find things
//!
//! - **Trim a transcript:** [`trim_messages`](context::trim_messages) with a
//!   [`TrimConfig`](context::TrimConfig). Strategy is
//!   [`TrimStrategy::Last`](context::TrimStrategy) (keep the most recent
//!   content) unless you opt into `First`.
//! - **Classify messages:** [`has_tool_use`](context::has_tool_use) and
//!   [`is_tool_pair`](context::is_tool_pair) — the same checks the trimmer
//!   uses, exported for callers that maintain their own transcript state.
//! - **Count tokens:** implement [`TokenCounter`](context::TokenCounter),
//!   pass a closure, or use [`TokenEstimator`](context::TokenEstimator)
//!   for a calibrated chars-per-token estimate.
//!
//! # Design principles
//!
//! 1. **Pairs move together.** An assistant invocation and its tool result
//!    are one atomic unit everywhere in selection. A transcript that splits
//!    them is not a valid request, so no budget pressure may split them.
//!
//! 2. **The prefix is sacred.** The leading window (system prompt + task
//!    setup) is emitted before any budget math runs, even when it alone
//!    exceeds the budget. Downstream callers rely on those messages being
//!    byte-identical on every request.
//!
//! 3. **Count the real list.** Every accept/reject decision re-counts the
//!    exact candidate message list rather than summing cached per-message
//!    costs, trading counter calls for correctness under counters whose
//!    cost is not additive.

pub mod context;
pub mod prelude;

use serde::{Deserialize, Serialize};

// Re-export the working surface at the crate root.
pub use context::{
    DEFAULT_CHARS_PER_TOKEN, TokenCounter, TokenEstimator, TrimConfig, TrimStrategy, has_tool_use,
    is_tool_pair, trim_messages,
};

// ── Message types ──────────────────────────────────────────────────

/// Role of a message in the conversation.
///
/// `Function` is the legacy function-calling result role; `Generic` covers
/// provider-specific roles that don't map onto the standard four. Both are
/// ordinary single messages to the trimmer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
    Function,
    Generic,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::Tool => write!(f, "tool"),
            MessageRole::Function => write!(f, "function"),
            MessageRole::Generic => write!(f, "generic"),
        }
    }
}

/// Message content: either plain text or a list of structured blocks.
///
/// Providers emit both shapes. Untagged serialization keeps the wire form
/// identical to what they send: a JSON string or a JSON array of blocks.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl Content {
    /// The plain-text form, if this content is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            Content::Blocks(_) => None,
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

/// A structured content block inside an assistant message.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text block.
    Text { text: String },
    /// A pending tool invocation embedded in content.
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
}

impl ContentBlock {
    /// Text block constructor.
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Tool-use block constructor.
    pub fn tool_use(
        id: impl Into<String>,
        name: impl Into<String>,
        input: serde_json::Value,
    ) -> Self {
        ContentBlock::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

/// A message in the conversation.
///
/// `tool_calls` is the auxiliary invocation list (function-calling wire
/// shape); assistant messages may instead carry invocations as
/// [`ContentBlock::ToolUse`] blocks. The trimmer checks both.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// For `Tool` messages: the id of the invocation this result answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<Content>) -> Self {
        Self {
            role: MessageRole::System,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<Content>) -> Self {
        Self {
            role: MessageRole::User,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn assistant_text(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: Some(Content::Text(content.into())),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Assistant message carrying invocations in the auxiliary list.
    pub fn assistant_tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: None,
            tool_calls: Some(calls),
            tool_call_id: None,
        }
    }

    /// Assistant message carrying structured content blocks.
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: Some(Content::Blocks(blocks)),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn tool_result(call_id: impl Into<String>, content: impl Into<Content>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(call_id.into()),
        }
    }

    /// Legacy function-calling result message.
    pub fn function_result(content: impl Into<Content>) -> Self {
        Self {
            role: MessageRole::Function,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Message with a provider-specific role.
    pub fn generic(content: impl Into<Content>) -> Self {
        Self {
            role: MessageRole::Generic,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// The plain-text content, if any.
    pub fn text(&self) -> Option<&str> {
        self.content.as_ref().and_then(Content::as_text)
    }
}

// ── Tool call types ────────────────────────────────────────────────

/// The type of a tool call. Currently always `Function`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum CallType {
    #[serde(rename = "function")]
    Function,
}

/// A tool invocation as returned by the model in the auxiliary list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: CallType,
    pub function: FunctionCallData,
}

impl ToolCall {
    /// Create a function tool call — `CallType` is always `Function` in the
    /// current wire format, so there's no reason to specify it manually.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            call_type: CallType::Function,
            function: FunctionCallData {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FunctionCallData {
    pub name: String,
    pub arguments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors() {
        let sys = Message::system("hello");
        assert_eq!(sys.role, MessageRole::System);
        assert_eq!(sys.text(), Some("hello"));

        let user = Message::user("world");
        assert_eq!(user.role, MessageRole::User);

        let assist = Message::assistant_text("thinking out loud");
        assert_eq!(assist.role, MessageRole::Assistant);
        assert!(assist.tool_calls.is_none());

        let tool = Message::tool_result("call-1", "result");
        assert_eq!(tool.role, MessageRole::Tool);
        assert_eq!(tool.tool_call_id.as_deref(), Some("call-1"));
    }

    #[test]
    fn text_content_serializes_as_plain_string() {
        let msg = Message::user("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["content"], "hi");
        assert!(json.get("tool_calls").is_none());
        assert!(json.get("tool_call_id").is_none());
    }

    #[test]
    fn block_content_serializes_as_tagged_array() {
        let msg = Message::assistant_blocks(vec![
            ContentBlock::text("I'll read the file."),
            ContentBlock::tool_use("c1", "read_file", serde_json::json!({"path": "src/lib.rs"})),
        ]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][1]["type"], "tool_use");
        assert_eq!(json["content"][1]["name"], "read_file");
    }

    #[test]
    fn content_roundtrips_both_shapes() {
        let text: Content = serde_json::from_str("\"plain\"").unwrap();
        assert_eq!(text.as_text(), Some("plain"));

        let blocks: Content =
            serde_json::from_str(r#"[{"type":"text","text":"hi"}]"#).unwrap();
        assert!(blocks.as_text().is_none());
        assert!(matches!(blocks, Content::Blocks(ref b) if b.len() == 1));
    }

    #[test]
    fn tool_call_wire_shape() {
        let call = ToolCall::new("c9", "grep", r#"{"pattern":"TODO"}"#);
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "grep");
    }

    #[test]
    fn role_display_matches_wire_names() {
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
        assert_eq!(MessageRole::Tool.to_string(), "tool");
        assert_eq!(MessageRole::Generic.to_string(), "generic");
    }
}
