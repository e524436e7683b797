//! Convenience re-exports for common `pare-rs` types.
//!
//! Meant to be glob-imported when wiring trimming into an agent loop:
//!
//! ```
//! use pare_rs::prelude::*;
//! ```
//!
//! This pulls in the message model, the trim entry point with its config,
//! and the token-counting seam. Specialized items ([`DEFAULT_CHARS_PER_TOKEN`](crate::context::DEFAULT_CHARS_PER_TOKEN),
//! [`DEFAULT_MESSAGES_TO_KEEP`](crate::context::DEFAULT_MESSAGES_TO_KEEP), the
//! classifier functions) are intentionally excluded — import those from
//! [`crate::context`] directly when needed.

// ── Message model ───────────────────────────────────────────────────
pub use crate::{Content, ContentBlock, Message, MessageRole, ToolCall};

// ── Trimming ────────────────────────────────────────────────────────
pub use crate::context::{TrimConfig, TrimStrategy, trim_messages};

// ── Token counting ──────────────────────────────────────────────────
pub use crate::context::{TokenCounter, TokenEstimator};
