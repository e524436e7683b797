//! Context trimming: budget-aware transcript selection for tool-use agents.
//!
//! Two submodules, composed in one synchronous pass:
//!
//! 1. **[`trim`]** — the selection algorithm. Classifies pending tool
//!    invocations, segments the transcript into atomic units (a lone
//!    message, or an adjacent invocation/result pair), keeps the leading
//!    prefix unconditionally, and fills the remaining budget from the end
//!    chosen by [`TrimStrategy`].
//!
//! 2. **[`estimate`]** — the [`TokenCounter`] seam the algorithm counts
//!    with, and [`TokenEstimator`], the stock chars-per-token heuristic for
//!    callers without a tokenizer in the loop.

pub mod estimate;
pub mod trim;

// Re-export commonly used items at the module level.
pub use estimate::{DEFAULT_CHARS_PER_TOKEN, TokenCounter, TokenEstimator};
pub use trim::{
    DEFAULT_MESSAGES_TO_KEEP, TrimConfig, TrimStrategy, has_tool_use, is_tool_pair, trim_messages,
};
