//! Trim an over-budget tool-use transcript and print what survives.
//!
//! Run with debug logging to watch the selection decisions:
//!
//! ```sh
//! cargo run --example trim_transcript
//! ```

use pare_rs::prelude::*;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let transcript = vec![
        Message::system("You are a careful coding assistant."),
        Message::user("Why does `cargo test` fail on main?"),
        Message::assistant_tool_calls(vec![ToolCall::new(
            "call-1",
            "run_tests",
            r#"{"filter": ""}"#,
        )]),
        Message::tool_result("call-1", "test result: FAILED. 1 passed; 1 failed.\n".repeat(40)),
        Message::assistant_tool_calls(vec![ToolCall::new(
            "call-2",
            "read_file",
            r#"{"path": "src/lib.rs"}"#,
        )]),
        Message::tool_result("call-2", "pub fn add(a: u32, b: u32) -> u32 { a + b }\n".repeat(30)),
        Message::assistant_text(
            "The failure is an overflow in `add` — the test feeds u32::MAX. \
             I'll switch to checked_add and return an Option.",
        ),
    ];

    let estimator = TokenEstimator::new();
    let before = estimator.count(&transcript);

    let config = TrimConfig::new(400);
    let trimmed = trim_messages(&transcript, &config, &estimator);
    let after = estimator.count(&trimmed);

    println!("before: {} messages, ~{before} tokens", transcript.len());
    println!("after:  {} messages, ~{after} tokens", trimmed.len());
    for msg in &trimmed {
        let preview: String = msg
            .text()
            .unwrap_or("[tool invocation]")
            .chars()
            .take(60)
            .collect();
        println!("  [{}] {}", msg.role, preview);
    }
}
