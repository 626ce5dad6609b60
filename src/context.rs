//! Rolling buffer of captured command output.
//!
//! In context mode, stdout from each executed command is fed back into the
//! prompt of subsequent generations so the model can react to earlier results.
//! The buffer keeps roughly the last [`CONTEXT_TOKEN_BUDGET`] tokens, where a
//! token is approximated as one whitespace-delimited word.

/// Approximate number of tokens retained from previous command output.
pub const CONTEXT_TOKEN_BUDGET: usize = 1500;

/// Accumulates command output across one session.
///
/// The buffer distinguishes "nothing captured yet" from "an empty output was
/// captured": [`ContextBuffer::get_context`] returns `None` only before the
/// first [`ContextBuffer::add_chunk`] call.
#[derive(Debug, Default)]
pub struct ContextBuffer {
    contents: Option<String>,
}

impl ContextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends captured output, evicting the oldest words once the buffer
    /// exceeds the token budget.
    pub fn add_chunk(&mut self, text: &str) {
        let contents = self.contents.get_or_insert_with(String::new);
        contents.push_str(text);

        let excess = {
            let words = contents.split_whitespace().count();
            words.saturating_sub(CONTEXT_TOKEN_BUDGET)
        };
        if excess > 0 {
            let trimmed: Vec<&str> = contents.split_whitespace().skip(excess).collect();
            *contents = trimmed.join(" ");
        }
    }

    /// Returns the buffered output, or `None` when nothing has been captured.
    pub fn get_context(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}
