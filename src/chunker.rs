//! Word-budget chunking of section bodies.

/// Default budget, in whitespace-delimited tokens, for a single chunk.
pub const DEFAULT_MAX_TOKENS: usize = 1000;

/// Split `text` into ordered chunks of at most `max_tokens` words each.
///
/// Tokens are never split, so a budget of zero behaves like a budget of one.
/// Empty or whitespace-only input yields no chunks at all.
pub fn chunk_text(text: &str, max_tokens: usize) -> Vec<String> {
    let budget = max_tokens.max(1);
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::with_capacity(budget.min(1024));

    for word in text.split_whitespace() {
        if current.len() + 1 > budget {
            chunks.push(current.join(" "));
            current.clear();
        }
        current.push(word);
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

/// Number of whitespace-delimited words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
