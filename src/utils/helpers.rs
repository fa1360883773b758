use crate::llm::ChatMessage;

use tracing::debug;

/// Splits `text` into chunks of at most `chunk_size` characters, consecutive
/// chunks sharing `overlap` characters. Whitespace-only chunks are dropped.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chunk_size == 0 || chars.is_empty() {
        return Vec::new();
    }
    let step = chunk_size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let chunk: String = chars[start..end].iter().collect();
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}

/// Truncates `text` to `limit` characters, marking the cut
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(limit).collect();
    truncated.push_str("\n[...truncated]");
    truncated
}

/// Keeps a conversation under `char_limit` characters.
///
/// The first `keep_leading` messages (system prompt, task prompt) are always
/// kept; the oldest messages after them are dropped first and, as a last
/// resort, the latest message is truncated.
///
/// # Returns
/// * `bool` - True if messages were modified, False otherwise
pub fn manage_token_count(
    messages: &mut Vec<ChatMessage>,
    char_limit: usize,
    keep_leading: usize,
) -> bool {
    let mut total: usize = messages
        .iter()
        .map(|msg| msg.content.chars().count())
        .sum();

    if total < char_limit {
        return false;
    }

    let first_removable = keep_leading.min(messages.len());
    while total >= char_limit && messages.len() > first_removable + 1 {
        let removed = messages.remove(first_removable);
        total -= removed.content.chars().count();
        debug!(
            "Removed old message to reduce conversation size. Remaining messages: {}",
            messages.len()
        );
    }

    if total >= char_limit && messages.len() > first_removable {
        let last_len = messages.last().map(|m| m.content.chars().count()).unwrap_or(0);
        let budget = char_limit.saturating_sub(total - last_len);
        if let Some(last_msg) = messages.last_mut() {
            last_msg.content = last_msg.content.chars().take(budget).collect::<String>();
            debug!("Truncated last message to fit conversation limit");
        }
    }
    true
}
