use crate::error::Result;
use crate::traits::{ChatClient, ChatRequest};
use crate::types::Message;

/// Title instruction for one exchange, filled in a single pass so braces in
/// either text are kept as written
pub fn title_prompt(user_message: &str, assistant_response: &str) -> String {
    format!(
        "Based on this conversation, generate a very short title (max 5 words) that summarizes the topic.
Only respond with the title, nothing else. No quotes, no explanation.

User message: {}
Assistant response: {}",
        user_message, assistant_response
    )
}

const MAX_INPUT_CHARS: usize = 500;
const MAX_TITLE_WORDS: usize = 6;
const MAX_TITLE_CHARS: usize = 100;

/// Ask the model for a short thread title summarizing one exchange.
pub async fn generate_title(
    client: &dyn ChatClient,
    model: &str,
    user_message: &str,
    assistant_response: &str,
) -> Result<String> {
    let prompt = title_prompt(
        &truncate_chars(user_message, MAX_INPUT_CHARS),
        &truncate_chars(assistant_response, MAX_INPUT_CHARS),
    );

    let response = client
        .chat(ChatRequest::new(model, vec![Message::human(prompt)]))
        .await?;

    Ok(truncate_title(response.text()))
}

/// Trim, keep the first six words, cap at 100 characters
pub fn truncate_title(raw: &str) -> String {
    let words: Vec<&str> = raw.split_whitespace().collect();
    let title = if words.len() > MAX_TITLE_WORDS {
        words[..MAX_TITLE_WORDS].join(" ")
    } else {
        raw.trim().to_string()
    };

    truncate_chars(&title, MAX_TITLE_CHARS)
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
