//! Notification formatting.

use crate::triage::types::{Category, Message, NotificationRecord};

/// Maximum preview length in chars, before the ellipsis.
pub const PREVIEW_CHARS: usize = 200;
const ELLIPSIS: &str = "...";

/// Build the compact display record for a message.
pub fn format_notification(message: &Message, category: Category) -> NotificationRecord {
    NotificationRecord {
        emoji: category.emoji().to_string(),
        category,
        sender: message
            .sender
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string()),
        subject: message
            .subject
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "(no subject)".to_string()),
        preview: preview(&message.body),
        received_at: Some(message.received_at),
        message_id: message.message_id.clone(),
    }
}

/// First 200 chars with line breaks flattened to spaces.
pub fn preview(body: &str) -> String {
    let mut out: String = body
        .chars()
        .take(PREVIEW_CHARS)
        .collect::<String>()
        .replace("\r\n", " ")
        .replace('\n', " ");
    if body.chars().count() >= PREVIEW_CHARS {
        out.push_str(ELLIPSIS);
    }
    out
}

impl NotificationRecord {
    /// Two-line human summary used on stderr.
    pub fn summary(&self) -> String {
        format!(
            "{} [{}] {}\n   {}",
            self.emoji,
            self.category.as_str().to_uppercase(),
            self.sender,
            self.subject
        )
    }
}
