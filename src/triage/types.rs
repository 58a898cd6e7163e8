//! Shared types for the triage pipeline.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── Message ─────────────────────────────────────────────────────────

/// A fetched mail message.
///
/// Produced by a `MailSource` or deserialized from CLI input, where it uses
/// the `{ "from", "subject", "body" }` shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Opaque source identifier (IMAP UID, or caller-supplied).
    #[serde(default)]
    pub id: String,
    /// Sender display string, e.g. `Jane Doe <jane@x.com>`.
    #[serde(default, rename = "from", alias = "sender")]
    pub sender: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    /// Plain-text body, possibly empty.
    #[serde(default, alias = "text", deserialize_with = "null_as_empty")]
    pub body: String,
    #[serde(default = "Utc::now", rename = "date", alias = "receivedAt")]
    pub received_at: DateTime<Utc>,
    /// RFC 5322 Message-ID, used for reply threading.
    #[serde(default, rename = "messageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl Message {
    pub fn new(sender: &str, subject: &str, body: &str) -> Self {
        Self {
            id: String::new(),
            sender: Some(sender.to_string()).filter(|s| !s.is_empty()),
            subject: Some(subject.to_string()).filter(|s| !s.is_empty()),
            body: body.to_string(),
            received_at: Utc::now(),
            message_id: None,
        }
    }

    /// Lowercased `subject + " " + body`, the text keyword rules scan.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.subject.as_deref().unwrap_or(""), self.body).to_lowercase()
    }
}

/// `null` reads as an empty string.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Category ────────────────────────────────────────────────────────

/// Coarse classification bucket for display and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Urgent,
    Client,
    Admin,
    Spam,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::Client => "client",
            Self::Admin => "admin",
            Self::Spam => "spam",
            Self::General => "general",
        }
    }

    /// Base priority score before length adjustments.
    pub fn base_score(&self) -> i64 {
        match self {
            Self::Urgent => 100,
            Self::Client => 50,
            Self::General => 25,
            Self::Admin => 10,
            Self::Spam => -50,
        }
    }

    pub fn emoji(&self) -> &'static str {
        emoji_for(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgent" => Ok(Self::Urgent),
            "client" => Ok(Self::Client),
            "admin" => Ok(Self::Admin),
            "spam" => Ok(Self::Spam),
            "general" => Ok(Self::General),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Display glyph for a category name. Unknown names get a generic envelope.
pub fn emoji_for(category: &str) -> &'static str {
    match category {
        "urgent" => "🔴",
        "client" => "🟢",
        "general" => "🔵",
        "admin" => "⚪",
        "spam" => "🟤",
        _ => "📧",
    }
}

// ── Notification record ─────────────────────────────────────────────

/// Compact display record for one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub emoji: String,
    pub category: Category,
    /// Sender display string, "Unknown" when absent.
    #[serde(rename = "from")]
    pub sender: String,
    /// Subject, "(no subject)" when absent.
    pub subject: String,
    /// Up to 200 chars of body, newlines flattened, `...` when truncated.
    pub preview: String,
    #[serde(skip)]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub message_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Urgent).unwrap(), "\"urgent\"");
        assert_eq!(serde_json::to_string(&Category::General).unwrap(), "\"general\"");
    }

    #[test]
    fn category_from_str_is_case_insensitive() {
        assert_eq!("Spam".parse::<Category>(), Ok(Category::Spam));
        assert!("bogus".parse::<Category>().is_err());
    }

    #[test]
    fn unknown_category_gets_envelope() {
        assert_eq!(emoji_for("bogus"), "📧");
        assert_eq!(Category::Urgent.emoji(), "🔴");
        assert_eq!(Category::Spam.emoji(), "🟤");
    }

    #[test]
    fn message_deserializes_cli_shape() {
        let json = r#"{"from": "Jane <jane@x.com>", "subject": "Hi", "body": "Hello"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.sender.as_deref(), Some("Jane <jane@x.com>"));
        assert_eq!(msg.subject.as_deref(), Some("Hi"));
        assert_eq!(msg.body, "Hello");
        assert!(msg.id.is_empty());
    }

    #[test]
    fn message_accepts_text_alias() {
        let json = r#"{"sender": "a@x.com", "text": "body text"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.sender.as_deref(), Some("a@x.com"));
        assert_eq!(msg.body, "body text");
        assert!(msg.subject.is_none());
    }

    #[test]
    fn null_body_reads_as_empty() {
        let json = r#"{"from": "a@x.com", "subject": "Hi", "body": null}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.body, "");

        let msg: Message = serde_json::from_str(r#"{"subject": "Hi"}"#).unwrap();
        assert_eq!(msg.body, "");
    }

    #[test]
    fn search_text_is_lowercased_subject_and_body() {
        let msg = Message::new("a@x.com", "URGENT Call", "Please RESPOND");
        assert_eq!(msg.search_text(), "urgent call please respond");
    }
}
