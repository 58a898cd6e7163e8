//! Mail I/O seams: fetching unread messages and sending replies.
//!
//! The triage and drafting code only sees these traits. `ImapSource` and
//! `SmtpSender` are the production implementations.

pub mod imap;
pub mod parse;
pub mod smtp;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{MessageParseFailure, SourceError};
use crate::triage::types::Message;

pub use imap::ImapSource;
pub use smtp::SmtpSender;

/// One fetched item: a decoded message, or the reason it could not be decoded.
pub type FetchedItem = Result<Message, MessageParseFailure>;

/// Source of unread messages: pure I/O, no triage logic.
#[async_trait]
pub trait MailSource: Send + Sync {
    /// Source name for logging (e.g. the IMAP host).
    fn name(&self) -> &str;

    /// Fetch all unread messages without marking them read.
    ///
    /// Fails only when the source itself is unreachable or rejects
    /// credentials. Individual decode failures are returned as `Err` items.
    async fn fetch_unread(&self) -> Result<Vec<FetchedItem>, SourceError>;
}

// ── Sending ─────────────────────────────────────────────────────────

/// A file to attach to an outgoing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentSpec {
    /// Path on disk.
    pub path: String,
    /// Name shown to the recipient; defaults to the path's file name.
    #[serde(default)]
    pub filename: Option<String>,
    /// MIME type; defaults to `application/octet-stream`.
    #[serde(default)]
    pub content_type: Option<String>,
}

/// An outgoing message, as accepted by `send` on the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<AttachmentSpec>,
    /// Reply-To header; defaults to the sending address.
    #[serde(default)]
    pub reply_to: Option<String>,
    /// Send as a reply: normalize the subject and add threading headers.
    #[serde(default)]
    pub is_reply: bool,
    /// Message-ID of the message being answered.
    #[serde(default)]
    pub original_message_id: Option<String>,
}

/// Result of a send attempt. Failures are values, never panics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SendOutcome {
    Sent {
        success: bool,
        #[serde(rename = "messageId")]
        message_id: String,
        to: String,
        subject: String,
        #[serde(rename = "isReply")]
        is_reply: bool,
    },
    Failed {
        success: bool,
        error: String,
        to: String,
        subject: String,
    },
}

impl SendOutcome {
    pub fn sent(message_id: String, to: &str, subject: &str, is_reply: bool) -> Self {
        Self::Sent {
            success: true,
            message_id,
            to: to.to_string(),
            subject: subject.to_string(),
            is_reply,
        }
    }

    pub fn failed(error: impl Into<String>, to: &str, subject: &str) -> Self {
        Self::Failed {
            success: false,
            error: error.into(),
            to: to.to_string(),
            subject: subject.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Result of a connection check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outbound transport.
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send a message. Transport and validation errors come back as
    /// `SendOutcome::Failed`.
    async fn send(&self, request: &SendRequest) -> SendOutcome;

    /// Check that the transport accepts our credentials.
    async fn verify(&self) -> VerifyOutcome;
}
