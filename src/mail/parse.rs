//! Decode raw RFC 5322 bytes into a [`Message`].

use chrono::{DateTime, Utc};
use mail_parser::{MessageParser, MimeHeaders};

use crate::error::MessageParseFailure;
use crate::triage::types::Message;

/// Decode one fetched message. `id` is the source's identifier for it.
pub fn parse_message(id: &str, raw: &[u8]) -> Result<Message, MessageParseFailure> {
    let failure = |reason: &str| MessageParseFailure {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(failure("empty message body"));
    }

    let parsed = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| failure("not a valid RFC 5322 message"))?;

    if parsed.from().is_none() && parsed.subject().is_none() && parsed.date().is_none() {
        return Err(failure("no recognizable headers"));
    }

    let received_at = parsed
        .date()
        .and_then(|d| DateTime::from_timestamp(d.to_timestamp(), 0))
        .unwrap_or_else(Utc::now);

    Ok(Message {
        id: id.to_string(),
        sender: extract_sender(&parsed),
        subject: parsed.subject().map(str::to_string),
        body: extract_text(&parsed),
        received_at,
        message_id: parsed.message_id().map(|s| format!("<{s}>")),
    })
}

/// Sender as `Name <address>`, or whichever half is present.
fn extract_sender(parsed: &mail_parser::Message) -> Option<String> {
    let addr = parsed.from().and_then(|a| a.first())?;
    match (addr.name(), addr.address()) {
        (Some(name), Some(address)) if !name.trim().is_empty() => {
            Some(format!("{} <{address}>", name.trim()))
        }
        (_, Some(address)) => Some(address.to_string()),
        (Some(name), None) => Some(name.to_string()),
        (None, None) => None,
    }
}

/// Readable text from a parsed message: plain part, else stripped HTML,
/// else the first textual attachment. Empty when nothing is readable.
fn extract_text(parsed: &mail_parser::Message) -> String {
    if let Some(text) = parsed.body_text(0) {
        return text.to_string();
    }
    if let Some(html) = parsed.body_html(0) {
        return strip_html(&html);
    }
    for part in parsed.attachments() {
        if let Some(ct) = MimeHeaders::content_type(part)
            && ct.ctype() == "text"
            && let Ok(text) = std::str::from_utf8(part.contents())
        {
            return text.to_string();
        }
    }
    String::new()
}

/// Strip HTML tags and collapse whitespace.
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}
