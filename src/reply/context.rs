//! Reply context built once per draft request.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::config::AssistConfig;
use crate::reply::detect::ReplyType;
use crate::triage::types::Message;

/// Greeting name used when nothing can be parsed from the sender.
pub const FALLBACK_FIRST_NAME: &str = "there";

/// `Display Name <local@domain>`
static ANGLE_ADDR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<name>[^<]*)<(?P<addr>[^>]*)>?").unwrap());

/// Everything a template or prompt needs about the message being answered.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyContext {
    pub original_from: String,
    pub original_subject: String,
    pub original_body: String,
    pub reply_type: ReplyType,
    pub sender_first_name: String,
    pub business_name: String,
    pub business_contact: String,
    pub generated_at: DateTime<Utc>,
}

impl ReplyContext {
    pub fn build(message: &Message, reply_type: ReplyType, config: &AssistConfig) -> Self {
        Self {
            original_from: message.sender.clone().unwrap_or_default(),
            original_subject: message.subject.clone().unwrap_or_default(),
            original_body: message.body.clone(),
            reply_type,
            sender_first_name: extract_first_name(message.sender.as_deref()),
            business_name: config.business_name.clone(),
            business_contact: config.business_contact.clone(),
            generated_at: Utc::now(),
        }
    }
}

/// Best-effort first name for a greeting.
///
/// - `Jane Doe <jane@x.com>` → `Jane`
/// - `jane.doe@x.com` → `Jane`
/// - `Jane Doe` → `Jane`
/// - empty or unparseable → `there`
pub fn extract_first_name(sender: Option<&str>) -> String {
    let Some(sender) = sender.map(str::trim).filter(|s| !s.is_empty()) else {
        return FALLBACK_FIRST_NAME.to_string();
    };

    let address = match ANGLE_ADDR.captures(sender) {
        Some(caps) => {
            let name = caps.name("name").map_or("", |m| m.as_str());
            if let Some(first) = first_token(name) {
                return first;
            }
            caps.name("addr").map_or("", |m| m.as_str()).trim()
        }
        None => sender,
    };

    if let Some((local, _domain)) = address.split_once('@') {
        return name_from_local_part(local).unwrap_or_else(|| FALLBACK_FIRST_NAME.to_string());
    }

    first_token(address).unwrap_or_else(|| FALLBACK_FIRST_NAME.to_string())
}

/// First whitespace-delimited token of a display name, quotes stripped.
fn first_token(name: &str) -> Option<String> {
    name.trim()
        .trim_matches(|c: char| c == '"' || c == '\'')
        .split_whitespace()
        .next()
        .map(|t| t.trim_matches(|c: char| c == '"' || c == '\'' || c == ','))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// `jane.doe` → `Jane`; `mike_r` → `Mike`.
fn name_from_local_part(local: &str) -> Option<String> {
    let mut chars = local.trim().chars();
    let first = chars.next()?;
    let rest: String = chars.take_while(|c| *c != '.' && *c != '_').collect();
    let name: String = first.to_uppercase().chain(rest.chars()).collect();
    Some(name).filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_first_token() {
        assert_eq!(extract_first_name(Some("Jane Doe <jane@x.com>")), "Jane");
    }

    #[test]
    fn quoted_display_name() {
        assert_eq!(extract_first_name(Some("\"Jane Doe\" <jane@x.com>")), "Jane");
    }

    #[test]
    fn bare_address_local_part() {
        assert_eq!(extract_first_name(Some("jane.doe@x.com")), "Jane");
        assert_eq!(extract_first_name(Some("mike_r@x.com")), "Mike");
        assert_eq!(extract_first_name(Some("bob@x.com")), "Bob");
    }

    #[test]
    fn empty_display_name_uses_address() {
        assert_eq!(extract_first_name(Some("<jane.doe@x.com>")), "Jane");
    }

    #[test]
    fn empty_or_missing_is_there() {
        assert_eq!(extract_first_name(Some("")), "there");
        assert_eq!(extract_first_name(Some("   ")), "there");
        assert_eq!(extract_first_name(None), "there");
    }

    #[test]
    fn empty_local_part_is_there() {
        assert_eq!(extract_first_name(Some("@x.com")), "there");
    }

    #[test]
    fn bare_name_first_token() {
        assert_eq!(extract_first_name(Some("Jane Doe")), "Jane");
    }

    #[test]
    fn context_uses_config_business_fields() {
        let config = AssistConfig {
            business_name: "Acme Studio".into(),
            business_contact: "hello@acme.test".into(),
            ..AssistConfig::default()
        };
        let msg = Message::new("Jane Doe <jane@x.com>", "Quote", "How much?");
        let ctx = ReplyContext::build(&msg, ReplyType::InquiryResponse, &config);
        assert_eq!(ctx.sender_first_name, "Jane");
        assert_eq!(ctx.business_name, "Acme Studio");
        assert_eq!(ctx.business_contact, "hello@acme.test");
        assert_eq!(ctx.original_subject, "Quote");
    }

    #[test]
    fn context_defaults() {
        let msg = Message::new("", "", "");
        let ctx = ReplyContext::build(&msg, ReplyType::General, &AssistConfig::default());
        assert_eq!(ctx.business_name, "our team");
        assert_eq!(ctx.business_contact, "");
        assert_eq!(ctx.original_from, "");
        assert_eq!(ctx.sender_first_name, "there");
    }
}
