//! Reply intent detection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::triage::types::Message;

/// What kind of reply a message calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplyType {
    InquiryResponse,
    MeetingConfirm,
    SupportResponse,
    Acknowledgment,
    General,
}

impl ReplyType {
    pub const ALL: [ReplyType; 5] = [
        Self::InquiryResponse,
        Self::MeetingConfirm,
        Self::SupportResponse,
        Self::Acknowledgment,
        Self::General,
    ];

    /// Kebab-case name; also the custom template file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InquiryResponse => "inquiry-response",
            Self::MeetingConfirm => "meeting-confirm",
            Self::SupportResponse => "support-response",
            Self::Acknowledgment => "acknowledgment",
            Self::General => "general",
        }
    }
}

impl fmt::Display for ReplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered intent table. First row with a matching cue wins.
const INTENT_CUES: &[(ReplyType, &[&str])] = &[
    (ReplyType::InquiryResponse, &["quote", "pricing", "cost"]),
    (ReplyType::MeetingConfirm, &["meeting", "schedule", "call"]),
    (ReplyType::Acknowledgment, &["thank", "received"]),
    (ReplyType::SupportResponse, &["question", "help", "support"]),
];

/// Detect the reply intent from subject and body.
pub fn detect_reply_type(message: &Message) -> ReplyType {
    let text = message.search_text();
    INTENT_CUES
        .iter()
        .find(|(_, cues)| cues.iter().any(|cue| text.contains(cue)))
        .map(|(reply_type, _)| *reply_type)
        .unwrap_or(ReplyType::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(subject: &str, body: &str) -> ReplyType {
        detect_reply_type(&Message::new("a@x.com", subject, body))
    }

    #[test]
    fn pricing_is_inquiry() {
        assert_eq!(detect("Pricing", "What does it cost?"), ReplyType::InquiryResponse);
    }

    #[test]
    fn meeting_is_confirm() {
        assert_eq!(detect("Meeting next week", ""), ReplyType::MeetingConfirm);
    }

    #[test]
    fn thanks_is_acknowledgment() {
        assert_eq!(detect("Thanks!", "Got it"), ReplyType::Acknowledgment);
    }

    #[test]
    fn question_is_support() {
        assert_eq!(detect("A question", "Need a hand"), ReplyType::SupportResponse);
    }

    #[test]
    fn nothing_is_general() {
        assert_eq!(detect("Hello", "Nice to meet you"), ReplyType::General);
    }

    #[test]
    fn inquiry_checked_before_meeting() {
        assert_eq!(
            detect("Schedule a call", "and send a quote"),
            ReplyType::InquiryResponse
        );
    }

    #[test]
    fn acknowledgment_checked_before_support() {
        assert_eq!(
            detect("Thank you for the help", ""),
            ReplyType::Acknowledgment
        );
    }

    #[test]
    fn serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ReplyType::MeetingConfirm).unwrap(),
            "\"meeting-confirm\""
        );
        for rt in ReplyType::ALL {
            assert_eq!(
                serde_json::to_string(&rt).unwrap(),
                format!("\"{}\"", rt.as_str())
            );
        }
    }
}
