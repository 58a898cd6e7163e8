//! Draft composition: reply type → context → template or scaffold.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AssistConfig;
use crate::reply::context::ReplyContext;
use crate::reply::detect::{ReplyType, detect_reply_type};
use crate::reply::prompts::draft_prompt;
use crate::reply::templates::{TemplateStore, builtin_body, fill_placeholders};
use crate::triage::types::Message;

const REPLY_PREFIX: &str = "Re:";

/// A composed, unsent reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub subject: String,
    pub body: String,
    #[serde(rename = "replyType")]
    pub reply_type: ReplyType,
    /// The body is a scaffold meant for completion by a generative service.
    #[serde(rename = "needsAIEnhancement")]
    pub needs_ai_enhancement: bool,
    #[serde(rename = "aiPrompt", default, skip_serializing_if = "Option::is_none")]
    pub ai_prompt: Option<String>,
}

/// Builds reply drafts from a custom template store or the built-ins.
pub struct DraftComposer {
    config: AssistConfig,
    templates: Arc<dyn TemplateStore>,
}

impl DraftComposer {
    pub fn new(config: AssistConfig, templates: Arc<dyn TemplateStore>) -> Self {
        Self { config, templates }
    }

    /// Compose a reply draft for `message`.
    ///
    /// A custom template yields final copy; otherwise the built-in scaffold
    /// is returned together with a completion prompt.
    pub async fn compose(&self, message: &Message) -> Draft {
        let reply_type = detect_reply_type(message);
        let ctx = ReplyContext::build(message, reply_type, &self.config);
        let subject = reply_subject(message.subject.as_deref());

        debug!(
            reply_type = %reply_type,
            first_name = %ctx.sender_first_name,
            "Composing draft"
        );

        // A blank template counts as no template.
        let custom = match self.templates.load(reply_type).await {
            Ok(found) => found.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                warn!(reply_type = %reply_type, error = %e, "Template unreadable, using built-in");
                None
            }
        };

        if let Some(template) = custom {
            info!(reply_type = %reply_type, "Using custom template");
            return Draft {
                subject,
                body: fill_placeholders(&template, &ctx),
                reply_type,
                needs_ai_enhancement: false,
                ai_prompt: None,
            };
        }

        info!(reply_type = %reply_type, "No custom template, drafting scaffold");
        Draft {
            subject,
            body: builtin_body(&ctx),
            reply_type,
            needs_ai_enhancement: true,
            ai_prompt: Some(draft_prompt(&ctx)),
        }
    }
}

/// Subject with exactly one `Re:` prefix.
pub fn reply_subject(subject: Option<&str>) -> String {
    let subject = subject
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("(no subject)");

    let has_prefix = subject
        .get(..REPLY_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(REPLY_PREFIX));

    if has_prefix {
        subject.to_string()
    } else {
        format!("{REPLY_PREFIX} {subject}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::error::TemplateError;

    struct MapStore(HashMap<ReplyType, String>);

    #[async_trait]
    impl TemplateStore for MapStore {
        async fn load(&self, reply_type: ReplyType) -> Result<Option<String>, TemplateError> {
            Ok(self.0.get(&reply_type).cloned())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl TemplateStore for BrokenStore {
        async fn load(&self, reply_type: ReplyType) -> Result<Option<String>, TemplateError> {
            Err(TemplateError::Io {
                name: reply_type.as_str().into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    fn composer(templates: Vec<(ReplyType, &str)>) -> DraftComposer {
        let map = templates
            .into_iter()
            .map(|(rt, t)| (rt, t.to_string()))
            .collect();
        let config = AssistConfig {
            business_name: "Acme".into(),
            ..AssistConfig::default()
        };
        DraftComposer::new(config, Arc::new(MapStore(map)))
    }

    #[test]
    fn subject_gets_prefix() {
        assert_eq!(reply_subject(Some("Quote request")), "Re: Quote request");
    }

    #[test]
    fn subject_prefix_not_doubled() {
        assert_eq!(reply_subject(Some("Re: Quote request")), "Re: Quote request");
        assert_eq!(reply_subject(Some("RE: Quote request")), "RE: Quote request");
    }

    #[test]
    fn missing_subject() {
        assert_eq!(reply_subject(None), "Re: (no subject)");
        assert_eq!(reply_subject(Some("  ")), "Re: (no subject)");
    }

    #[test]
    fn short_multibyte_subject_does_not_panic() {
        assert_eq!(reply_subject(Some("é")), "Re: é");
    }

    #[tokio::test]
    async fn custom_template_is_final_copy() {
        let composer = composer(vec![(
            ReplyType::MeetingConfirm,
            "Hi {{firstName}}, Tuesday works. ({{subject}}) -- {{businessName}}",
        )]);
        let msg = Message::new("Jane Doe <jane@x.com>", "Meeting?", "Can we meet?");

        let draft = composer.compose(&msg).await;
        assert_eq!(draft.reply_type, ReplyType::MeetingConfirm);
        assert!(!draft.needs_ai_enhancement);
        assert!(draft.ai_prompt.is_none());
        assert_eq!(draft.body, "Hi Jane, Tuesday works. (Meeting?) -- Acme");
        assert_eq!(draft.subject, "Re: Meeting?");

        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("aiPrompt").is_none());
        assert_eq!(json["needsAIEnhancement"], false);
        assert_eq!(json["replyType"], "meeting-confirm");
    }

    #[tokio::test]
    async fn missing_template_yields_scaffold_and_prompt() {
        let composer = composer(vec![]);
        let msg = Message::new("jane.doe@x.com", "Meeting?", "Can we meet?");

        let draft = composer.compose(&msg).await;
        assert!(draft.needs_ai_enhancement);
        let prompt = draft.ai_prompt.as_deref().unwrap();
        assert!(!prompt.is_empty());
        assert!(prompt.contains("Subject: Meeting?"));
        assert!(draft.body.starts_with("Hi Jane,"));
        assert!(draft.body.ends_with("Acme"));
    }

    #[tokio::test]
    async fn template_for_other_type_is_ignored() {
        let composer = composer(vec![(ReplyType::General, "generic")]);
        let msg = Message::new("a@x.com", "Pricing", "What's the cost?");

        let draft = composer.compose(&msg).await;
        assert_eq!(draft.reply_type, ReplyType::InquiryResponse);
        assert!(draft.needs_ai_enhancement);
    }

    #[tokio::test]
    async fn blank_template_falls_back_to_scaffold() {
        let composer = composer(vec![(ReplyType::MeetingConfirm, "  \n\t\n")]);
        let msg = Message::new("Jane Doe <jane@x.com>", "Meeting", "can we meet");

        let draft = composer.compose(&msg).await;
        assert_eq!(draft.reply_type, ReplyType::MeetingConfirm);
        assert!(draft.needs_ai_enhancement);
        assert!(draft.ai_prompt.is_some());
        assert!(draft.body.starts_with("Hi Jane,"));
    }

    #[tokio::test]
    async fn unreadable_template_falls_back() {
        let composer = DraftComposer::new(AssistConfig::default(), Arc::new(BrokenStore));
        let msg = Message::new("a@x.com", "Hello", "Hi");

        let draft = composer.compose(&msg).await;
        assert!(draft.needs_ai_enhancement);
        assert!(draft.body.ends_with("our team"));
    }
}
