//! Reply templates: custom files on disk and the built-in fallbacks.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::error::TemplateError;
use crate::reply::context::ReplyContext;
use crate::reply::detect::ReplyType;

/// Placeholders recognized in custom templates.
pub mod placeholders {
    pub const FIRST_NAME: &str = "{{firstName}}";
    pub const BUSINESS_NAME: &str = "{{businessName}}";
    pub const SUBJECT: &str = "{{subject}}";
}

/// Lookup of custom reply templates by reply type.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Raw template text, or `None` if no usable custom template exists.
    async fn load(&self, reply_type: ReplyType) -> Result<Option<String>, TemplateError>;
}

/// Templates stored as `<dir>/<reply-type>.md`.
#[derive(Debug, Clone)]
pub struct FsTemplateStore {
    dir: PathBuf,
}

impl FsTemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, reply_type: ReplyType) -> PathBuf {
        self.dir.join(format!("{}.md", reply_type.as_str()))
    }
}

#[async_trait]
impl TemplateStore for FsTemplateStore {
    async fn load(&self, reply_type: ReplyType) -> Result<Option<String>, TemplateError> {
        let path = self.path_for(reply_type);
        match fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => Ok(None),
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(TemplateError::Io {
                name: path.display().to_string(),
                source,
            }),
        }
    }
}

/// Substitute every placeholder occurrence, verbatim.
pub fn fill_placeholders(template: &str, ctx: &ReplyContext) -> String {
    template
        .replace(placeholders::FIRST_NAME, &ctx.sender_first_name)
        .replace(placeholders::BUSINESS_NAME, &ctx.business_name)
        .replace(placeholders::SUBJECT, &ctx.original_subject)
}

/// Built-in scaffold body. Acknowledgment uses the general body.
pub fn builtin_body(ctx: &ReplyContext) -> String {
    let name = &ctx.sender_first_name;
    let business = &ctx.business_name;

    match ctx.reply_type {
        ReplyType::InquiryResponse => format!(
            "Hi {name},

Thanks for reaching out! I'd be happy to discuss this further.

Could you let me know a good time for a quick call? I'm generally available [suggest times].

Alternatively, feel free to share any additional details about what you're looking for, and I'll put together some options for you.

Looking forward to connecting!

Best,
{business}"
        ),
        ReplyType::MeetingConfirm => format!(
            "Hi {name},

Thanks for suggesting a meeting!

I'm available at [suggest times]. Let me know what works best for you.

Talk soon,
{business}"
        ),
        ReplyType::SupportResponse => format!(
            "Hi {name},

Thanks for getting in touch.

[Address their question/issue here]

Let me know if you have any other questions!

Best,
{business}"
        ),
        ReplyType::General | ReplyType::Acknowledgment => format!(
            "Hi {name},

Thanks for your email.

[Your response here]

Best,
{business}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn ctx(reply_type: ReplyType) -> ReplyContext {
        ReplyContext {
            original_from: "Jane Doe <jane@x.com>".into(),
            original_subject: "Quote request".into(),
            original_body: "How much?".into(),
            reply_type,
            sender_first_name: "Jane".into(),
            business_name: "Acme".into(),
            business_contact: String::new(),
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn fills_all_occurrences() {
        let template = "Hi {{firstName}}, re {{subject}}. {{firstName}}, thanks! -- {{businessName}}";
        assert_eq!(
            fill_placeholders(template, &ctx(ReplyType::General)),
            "Hi Jane, re Quote request. Jane, thanks! -- Acme"
        );
    }

    #[test]
    fn unknown_placeholders_left_alone() {
        assert_eq!(
            fill_placeholders("{{other}} {{firstName}}", &ctx(ReplyType::General)),
            "{{other}} Jane"
        );
    }

    #[test]
    fn builtin_bodies_greet_and_sign() {
        for rt in ReplyType::ALL {
            let body = builtin_body(&ctx(rt));
            assert!(body.starts_with("Hi Jane,"), "{rt}: {body}");
            assert!(body.ends_with("Acme"), "{rt}: {body}");
        }
    }

    #[test]
    fn acknowledgment_uses_general_body() {
        assert_eq!(
            builtin_body(&ctx(ReplyType::Acknowledgment)),
            builtin_body(&ctx(ReplyType::General))
        );
    }

    #[test]
    fn inquiry_body_offers_call() {
        assert!(builtin_body(&ctx(ReplyType::InquiryResponse)).contains("quick call"));
    }

    #[tokio::test]
    async fn fs_store_reads_matching_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("meeting-confirm.md"), "See you, {{firstName}}").unwrap();

        let store = FsTemplateStore::new(dir.path());
        let found = store.load(ReplyType::MeetingConfirm).await.unwrap();
        assert_eq!(found.as_deref(), Some("See you, {{firstName}}"));
        assert!(store.load(ReplyType::General).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fs_store_empty_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("meeting-confirm.md"), "").unwrap();
        std::fs::write(dir.path().join("general.md"), " \n\n").unwrap();
        let store = FsTemplateStore::new(dir.path());
        assert!(store.load(ReplyType::MeetingConfirm).await.unwrap().is_none());
        assert!(store.load(ReplyType::General).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fs_store_missing_dir_is_not_found() {
        let store = FsTemplateStore::new("/nonexistent/templates");
        assert!(store.load(ReplyType::General).await.unwrap().is_none());
    }
}
