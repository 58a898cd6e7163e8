//! Reply drafting: intent detection, context building, template fill.

pub mod composer;
pub mod context;
pub mod detect;
pub mod prompts;
pub mod templates;

pub use composer::{Draft, DraftComposer, reply_subject};
pub use context::{ReplyContext, extract_first_name};
pub use detect::{ReplyType, detect_reply_type};
pub use templates::{FsTemplateStore, TemplateStore};
