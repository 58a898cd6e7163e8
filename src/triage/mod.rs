//! Inbox triage pipeline.
//!
//! Every fetched message flows through:
//! 1. `MailSource::fetch_unread()`: protocol I/O and MIME decoding
//! 2. `Classifier::classify()`: ordered keyword match to a `Category`
//! 3. `priority()`: hand-weighted sort key
//! 4. `format_notification()`: compact display record
//! 5. Stable sort, highest priority first

pub mod inbox;
pub mod notify;
pub mod priority;
pub mod rules;
pub mod types;

pub use inbox::{InboxEntry, InboxPipeline, InboxReport};
pub use notify::format_notification;
pub use priority::priority;
pub use rules::Classifier;
pub use types::{Category, Message, NotificationRecord};
