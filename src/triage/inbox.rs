//! Inbox check: fetch unread, triage each message, sort by priority.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SourceError;
use crate::mail::{FetchedItem, MailSource};
use crate::triage::notify::format_notification;
use crate::triage::priority::priority;
use crate::triage::rules::Classifier;
use crate::triage::types::{Message, NotificationRecord};

/// A notification record paired with its sort key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxEntry {
    #[serde(flatten)]
    pub record: NotificationRecord,
    pub priority: i64,
}

/// JSON document emitted by an inbox check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxReport {
    pub status: String,
    pub count: usize,
    pub emails: Vec<InboxEntry>,
}

impl InboxReport {
    pub fn ok(emails: Vec<InboxEntry>) -> Self {
        Self {
            status: "ok".to_string(),
            count: emails.len(),
            emails,
        }
    }
}

/// Classify → prioritize → format → sort.
#[derive(Debug, Clone, Default)]
pub struct InboxPipeline {
    classifier: Classifier,
}

impl InboxPipeline {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    /// Fetch unread messages from `source` and build the sorted report.
    ///
    /// A source failure aborts the run with nothing emitted. Messages that
    /// failed to decode are logged and left out.
    pub async fn run(&self, source: &dyn MailSource) -> Result<InboxReport, SourceError> {
        let items = source.fetch_unread().await?;

        if items.is_empty() {
            info!(source = source.name(), "No new emails");
            return Ok(InboxReport::ok(Vec::new()));
        }

        info!(source = source.name(), "Found {} unread email(s)", items.len());
        Ok(InboxReport::ok(self.triage(items)))
    }

    /// Triage fetched items. Decode failures are dropped.
    pub fn triage(&self, items: Vec<FetchedItem>) -> Vec<InboxEntry> {
        let mut dropped = 0usize;
        let messages: Vec<Message> = items
            .into_iter()
            .filter_map(|item| match item {
                Ok(msg) => Some(msg),
                Err(failure) => {
                    warn!(id = %failure.id, reason = %failure.reason, "Dropping unparseable message");
                    dropped += 1;
                    None
                }
            })
            .collect();

        if dropped > 0 {
            debug!(dropped, kept = messages.len(), "Some messages could not be parsed");
        }

        self.triage_messages(&messages)
    }

    /// Triage decoded messages, highest priority first.
    ///
    /// The sort is stable: equal priorities keep fetch order.
    pub fn triage_messages(&self, messages: &[Message]) -> Vec<InboxEntry> {
        let mut entries: Vec<InboxEntry> = messages
            .iter()
            .map(|msg| {
                let category = self.classifier.classify(msg);
                let priority = priority(msg, category);
                debug!(id = %msg.id, category = %category, priority, "Triaged message");
                InboxEntry {
                    record: format_notification(msg, category),
                    priority,
                }
            })
            .collect();

        entries.sort_by(|a, b| b.priority.cmp(&a.priority));
        entries
    }
}
