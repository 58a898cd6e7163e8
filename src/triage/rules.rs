//! Keyword rules engine for message categorization.
//!
//! Rules are evaluated in insertion order and the first category with a
//! matching keyword wins. With the default table a message mentioning both
//! "urgent" and "newsletter" is `Urgent`, because urgent rules come first.

use tracing::debug;

use crate::triage::types::{Category, Message};

/// A category and the keywords that select it.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub category: Category,
    /// Lowercase substrings matched against subject and body.
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new(category: Category, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// First keyword found in `text`, if any. `text` must already be lowercase.
    pub fn matched_keyword(&self, text: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| text.contains(k.as_str()))
            .map(String::as_str)
    }
}

/// Ordered keyword classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<KeywordRule>,
    fallback: Category,
}

impl Classifier {
    /// Classifier with the built-in urgent → client → admin → spam table.
    pub fn default_rules() -> Self {
        let rules = vec![
            KeywordRule::new(
                Category::Urgent,
                &[
                    "urgent",
                    "asap",
                    "deadline",
                    "important",
                    "critical",
                    "emergency",
                    "immediately",
                ],
            ),
            KeywordRule::new(
                Category::Client,
                &[
                    "inquiry",
                    "quote",
                    "booking",
                    "interested",
                    "pricing",
                    "services",
                    "consultation",
                    "hire",
                ],
            ),
            KeywordRule::new(
                Category::Admin,
                &[
                    "receipt",
                    "invoice",
                    "notification",
                    "automated",
                    "noreply",
                    "confirmation",
                    "subscription",
                ],
            ),
            KeywordRule::new(
                Category::Spam,
                &["unsubscribe", "newsletter", "promo", "sale", "discount", "limited time"],
            ),
        ];

        Self {
            rules,
            fallback: Category::General,
        }
    }

    /// Classifier with no rules; everything is `General`.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Category::General,
        }
    }

    /// Append a rule. It is tested after every existing rule.
    pub fn add_rule(&mut self, category: Category, keywords: &[&str]) {
        self.rules.push(KeywordRule::new(category, keywords));
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Categorize a message from its subject and body.
    pub fn classify(&self, message: &Message) -> Category {
        let text = message.search_text();

        for rule in &self.rules {
            if let Some(keyword) = rule.matched_keyword(&text) {
                debug!(
                    id = %message.id,
                    category = %rule.category,
                    keyword,
                    "Message matched keyword rule"
                );
                return rule.category;
            }
        }

        self.fallback
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::default_rules()
    }
}
