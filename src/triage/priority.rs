//! Priority scoring.

use crate::triage::types::{Category, Message};

/// Bodies shorter than this (in chars) get a boost.
pub const SHORT_BODY_CHARS: usize = 500;
pub const SHORT_BODY_BOOST: i64 = 10;

/// Sort key for a message, higher first. Unbounded, never clamped.
pub fn priority(message: &Message, category: Category) -> i64 {
    let mut score = category.base_score();
    if message.body.chars().count() < SHORT_BODY_CHARS {
        score += SHORT_BODY_BOOST;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_body(len: usize) -> Message {
        Message::new("a@x.com", "s", &"x".repeat(len))
    }

    #[test]
    fn urgent_short_body() {
        assert_eq!(priority(&with_body(20), Category::Urgent), 110);
    }

    #[test]
    fn spam_long_body() {
        assert_eq!(priority(&with_body(500), Category::Spam), -50);
    }

    #[test]
    fn spam_short_body() {
        assert_eq!(priority(&with_body(0), Category::Spam), -40);
    }

    #[test]
    fn boost_boundary() {
        assert_eq!(priority(&with_body(499), Category::General), 35);
        assert_eq!(priority(&with_body(500), Category::General), 25);
    }

    #[test]
    fn base_scores() {
        let long = with_body(1000);
        assert_eq!(priority(&long, Category::Client), 50);
        assert_eq!(priority(&long, Category::Admin), 10);
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        // 499 multi-byte chars is still short.
        let msg = Message::new("a@x.com", "s", &"é".repeat(499));
        assert_eq!(priority(&msg, Category::General), 35);
    }
}
