//! Inbox Assist: unread-mail triage and reply drafting.

pub mod config;
pub mod error;
pub mod mail;
pub mod reply;
pub mod triage;
