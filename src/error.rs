//! Error types for Inbox Assist.
//!
//! Each layer returns its own error type. The binary folds them into
//! `anyhow::Error` at the edge.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Mail source errors.
///
/// Only `Unavailable` is fatal for an inbox check. Per-message decode
/// problems are reported as [`MessageParseFailure`] items instead.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Mail source {host} unavailable: {reason}")]
    Unavailable { host: String, reason: String },

    #[error("Mail source task failed: {0}")]
    Task(String),
}

/// A single fetched message that could not be decoded.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to parse message {id}: {reason}")]
pub struct MessageParseFailure {
    pub id: String,
    pub reason: String,
}

/// Template store errors.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to read template {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_message_includes_hint() {
        let err = ConfigError::MissingRequired {
            key: "GMAIL_EMAIL".into(),
            hint: "Set GMAIL_EMAIL and GMAIL_APP_PASSWORD.".into(),
        };
        let text = err.to_string();
        assert!(text.contains("GMAIL_EMAIL"));
        assert!(text.contains("Set GMAIL_EMAIL and GMAIL_APP_PASSWORD."));
    }

    #[test]
    fn source_unavailable_names_host() {
        let err = SourceError::Unavailable {
            host: "imap.test.com".into(),
            reason: "login rejected".into(),
        };
        assert_eq!(
            err.to_string(),
            "Mail source imap.test.com unavailable: login rejected"
        );
    }
}
