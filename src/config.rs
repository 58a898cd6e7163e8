//! Configuration types.
//!
//! Values come from an optional JSON settings file, overridden by
//! environment variables. The resolved [`AssistConfig`] is passed into each
//! component explicitly; nothing else reads the environment.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BUSINESS_NAME: &str = "our team";
pub const DEFAULT_SETTINGS_PATH: &str = "./config/settings.json";
pub const DEFAULT_TEMPLATES_DIR: &str = "./templates";

const DEFAULT_IMAP_HOST: &str = "imap.gmail.com";
const DEFAULT_IMAP_PORT: u16 = 993;
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

/// On-disk settings file (`config/settings.json`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub email: Option<String>,
    pub app_password: Option<String>,
    pub business_name: Option<String>,
    pub business_email: Option<String>,
    pub imap_host: Option<String>,
    pub imap_port: Option<u16>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub templates_dir: Option<PathBuf>,
}

impl Settings {
    /// Read settings from `path`. A missing file yields empty settings.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))
    }
}

/// Mailbox credentials and server endpoints.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub imap_host: String,
    pub imap_port: u16,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: SecretString,
    pub from_address: String,
}

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    /// Name used to sign drafted replies.
    pub business_name: String,
    /// Contact address exposed to drafted replies.
    pub business_contact: String,
    /// Directory holding custom `<reply-type>.md` templates.
    pub templates_dir: PathBuf,
    /// `None` when credentials are not configured.
    pub mail: Option<MailConfig>,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            business_contact: String::new(),
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            mail: None,
        }
    }
}

impl AssistConfig {
    /// Build config from the settings file and process environment.
    ///
    /// The settings path is `INBOX_ASSIST_SETTINGS`, or `./config/settings.json`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("INBOX_ASSIST_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH));
        let settings = Settings::load(&path)?;
        Self::resolve(settings, |key| std::env::var(key).ok())
    }

    /// Merge file settings with an environment lookup. Environment wins.
    pub fn resolve(
        settings: Settings,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let username = var("GMAIL_EMAIL").or(settings.email);
        let password = var("GMAIL_APP_PASSWORD").or(settings.app_password);

        let business_name = var("BUSINESS_NAME")
            .or(settings.business_name)
            .unwrap_or_else(|| DEFAULT_BUSINESS_NAME.to_string());
        let business_contact = var("BUSINESS_EMAIL")
            .or(settings.business_email)
            .or_else(|| username.clone())
            .unwrap_or_default();
        let templates_dir = var("INBOX_ASSIST_TEMPLATES")
            .map(PathBuf::from)
            .or(settings.templates_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATES_DIR));

        let mail = match (username, password) {
            (Some(username), Some(password)) => {
                let imap_port = match var("IMAP_PORT") {
                    Some(raw) => parse_port("IMAP_PORT", &raw)?,
                    None => settings.imap_port.unwrap_or(DEFAULT_IMAP_PORT),
                };
                let smtp_port = match var("SMTP_PORT") {
                    Some(raw) => parse_port("SMTP_PORT", &raw)?,
                    None => settings.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
                };
                Some(MailConfig {
                    imap_host: var("IMAP_HOST")
                        .or(settings.imap_host)
                        .unwrap_or_else(|| DEFAULT_IMAP_HOST.to_string()),
                    imap_port,
                    smtp_host: var("SMTP_HOST")
                        .or(settings.smtp_host)
                        .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                    smtp_port,
                    from_address: username.clone(),
                    username,
                    password: SecretString::from(password),
                })
            }
            _ => None,
        };

        Ok(Self {
            business_name,
            business_contact,
            templates_dir,
            mail,
        })
    }

    /// Mail credentials, or `MissingRequired` before any network attempt.
    pub fn require_mail(&self) -> Result<&MailConfig, ConfigError> {
        self.mail.as_ref().ok_or_else(|| ConfigError::MissingRequired {
            key: "GMAIL_EMAIL / GMAIL_APP_PASSWORD".into(),
            hint: "Set GMAIL_EMAIL and GMAIL_APP_PASSWORD environment variables, \
                   or configure email/appPassword in config/settings.json"
                .into(),
        })
    }
}

fn parse_port(key: &str, raw: &str) -> Result<u16, ConfigError> {
    raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{raw:?} is not a port: {e}"),
    })
}
