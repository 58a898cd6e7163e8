//! SMTP sending via lettre.

use std::path::Path;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message as Email, SmtpTransport, Transport};
use secrecy::ExposeSecret;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::MailConfig;
use crate::mail::{AttachmentSpec, MailSender, SendOutcome, SendRequest, VerifyOutcome};
use crate::reply::composer::reply_subject;

/// Implicit-TLS submission port; anything else uses STARTTLS.
const SMTPS_PORT: u16 = 465;

/// Outbound mail through an authenticated SMTP relay.
pub struct SmtpSender {
    config: MailConfig,
}

impl SmtpSender {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn transport(config: &MailConfig) -> Result<SmtpTransport, String> {
        let creds = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );
        let builder = if config.smtp_port == SMTPS_PORT {
            SmtpTransport::relay(&config.smtp_host)
        } else {
            SmtpTransport::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| format!("SMTP relay error: {e}"))?;

        Ok(builder.port(config.smtp_port).credentials(creds).build())
    }
}

#[async_trait]
impl MailSender for SmtpSender {
    async fn send(&self, request: &SendRequest) -> SendOutcome {
        let subject = outgoing_subject(request);
        let cfg = self.config.clone();
        let req = request.clone();

        let result = tokio::task::spawn_blocking(move || {
            let (email, message_id) = build_email(&cfg, &req)?;
            Self::transport(&cfg)?
                .send(&email)
                .map_err(|e| format!("SMTP send failed: {e}"))?;
            Ok::<_, String>(message_id)
        })
        .await
        .unwrap_or_else(|e| Err(format!("send task failed: {e}")));

        match result {
            Ok(message_id) => {
                info!(to = %request.to, message_id = %message_id, "Email sent");
                SendOutcome::sent(message_id, &request.to, &subject, request.is_reply)
            }
            Err(error) => {
                warn!(to = %request.to, error = %error, "Email send failed");
                SendOutcome::failed(error, &request.to, &request.subject)
            }
        }
    }

    async fn verify(&self) -> VerifyOutcome {
        let cfg = self.config.clone();
        let result = tokio::task::spawn_blocking(move || {
            Self::transport(&cfg)?
                .test_connection()
                .map_err(|e| format!("SMTP connection failed: {e}"))
        })
        .await
        .unwrap_or_else(|e| Err(format!("verify task failed: {e}")));

        match result {
            Ok(true) => VerifyOutcome {
                success: true,
                message: Some(format!("SMTP connection to {} verified", self.config.smtp_host)),
                error: None,
            },
            Ok(false) => VerifyOutcome {
                success: false,
                message: None,
                error: Some(format!("SMTP server {} rejected the connection", self.config.smtp_host)),
            },
            Err(error) => VerifyOutcome {
                success: false,
                message: None,
                error: Some(error),
            },
        }
    }
}

/// Subject as it will be sent: replies carry exactly one `Re:`.
fn outgoing_subject(request: &SendRequest) -> String {
    if request.is_reply {
        reply_subject(Some(&request.subject))
    } else {
        request.subject.clone()
    }
}

/// Build the MIME message and its generated Message-ID.
pub fn build_email(config: &MailConfig, request: &SendRequest) -> Result<(Email, String), String> {
    let from = parse_mailbox("from", &config.from_address)?;
    let message_id = generate_message_id(&config.from_address);

    let mut builder = Email::builder()
        .from(from.clone())
        .to(parse_mailbox("to", &request.to)?)
        .subject(outgoing_subject(request))
        .message_id(Some(message_id.clone()));

    for cc in &request.cc {
        builder = builder.cc(parse_mailbox("cc", cc)?);
    }
    for bcc in &request.bcc {
        builder = builder.bcc(parse_mailbox("bcc", bcc)?);
    }
    builder = match request.reply_to.as_deref() {
        Some(reply_to) => builder.reply_to(parse_mailbox("reply-to", reply_to)?),
        None => builder.reply_to(from),
    };

    if request.is_reply
        && let Some(original) = request.original_message_id.as_deref()
    {
        builder = builder
            .in_reply_to(original.to_string())
            .references(original.to_string());
    }

    let alternative =
        MultiPart::alternative_plain_html(request.body.clone(), text_to_html(&request.body));

    let body = if request.attachments.is_empty() {
        alternative
    } else {
        let mut mixed = MultiPart::mixed().multipart(alternative);
        for spec in &request.attachments {
            mixed = mixed.singlepart(load_attachment(spec)?);
        }
        mixed
    };

    let email = builder
        .multipart(body)
        .map_err(|e| format!("Failed to build email: {e}"))?;
    Ok((email, message_id))
}

fn parse_mailbox(field: &str, raw: &str) -> Result<Mailbox, String> {
    raw.trim()
        .parse()
        .map_err(|e| format!("Invalid {field} address {raw:?}: {e}"))
}

fn load_attachment(spec: &AttachmentSpec) -> Result<lettre::message::SinglePart, String> {
    let path = Path::new(&spec.path);
    let bytes =
        std::fs::read(path).map_err(|e| format!("Failed to read attachment {}: {e}", spec.path))?;
    let filename = spec.filename.clone().unwrap_or_else(|| {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("attachment")
            .to_string()
    });
    let content_type = ContentType::parse(
        spec.content_type
            .as_deref()
            .unwrap_or("application/octet-stream"),
    )
    .map_err(|e| format!("Invalid content type for {filename}: {e}"))?;
    Ok(Attachment::new(filename).body(bytes, content_type))
}

fn generate_message_id(from_address: &str) -> String {
    let domain = from_address
        .rsplit_once('@')
        .map(|(_, d)| d.trim_end_matches('>'))
        .filter(|d| !d.is_empty())
        .unwrap_or("localhost");
    format!("<{}@{domain}>", Uuid::new_v4())
}

/// Escaped HTML rendition of a plain-text body.
fn text_to_html(body: &str) -> String {
    body.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}
