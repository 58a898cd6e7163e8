//! IMAP mail source on the `imap` crate.
//!
//! Messages are fetched with `BODY.PEEK[]`, which leaves the `\Seen` flag
//! untouched.

use std::net::TcpStream;

use async_trait::async_trait;
use native_tls::{TlsConnector, TlsStream};
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use crate::config::MailConfig;
use crate::error::{MessageParseFailure, SourceError};
use crate::mail::parse::parse_message;
use crate::mail::{FetchedItem, MailSource};

type ImapSession = imap::Session<TlsStream<TcpStream>>;

/// One unseen message: its UID and the raw RFC 5322 bytes, or why the
/// fetch failed.
type RawFetch = (String, Result<Vec<u8>, String>);

/// Unread messages from an IMAP INBOX.
pub struct ImapSource {
    config: MailConfig,
}

impl ImapSource {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MailSource for ImapSource {
    fn name(&self) -> &str {
        &self.config.imap_host
    }

    async fn fetch_unread(&self) -> Result<Vec<FetchedItem>, SourceError> {
        let cfg = self.config.clone();
        let host = cfg.imap_host.clone();

        let raws = tokio::task::spawn_blocking(move || fetch_unseen_raw(&cfg))
            .await
            .map_err(|e| SourceError::Task(e.to_string()))?
            .map_err(|e| SourceError::Unavailable {
                host,
                reason: e.to_string(),
            })?;

        debug!("Fetched {} raw message(s), decoding", raws.len());
        Ok(decode_all(raws).await)
    }
}

/// Decode each fetched message on its own blocking task and join them.
/// Failed fetches pass through as failed items.
async fn decode_all(raws: Vec<RawFetch>) -> Vec<FetchedItem> {
    let decodes = raws.into_iter().map(|(id, fetched)| async move {
        let raw = match fetched {
            Ok(raw) => raw,
            Err(reason) => return Err(MessageParseFailure { id, reason }),
        };
        let task_id = id.clone();
        tokio::task::spawn_blocking(move || parse_message(&task_id, &raw))
            .await
            .unwrap_or_else(|e| {
                Err(MessageParseFailure {
                    id,
                    reason: format!("decode task failed: {e}"),
                })
            })
    });

    futures::future::join_all(decodes).await
}

// ── Blocking IMAP session ───────────────────────────────────────────

fn open_session(config: &MailConfig) -> imap::error::Result<ImapSession> {
    let tls = TlsConnector::new()?;
    let client = imap::connect(
        (config.imap_host.as_str(), config.imap_port),
        config.imap_host.as_str(),
        &tls,
    )?;
    client
        .login(&config.username, config.password.expose_secret())
        .map_err(|(e, _client)| e)
}

/// Fetch every unseen INBOX message without marking it read (blocking).
///
/// Only session-level failures are returned as `Err`. A message that fails
/// to fetch is reported in place and the rest are still fetched.
fn fetch_unseen_raw(config: &MailConfig) -> imap::error::Result<Vec<RawFetch>> {
    let mut session = open_session(config)?;
    session.select("INBOX")?;

    let mut uids: Vec<u32> = session.uid_search("UNSEEN")?.into_iter().collect();
    uids.sort_unstable();

    if uids.is_empty() {
        let _ = session.logout();
        return Ok(Vec::new());
    }

    info!("Found {} unseen message(s) on {}", uids.len(), config.imap_host);

    let results = fetch_each(&uids, |uid| fetch_one(&mut session, uid));

    let _ = session.logout();
    Ok(results)
}

/// Fetch UIDs in order; a failure is recorded for that UID only.
fn fetch_each(
    uids: &[u32],
    mut fetch: impl FnMut(u32) -> Result<Vec<u8>, String>,
) -> Vec<RawFetch> {
    uids.iter()
        .map(|&uid| {
            let fetched = fetch(uid);
            if let Err(reason) = &fetched {
                warn!(uid, reason = %reason, "Fetch failed, skipping message");
            }
            (uid.to_string(), fetched)
        })
        .collect()
}

fn fetch_one(session: &mut ImapSession, uid: u32) -> Result<Vec<u8>, String> {
    let fetches = session
        .uid_fetch(uid.to_string(), "BODY.PEEK[]")
        .map_err(|e| format!("FETCH failed: {e}"))?;
    fetches
        .iter()
        .find_map(|f| f.body())
        .map(<[u8]>::to_vec)
        .ok_or_else(|| "server returned no message body".to_string())
}
