//! Mail provider boundary: the `MailService` trait and its Gmail implementation

use async_trait::async_trait;
use google_gmail1::api::MessagePart;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::{GmailHub, READONLY_SCOPES};
use crate::config::FetchConfig;
use crate::error::{MailError, Result};
use crate::mime::encode_body;
use crate::models::{MessagePage, MessageSummary, Payload};

/// Operations the fetcher needs from an authenticated mail account
#[async_trait]
pub trait MailService: Send + Sync {
    /// List one page of sent-message IDs, starting at `page_token` if given
    async fn list_sent_message_ids(&self, page_token: Option<String>) -> Result<MessagePage>;

    /// Get a message with its full payload tree
    async fn get_message(&self, id: &str) -> Result<MessageSummary>;
}

/// `MailService` backed by the Gmail REST API
///
/// Every call is a single round trip bounded by the configured timeout.
/// Nothing is retried.
pub struct GmailMailService {
    hub: GmailHub,
    label: String,
    page_size: u32,
    request_timeout: Duration,
}

impl GmailMailService {
    pub fn new(hub: GmailHub, config: &FetchConfig) -> Self {
        Self {
            hub,
            label: config.label.clone(),
            page_size: config.page_size,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Await an API call, mapping both API errors and timeouts into `MailError`
    async fn bounded<T, F>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, google_gmail1::Error>>,
    {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => result.map_err(MailError::from),
            Err(_) => {
                warn!("{} timed out after {:?}", operation, self.request_timeout);
                Err(MailError::NetworkError(format!(
                    "{} timed out after {:?}",
                    operation, self.request_timeout
                )))
            }
        }
    }
}

#[async_trait]
impl MailService for GmailMailService {
    async fn list_sent_message_ids(&self, page_token: Option<String>) -> Result<MessagePage> {
        let mut call = self
            .hub
            .users()
            .messages_list("me")
            .add_label_ids(&self.label)
            .max_results(self.page_size);

        if let Some(token) = page_token.as_deref() {
            call = call.page_token(token);
        }

        let (_, response) = self
            .bounded("messages.list", call.add_scope(READONLY_SCOPES[0]).doit())
            .await?;

        let ids: Vec<String> = response
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|msg_ref| msg_ref.id)
            .collect();

        debug!(
            "Listed {} message IDs (more pages: {})",
            ids.len(),
            response.next_page_token.is_some()
        );

        Ok(MessagePage::new(ids, response.next_page_token))
    }

    async fn get_message(&self, id: &str) -> Result<MessageSummary> {
        let call = self
            .hub
            .users()
            .messages_get("me", id)
            .format("full")
            .add_scope(READONLY_SCOPES[0])
            .doit();

        let (_, message) = self.bounded("messages.get", call).await?;

        let payload = match message.payload {
            Some(part) => payload_from_part(part),
            None => {
                debug!("Message {} has no payload", id);
                Payload::empty()
            }
        };

        Ok(MessageSummary {
            id: message.id.unwrap_or_else(|| id.to_string()),
            payload,
        })
    }
}

/// Convert the provider's part tree into a `Payload`
///
/// A part with sub-parts becomes a node. Anything else becomes a leaf whose
/// body is re-encoded as base64url, since the API client hands over raw bytes.
pub fn payload_from_part(part: MessagePart) -> Payload {
    let mime_type = part.mime_type.unwrap_or_default();

    match part.parts {
        Some(children) if !children.is_empty() => Payload::Node {
            mime_type,
            children: children.into_iter().map(payload_from_part).collect(),
        },
        _ => {
            let body = part
                .body
                .and_then(|body| body.data)
                .filter(|data| !data.is_empty())
                .map(encode_body);
            Payload::Leaf { mime_type, body }
        }
    }
}
