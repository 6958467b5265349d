//! Sent-message fetcher: paginated listing followed by in-order body retrieval

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::client::MailService;
use crate::error::{MailError, Result};
use crate::mime::extract_plain_text;
use crate::models::DecodedText;

/// Progress events emitted while fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchProgress {
    /// A listing page arrived; `total` IDs collected so far
    PageListed { page: usize, total: usize },
    /// Listing finished with `total` unique IDs
    ListingComplete { total: usize },
    /// One more message body was fetched
    MessageFetched,
}

/// Progress callback type for fetch operations
pub type ProgressCallback = Arc<dyn Fn(FetchProgress) + Send + Sync>;

/// Fetches the bodies of every sent message, strictly in sequence.
///
/// All listing pages are requested before any message is fetched, and
/// messages are fetched in the order the API listed them. The first
/// failing call ends the fetch; no partial result is returned.
pub struct MessageFetcher {
    service: Box<dyn MailService>,
    on_progress: Option<ProgressCallback>,
}

impl MessageFetcher {
    pub fn new(service: Box<dyn MailService>) -> Self {
        Self {
            service,
            on_progress: None,
        }
    }

    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    fn report(&self, event: FetchProgress) {
        if let Some(callback) = &self.on_progress {
            callback(event);
        }
    }

    /// Collect every sent-message ID across all listing pages.
    ///
    /// Stops at the first page without a continuation token. IDs already
    /// seen are dropped so no message is fetched twice.
    pub async fn list_sent_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut seen = HashSet::new();
        let mut seen_tokens = HashSet::new();
        let mut page_token: Option<String> = None;
        let mut page = 0;

        loop {
            page += 1;
            let response = self.service.list_sent_message_ids(page_token.take()).await?;

            for id in response.ids {
                if seen.insert(id.clone()) {
                    ids.push(id);
                } else {
                    debug!("Dropping duplicate message ID {}", id);
                }
            }

            debug!("Listing page {}: {} IDs so far", page, ids.len());
            self.report(FetchProgress::PageListed {
                page,
                total: ids.len(),
            });

            match response.next_page_token {
                Some(token) => {
                    if !seen_tokens.insert(token.clone()) {
                        return Err(MailError::ApiError(format!(
                            "listing returned page token {:?} twice",
                            token
                        )));
                    }
                    page_token = Some(token);
                }
                None => break,
            }
        }

        self.report(FetchProgress::ListingComplete { total: ids.len() });
        Ok(ids)
    }

    /// List all sent messages, fetch each one and extract its plain-text bodies.
    ///
    /// Bodies are returned message by message in listing order, and within a
    /// message in depth-first part order.
    pub async fn fetch_sent_bodies(&self) -> Result<Vec<DecodedText>> {
        let ids = self.list_sent_ids().await?;

        if ids.is_empty() {
            info!("No sent messages found");
            return Ok(Vec::new());
        }

        info!("Fetching {} sent messages", ids.len());

        let mut texts = Vec::new();
        for id in &ids {
            let message = self.service.get_message(id).await?;
            let bodies = extract_plain_text(&message.payload);
            debug!(
                "Message {}: {} plain-text bodies out of {} parts",
                message.id,
                bodies.len(),
                message.payload.leaf_count()
            );
            texts.extend(bodies);
            self.report(FetchProgress::MessageFetched);
        }

        info!(
            "Extracted {} plain-text bodies from {} messages",
            texts.len(),
            ids.len()
        );
        Ok(texts)
    }
}
