//! Common test utilities and fixtures

#![allow(dead_code)]

use mockall::mock;
use sent_mail_analysis::client::MailService;
use sent_mail_analysis::error::Result;
use sent_mail_analysis::mime::encode_body;
use sent_mail_analysis::models::{MessagePage, MessageSummary, Payload};

/// A `text/plain` leaf carrying `text`
pub fn plain(text: &str) -> Payload {
    Payload::leaf("text/plain", Some(encode_body(text)))
}

/// A `text/html` leaf carrying `html`
pub fn html(html: &str) -> Payload {
    Payload::leaf("text/html", Some(encode_body(html)))
}

/// A binary attachment leaf
pub fn attachment(mime_type: &str) -> Payload {
    Payload::leaf(mime_type, Some(encode_body([0u8, 159, 146, 150])))
}

/// The usual shape of a sent reply: plain and HTML alternatives
pub fn alternative(text: &str) -> Payload {
    Payload::node(
        "multipart/alternative",
        vec![plain(text), html(&format!("<div>{}</div>", text))],
    )
}

pub fn message(id: &str, payload: Payload) -> MessageSummary {
    MessageSummary {
        id: id.to_string(),
        payload,
    }
}

pub fn page(ids: &[&str], next_page_token: Option<&str>) -> MessagePage {
    MessagePage::new(
        ids.iter().map(|id| id.to_string()).collect(),
        next_page_token.map(str::to_string),
    )
}

pub fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|t| t.to_string()).collect()
}

// Mock implementation of MailService for testing
mock! {
    pub MailService {}

    #[async_trait::async_trait]
    impl MailService for MailService {
        async fn list_sent_message_ids(&self, page_token: Option<String>) -> Result<MessagePage>;
        async fn get_message(&self, id: &str) -> Result<MessageSummary>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sent_mail_analysis::extract_plain_text;

    #[test]
    fn test_alternative_fixture_extracts_plain_only() {
        assert_eq!(extract_plain_text(&alternative("hi")), vec!["hi"]);
    }

    #[test]
    fn test_page_fixture() {
        let p = page(&["a", "b"], Some("next"));
        assert_eq!(p.ids, vec!["a", "b"]);
        assert_eq!(p.next_page_token.as_deref(), Some("next"));
    }
}
