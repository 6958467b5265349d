use serde::{Deserialize, Serialize};

/// UTF-8 text decoded from one `text/plain` body
pub type DecodedText = String;

/// One node of a message's MIME tree
///
/// Leaves carry content, nodes carry ordered sub-parts. Only `text/plain`
/// leaves with body data are ever extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    Leaf {
        mime_type: String,
        /// base64url-encoded body, padding optional
        body: Option<String>,
    },
    Node {
        mime_type: String,
        children: Vec<Payload>,
    },
}

impl Payload {
    pub fn leaf(mime_type: impl Into<String>, body: Option<String>) -> Self {
        Payload::Leaf {
            mime_type: mime_type.into(),
            body,
        }
    }

    pub fn node(mime_type: impl Into<String>, children: Vec<Payload>) -> Self {
        Payload::Node {
            mime_type: mime_type.into(),
            children,
        }
    }

    /// A payload with nothing to extract, used when the provider omits one
    pub fn empty() -> Self {
        Payload::node("multipart/mixed", Vec::new())
    }

    pub fn mime_type(&self) -> &str {
        match self {
            Payload::Leaf { mime_type, .. } | Payload::Node { mime_type, .. } => mime_type,
        }
    }

    /// Number of leaves in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Payload::Leaf { .. } => 1,
            Payload::Node { children, .. } => children.iter().map(Payload::leaf_count).sum(),
        }
    }
}

/// A fetched message: its identifier and full payload tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: String,
    pub payload: Payload,
}

/// One page of a message listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePage {
    pub ids: Vec<String>,
    pub next_page_token: Option<String>,
}

impl MessagePage {
    pub fn new(ids: Vec<String>, next_page_token: Option<String>) -> Self {
        Self {
            ids,
            next_page_token,
        }
    }
}
