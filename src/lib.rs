//! Sent Mail Analysis
//!
//! Reads the bodies of a Gmail account's sent messages and reports how the
//! account owner writes: most common words and bigrams, overall sentiment,
//! and the named entities that come up.
//!
//! # Overview
//!
//! A run is two phases consumed in sequence:
//! - **Fetching**: every page of sent-message IDs is listed, then each
//!   message is fetched with its full MIME tree and all `text/plain` bodies
//!   are decoded, depth-first.
//! - **Analysis**: the bodies are joined into one corpus and passed through
//!   tokenization, stopword removal, word and bigram ranking, sentiment
//!   scoring, part-of-speech tagging and entity chunking.
//!
//! # Example Usage
//!
//! ```no_run
//! use sent_mail_analysis::{auth, client::GmailMailService, config::Config};
//! use sent_mail_analysis::{MessageFetcher, TextAnalyzer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml".as_ref()).await?;
//!
//!     let hub = auth::initialize_gmail_hub(
//!         "credentials.json".as_ref(),
//!         "token.json".as_ref(),
//!     ).await?;
//!
//!     let fetcher = MessageFetcher::new(Box::new(GmailMailService::new(hub, &config.fetch)));
//!     let texts = fetcher.fetch_sent_bodies().await.unwrap_or_default();
//!
//!     let result = TextAnalyzer::from_config(&config.analysis)?.analyze(&texts);
//!     println!("{}", sent_mail_analysis::report::render_text(&result));
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`analysis`] - Text analysis pipeline and its language capabilities
//! - [`auth`] - OAuth2 authentication and Gmail API initialization
//! - [`cli`] - Command-line interface and run orchestration
//! - [`client`] - Mail service trait and the Gmail implementation
//! - [`config`] - Configuration management
//! - [`error`] - Error types and result aliases
//! - [`fetcher`] - Paginated listing and body retrieval
//! - [`mime`] - Plain-text extraction from MIME payload trees
//! - [`models`] - Core data structures
//! - [`report`] - Text and JSON rendering

pub mod analysis;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod mime;
pub mod models;
pub mod report;

pub use error::{MailError, Result};

pub use models::{DecodedText, MessagePage, MessageSummary, Payload};

pub use analysis::{AnalysisResult, TextAnalyzer};
pub use client::{GmailMailService, MailService};
pub use config::{Config, OutputFormat};
pub use fetcher::{FetchProgress, MessageFetcher, ProgressCallback};
pub use mime::{decode_body, extract_plain_text};
