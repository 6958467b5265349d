//! Command-line interface and the fetch-then-analyze run

use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::analysis::{AnalysisResult, TextAnalyzer};
use crate::auth;
use crate::client::GmailMailService;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::fetcher::{FetchProgress, MessageFetcher};
use crate::models::DecodedText;

/// Every flag has a default, so running with no arguments performs one full run
#[derive(Parser, Debug)]
#[command(name = "sent-mail-analysis")]
#[command(version)]
#[command(about = "Word, bigram, sentiment and entity statistics over your sent mail", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Path to OAuth2 credentials file
    #[arg(long, default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Path to token cache file
    #[arg(long, default_value = "token.json")]
    pub token_cache: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Progress reporter using indicatif, drawn on stderr
pub struct ProgressReporter {
    multi: MultiProgress,
    spinner_style: ProgressStyle,
    bar_style: ProgressStyle,
}

impl ProgressReporter {
    pub fn new(multi: MultiProgress) -> Self {
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed:>6}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");

        let bar_style = ProgressStyle::default_bar()
            .template("[{elapsed:>6}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");

        Self {
            multi,
            spinner_style,
            bar_style,
        }
    }

    pub fn add_spinner(&self, msg: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(self.spinner_style.clone());
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// A bar that stays invisible until it is added to the `MultiProgress`
    pub fn detached_progress_bar(&self, msg: &str) -> ProgressBar {
        let pb = ProgressBar::hidden();
        pb.set_style(self.bar_style.clone());
        pb.set_message(msg.to_string());
        pb
    }

    /// Clear a finished bar and leave a one-line summary on stderr
    pub fn finish(&self, pb: &ProgressBar, msg: &str) {
        pb.finish_and_clear();
        let _ = self.multi.println(format!("  ✓ {}", msg));
    }
}

/// Load configuration, authenticate, fetch sent mail and analyze it.
///
/// Returns the rendered report. A failed fetch is logged and analysis runs
/// on an empty corpus, unless `fetch.fail_on_error` is set.
pub async fn run(cli: &Cli, multi: MultiProgress) -> Result<String> {
    let reporter = ProgressReporter::new(multi);

    let config = Config::load(&cli.config).await?;
    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output.format
    };

    // Resolve language resources before touching the network
    let analyzer = TextAnalyzer::from_config(&config.analysis)?;

    let auth_spinner = reporter.add_spinner("Authenticating with Gmail API...");
    let hub = auth::initialize_gmail_hub(&cli.credentials, &cli.token_cache).await?;
    reporter.finish(&auth_spinner, "Gmail API authenticated");

    let service = GmailMailService::new(hub, &config.fetch);
    let texts = fetch_bodies(service, &reporter, config.fetch.fail_on_error).await?;

    let result: AnalysisResult = analyzer.analyze(&texts);
    info!(
        "Analysis complete: {} words, {} bigrams, {} entities",
        result.top_words.len(),
        result.top_bigrams.len(),
        result.entities.len()
    );

    crate::report::render(&result, format)
}

async fn fetch_bodies(
    service: GmailMailService,
    reporter: &ProgressReporter,
    fail_on_error: bool,
) -> Result<Vec<DecodedText>> {
    let list_spinner = reporter.add_spinner("Listing sent messages...");
    let fetch_bar = reporter.detached_progress_bar("Fetching message bodies...");

    let on_progress = {
        let list_spinner = list_spinner.clone();
        let fetch_bar = fetch_bar.clone();
        let multi = reporter.multi.clone();
        Arc::new(move |event: FetchProgress| match event {
            FetchProgress::PageListed { page, total } => {
                list_spinner.set_message(format!(
                    "Listing sent messages... page {}, {} found",
                    page, total
                ));
            }
            FetchProgress::ListingComplete { total } => {
                list_spinner.finish_and_clear();
                let _ = multi.println(format!("  ✓ Found {} sent messages", total));
                multi.add(fetch_bar.clone());
                fetch_bar.set_length(total as u64);
            }
            FetchProgress::MessageFetched => fetch_bar.inc(1),
        })
    };

    let fetcher = MessageFetcher::new(Box::new(service)).with_progress(on_progress);

    match fetcher.fetch_sent_bodies().await {
        Ok(texts) => {
            reporter.finish(
                &fetch_bar,
                &format!("Extracted {} plain-text bodies", texts.len()),
            );
            Ok(texts)
        }
        Err(e) => {
            list_spinner.finish_and_clear();
            fetch_bar.finish_and_clear();
            if fail_on_error {
                return Err(e);
            }
            if e.is_transient() {
                warn!(
                    "Fetching sent mail failed ({}); a later run may succeed. Analyzing no messages",
                    e
                );
            } else {
                warn!("Fetching sent mail failed ({}). Analyzing no messages", e);
            }
            Ok(Vec::new())
        }
    }
}
