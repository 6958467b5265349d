use anyhow::Result;
use clap::Parser;
use indicatif::MultiProgress;
use sent_mail_analysis::cli::{self, Cli};
use std::io::Write;
use std::process;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Writes log lines to stderr with progress bars suspended, so the two never interleave
#[derive(Clone)]
struct SuspendingWriter {
    multi: MultiProgress,
}

impl Write for SuspendingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.multi.suspend(|| std::io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for SuspendingWriter {
    type Writer = SuspendingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        eprintln!("\nFor help, run: sent-mail-analysis --help");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    // rustls needs exactly one process-wide crypto provider
    #[cfg(not(windows))]
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install default crypto provider"))?;

    #[cfg(windows)]
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install default crypto provider"))?;

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sent_mail_analysis=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sent_mail_analysis=info,warn"))
    };

    let multi = MultiProgress::new();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(SuspendingWriter {
            multi: multi.clone(),
        })
        .with_target(false)
        .init();

    tracing::info!("Sent mail analysis starting...");

    let report = cli::run(&cli, multi).await?;
    println!("{}", report);

    Ok(())
}
