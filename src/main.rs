//! drivescan CLI entry point.

use std::io::{self, BufWriter, Write};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use drivescan::http::{DEFAULT_API_BASE, TOKEN_ENV_VARS};
use drivescan::{ClientConfig, DriveClient, Entry, ScanError, DEFAULT_PAGE_SIZE};

/// Recursively list a Google Drive folder, one record per line.
#[derive(Debug, Parser)]
#[command(name = "drivescan", version, about)]
struct Cli {
    /// The id of the Google Drive folder to scan.
    #[arg(short = 'f', long = "folder-id", alias = "folder_id", env = "DRIVESCAN_FOLDER_ID")]
    folder_id: String,

    /// Max depth to reach while scanning folders.
    #[arg(short = 'd', long = "max-depth", alias = "max_depth", default_value_t = 3)]
    max_depth: usize,

    /// Only list entries of this MIME type (repeatable).
    #[arg(short = 'm', long = "mime-type")]
    mime_types: Vec<String>,

    /// Children requested per listing page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl)]
    format: OutputFormat,

    /// OAuth bearer token. Falls back to GOOGLE_OAUTH_ACCESS_TOKEN.
    #[arg(long, env = "DRIVESCAN_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Drive API root.
    #[arg(long, env = "DRIVESCAN_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One JSON object per entry
    Jsonl,
    /// `path (url)` per entry
    Text,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let env = ClientConfig::from_env();
    let client = DriveClient::new(ClientConfig {
        api_base:     cli.api_base,
        access_token: cli.access_token.or(env.access_token),
        timeout:      Duration::from_secs(cli.timeout_secs),
    })
    .with_context(|| format!("checked --access-token and {}", TOKEN_ENV_VARS.join(", ")))?;

    let walk = drivescan::scan()
        .service(client)
        .folder_id(&cli.folder_id)
        .max_depth(cli.max_depth)
        .mime_types(cli.mime_types)
        .page_size(cli.page_size)
        .walk()
        .with_context(|| format!("resolving folder {}", cli.folder_id))?;

    let stdout = io::stdout();
    write_entries(BufWriter::new(stdout.lock()), walk, cli.format)
}

/// Write one record per line in `format`, stopping at the first scan error.
fn write_entries<W, I>(mut out: W, entries: I, format: OutputFormat) -> anyhow::Result<()>
where
    W: Write,
    I: IntoIterator<Item = Result<Entry, ScanError>>,
{
    for entry in entries {
        let entry = entry.context("scan aborted")?;
        match format {
            OutputFormat::Jsonl => {
                serde_json::to_writer(&mut out, &entry.export())?;
                writeln!(out)?;
            }
            OutputFormat::Text => writeln!(out, "{entry}")?,
        }
    }
    out.flush()?;

    Ok(())
}
