use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wayback_urls::{
    save_to_file, Fetcher, FetcherConfig, OutputFormat, QuerySpec, ResponseFormat, StopReason,
    CDX_ENDPOINT,
};

const DEFAULT_FROM: &str = "19960101";
const DEFAULT_TO: &str = "20240101";
const DEFAULT_LIMIT: u32 = 100_000;

/// Save every archived original URL matching a pattern from the Wayback Machine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// URL pattern, e.g. '*.example.com/*' (required unless --job is given)
    url_pattern: Option<String>,

    /// Start date (YYYYMMDD) [default: 19960101]
    #[arg(long)]
    from: Option<String>,

    /// End date (YYYYMMDD) [default: 20240101]
    #[arg(long)]
    to: Option<String>,

    /// Records per request [default: 100000]
    #[arg(long)]
    limit: Option<u32>,

    /// Resume after this URL, the last one saved by a previous run
    #[arg(long)]
    resume_from: Option<String>,

    /// Read the query from a JSON job file instead of the flags above
    #[arg(long, conflicts_with_all = ["url_pattern", "from", "to", "limit"])]
    job: Option<PathBuf>,

    /// Output file
    #[arg(long, short, default_value = "urls.csv")]
    output: PathBuf,

    /// Output format: csv or text [default: from the output extension]
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Response format to request from the CDX server [default: json]
    #[arg(long, value_enum)]
    response: Option<ResponseFormat>,

    /// CDX endpoint
    #[arg(long, default_value = CDX_ENDPOINT)]
    endpoint: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Stop after this many pages
    #[arg(long)]
    max_pages: Option<usize>,
}

impl Cli {
    fn query(&self) -> Result<QuerySpec> {
        let mut query = match &self.job {
            Some(job_path) => load_job(job_path)?,
            None => {
                let pattern = self
                    .url_pattern
                    .clone()
                    .context("Please provide a URL pattern or a --job file")?;
                QuerySpec::new(
                    pattern,
                    self.from.as_deref().unwrap_or(DEFAULT_FROM),
                    self.to.as_deref().unwrap_or(DEFAULT_TO),
                    self.limit.unwrap_or(DEFAULT_LIMIT),
                )
            }
        };

        if let Some(response) = self.response {
            query.response_format = response;
        }

        if let Some(cursor) = &self.resume_from {
            query.resume_cursor = Some(cursor.clone());
        }

        Ok(query)
    }
}

fn load_job(job_path: &Path) -> Result<QuerySpec> {
    let job_file = File::open(job_path)
        .with_context(|| format!("Failed to open job file: {}", job_path.display()))?;
    serde_json::from_reader(BufReader::new(job_file))
        .with_context(|| format!("Failed to parse job JSON from {}", job_path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let query = cli.query()?;
    let format = cli
        .format
        .unwrap_or_else(|| OutputFormat::from_path(&cli.output));

    let fetcher = Fetcher::new(FetcherConfig {
        endpoint: cli.endpoint.clone(),
        timeout: Duration::from_secs(cli.timeout_secs),
        max_pages: cli.max_pages,
        ..FetcherConfig::default()
    })?;

    println!(
        "Fetching {} ({} to {}) into {}...",
        query.url_pattern,
        query.from_date,
        query.to_date,
        cli.output.display()
    );

    let summary = save_to_file(&fetcher, &query, &cli.output, format)?;

    println!(
        "Saved {} URLs to {} in {} pages.",
        summary.total,
        cli.output.display(),
        summary.pages
    );

    match &summary.stop {
        StopReason::Exhausted => {}
        StopReason::PageFailed(e) => println!("Stopped early: {}", e),
        StopReason::CursorStalled => println!("Stopped early: the server repeated the cursor"),
        StopReason::PageCapReached => println!("Stopped after {} pages", summary.pages),
    }

    if !summary.stop.is_exhausted() {
        if let Some(cursor) = &summary.last_cursor {
            println!("To continue, re-run with --resume-from '{}'", cursor);
        }
    }

    Ok(())
}
