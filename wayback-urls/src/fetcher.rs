use crate::cdx::{parse_page, Page};
use crate::error::PageError;
use crate::query::QuerySpec;
use crate::sink::{OutputFormat, UrlSink};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

pub const CDX_ENDPOINT: &str = "http://web.archive.org/cdx/search/cdx";

// Enough of an error body to tell a rate-limit page from a stack trace
const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Stop after this many non-empty pages. `None` runs until the index is exhausted.
    pub max_pages: Option<usize>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        FetcherConfig {
            endpoint: CDX_ENDPOINT.to_string(),
            timeout: Duration::from_secs(120),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            max_pages: None,
        }
    }
}

/// Why the fetch loop ended.
#[derive(Debug)]
pub enum StopReason {
    /// The index returned a header-only or empty page
    Exhausted,
    PageFailed(PageError),
    /// A page ended on the cursor it was requested with, so the next request would repeat it
    CursorStalled,
    PageCapReached,
}

impl StopReason {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, StopReason::Exhausted)
    }
}

#[derive(Debug)]
pub struct FetchSummary {
    pub total: usize,
    pub pages: usize,
    /// Cursor the next page would be requested with; pass it back as the resume cursor.
    pub last_cursor: Option<String>,
    pub stop: StopReason,
}

pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Fetcher { client, config })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Request a single page of results following `cursor`.
    pub fn fetch_page(&self, query: &QuerySpec, cursor: Option<&str>) -> Result<Page, PageError> {
        let params = query.params(cursor);
        debug!("GET {} {:?}", self.config.endpoint, params);

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&params)
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .unwrap_or_default()
                .chars()
                .take(ERROR_BODY_PREVIEW)
                .collect();
            return Err(PageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text()?;
        parse_page(&body, query.response_format)
    }

    /// Page through the index, appending every record to `sink`.
    ///
    /// A page that cannot be fetched or parsed ends the run without an error:
    /// everything already appended stays in the sink and the failure is
    /// reported in [`FetchSummary::stop`]. Only sink write failures are returned
    /// as errors.
    pub fn run<W: Write>(&self, query: &QuerySpec, sink: &mut UrlSink<W>) -> Result<FetchSummary> {
        let mut total = 0;
        let mut pages = 0;
        let mut cursor = query.resume_cursor.clone();

        let stop = loop {
            if self.config.max_pages.is_some_and(|max| pages >= max) {
                info!("Reached the limit of {} pages", pages);
                break StopReason::PageCapReached;
            }

            let page = match self.fetch_page(query, cursor.as_deref()) {
                Ok(page) => page,
                Err(e) => {
                    error!("Error: {}", e);
                    break StopReason::PageFailed(e);
                }
            };

            let Some(last) = page.last().map(str::to_string) else {
                break StopReason::Exhausted;
            };

            total += sink.append(&page.records)?;
            pages += 1;
            info!("Fetched and saved {} URLs so far...", total);

            let sent = cursor.replace(last);
            if sent == cursor {
                warn!(
                    "Page {} ended on its own cursor {:?}; stopping to avoid re-fetching it",
                    pages,
                    cursor.as_deref().unwrap_or_default()
                );
                break StopReason::CursorStalled;
            }
        };

        info!("Finished fetching. Total URLs saved: {}", total);

        Ok(FetchSummary {
            total,
            pages,
            last_cursor: cursor,
            stop,
        })
    }
}

/// Fetch everything `query` matches into a new file at `path`.
pub fn save_to_file<P: AsRef<Path>>(
    fetcher: &Fetcher,
    query: &QuerySpec,
    path: P,
    format: OutputFormat,
) -> Result<FetchSummary> {
    query.validate()?;

    let mut sink = UrlSink::create(&path, format)?;
    let summary = fetcher.run(query, &mut sink)?;
    sink.finish()
        .with_context(|| format!("Failed to finish {}", path.as_ref().display()))?;

    Ok(summary)
}

/// Like [`save_to_file`], returning only the number of URLs saved.
pub fn fetch_to_file<P: AsRef<Path>>(
    fetcher: &Fetcher,
    query: &QuerySpec,
    path: P,
    format: OutputFormat,
) -> Result<usize> {
    save_to_file(fetcher, query, path, format).map(|summary| summary.total)
}
