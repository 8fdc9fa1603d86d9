pub mod cdx;
pub mod error;
pub mod fetcher;
pub mod query;
pub mod sink;

#[cfg(test)]
pub mod tests;

// Re-export key types and functions for easier access
pub use crate::cdx::{parse_page, Page};
pub use crate::error::PageError;
pub use crate::fetcher::{
    fetch_to_file, save_to_file, FetchSummary, Fetcher, FetcherConfig, StopReason, CDX_ENDPOINT,
};
pub use crate::query::{QuerySpec, ResponseFormat};
pub use crate::sink::{OutputFormat, UrlSink};
