use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The only field ever requested from the index.
pub const ORIGINAL_FIELD: &str = "original";

const DATE_FORMAT: &str = "%Y%m%d";

/// Shape of the body the CDX server is asked to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[clap(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// `output=json`: an array of rows, the first row being field names
    #[default]
    Json,
    /// No `output` parameter: one row per line
    Text,
}

/// What to ask the index for. Only `resume_cursor` changes during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub url_pattern: String,
    pub from_date: String,
    pub to_date: String,
    pub page_limit: u32,
    #[serde(default)]
    pub resume_cursor: Option<String>,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl QuerySpec {
    pub fn new(
        url_pattern: impl Into<String>,
        from_date: impl Into<String>,
        to_date: impl Into<String>,
        page_limit: u32,
    ) -> Self {
        QuerySpec {
            url_pattern: url_pattern.into(),
            from_date: from_date.into(),
            to_date: to_date.into(),
            page_limit,
            resume_cursor: None,
            response_format: ResponseFormat::Json,
        }
    }

    pub fn resume_from(mut self, cursor: impl Into<String>) -> Self {
        self.resume_cursor = Some(cursor.into());
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.url_pattern.trim().is_empty() {
            return Err(anyhow::anyhow!("URL pattern is empty"));
        }

        let from = parse_date(&self.from_date).context("Invalid from date")?;
        let to = parse_date(&self.to_date).context("Invalid to date")?;
        if from > to {
            return Err(anyhow::anyhow!(
                "From date {} is after to date {}",
                self.from_date,
                self.to_date
            ));
        }

        if self.page_limit == 0 {
            return Err(anyhow::anyhow!("Page limit must be at least 1"));
        }

        Ok(())
    }

    /// Query parameters for one page request, in the order they are sent.
    /// `last` is only present when a cursor is given.
    pub fn params(&self, cursor: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("url", self.url_pattern.clone()),
            ("from", self.from_date.clone()),
            ("to", self.to_date.clone()),
        ];
        if self.response_format == ResponseFormat::Json {
            params.push(("output", "json".to_string()));
        }
        params.push(("fl", ORIGINAL_FIELD.to_string()));
        params.push(("limit", self.page_limit.to_string()));
        if let Some(last) = cursor {
            params.push(("last", last.to_string()));
        }
        params
    }
}

fn parse_date(date: &str) -> Result<NaiveDate> {
    if date.len() != 8 || !date.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow::anyhow!("{} is not in YYYYMMDD format", date));
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .with_context(|| format!("{} is not a calendar date", date))
}
