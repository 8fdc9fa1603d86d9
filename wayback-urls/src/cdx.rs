use crate::error::PageError;
use crate::query::{ResponseFormat, ORIGINAL_FIELD};

/// Records from one CDX response, header row already removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub records: Vec<String>,
}

impl Page {
    /// An empty page means the index has nothing after the cursor.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn last(&self) -> Option<&str> {
        self.records.last().map(String::as_str)
    }
}

pub fn parse_page(body: &str, format: ResponseFormat) -> Result<Page, PageError> {
    match format {
        ResponseFormat::Json => parse_json_page(body),
        ResponseFormat::Text => Ok(parse_text_page(body)),
    }
}

/// `[["original"], ["http://a/"], ...]`. The first row is always field names.
pub fn parse_json_page(body: &str) -> Result<Page, PageError> {
    // The server answers an exhausted query with an empty body, not `[]`
    if body.trim().is_empty() {
        return Ok(Page::default());
    }

    let rows: Vec<Vec<String>> = serde_json::from_str(body)
        .map_err(|e| PageError::malformed(format!("not a JSON array of string rows: {}", e)))?;

    let mut records = Vec::with_capacity(rows.len().saturating_sub(1));
    for (index, row) in rows.into_iter().enumerate().skip(1) {
        let original = row
            .into_iter()
            .next()
            .ok_or_else(|| PageError::malformed(format!("row {} has no fields", index)))?;
        records.push(original);
    }

    Ok(Page { records })
}

/// One record per line. A leading `original` line is a header and is dropped.
pub fn parse_text_page(body: &str) -> Page {
    let mut lines = body.lines().filter(|line| !line.is_empty()).peekable();
    if lines.peek() == Some(&ORIGINAL_FIELD) {
        lines.next();
    }
    Page {
        records: lines.map(str::to_string).collect(),
    }
}

