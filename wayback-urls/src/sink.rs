use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const CSV_HEADER: &str = "URL";

/// On-disk layout of the saved URL list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Single `URL` column with a header row
    Csv,
    /// One URL per line, no header
    Text,
}

impl OutputFormat {
    /// `.txt` files get plain text, anything else CSV.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("txt") => OutputFormat::Text,
            _ => OutputFormat::Csv,
        }
    }
}

/// Append-only destination for archived URLs.
#[derive(Debug)]
pub struct UrlSink<W: Write> {
    writer: W,
    format: OutputFormat,
    written: usize,
}

impl UrlSink<BufWriter<File>> {
    /// Create (or truncate) `path` and write the header the format needs.
    pub fn create<P: AsRef<Path>>(path: P, format: OutputFormat) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref)
            .with_context(|| format!("Failed to create output file: {}", path_ref.display()))?;
        UrlSink::new(BufWriter::new(file), format)
    }
}

impl<W: Write> UrlSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Result<Self> {
        let mut sink = UrlSink {
            writer,
            format,
            written: 0,
        };
        if format == OutputFormat::Csv {
            sink.write_line(CSV_HEADER)?;
        }
        Ok(sink)
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Records appended so far, not counting the header.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn append<S: AsRef<str>>(&mut self, records: &[S]) -> Result<usize> {
        for record in records {
            let record = record.as_ref();
            match self.format {
                OutputFormat::Csv => self.write_line(&csv_field(record))?,
                OutputFormat::Text => self.write_line(record)?,
            }
        }
        self.written += records.len();
        Ok(records.len())
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush().context("Failed to flush output")?;
        Ok(self.writer)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        let terminator = match self.format {
            OutputFormat::Csv => "\r\n",
            OutputFormat::Text => "\n",
        };
        self.writer
            .write_all(line.as_bytes())
            .and_then(|_| self.writer.write_all(terminator.as_bytes()))
            .context("Failed to write to output")
    }
}

/// Quote a CSV field only when it contains a delimiter, quote or line break.
pub fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\r' | '\n')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
