use thiserror::Error;

/// Why a single CDX page could not be read.
///
/// None of these are fatal to a run: the fetch loop stops, keeps what it has
/// already written, and reports the failure in its summary.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("CDX server returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("CDX request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed CDX response: {reason}")]
    Malformed { reason: String },
}

impl PageError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        PageError::Malformed {
            reason: reason.into(),
        }
    }
}
