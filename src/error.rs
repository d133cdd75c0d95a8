use thiserror::Error;

/// Everything that can end a scrape invocation.
///
/// Cards without a parseable price are not represented here: they are
/// dropped from the sample during extraction.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("unparseable date \"{input}\"")]
    UnparseableDate { input: String },

    #[error("invalid search request: {reason}")]
    InvalidRequest { reason: String },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("no listings matching \"{selector}\" appeared within {timeout_ms}ms")]
    ListingsNotFound { selector: String, timeout_ms: u128 },

    #[error("page script failed: {reason}")]
    Script { reason: String },

    #[error("browser session error: {reason}")]
    Browser { reason: String },
}

impl ScrapeError {
    /// Wraps a browser-layer error, keeping its full context chain.
    pub fn browser(err: impl std::fmt::Display) -> Self {
        Self::Browser {
            reason: format!("{err:#}"),
        }
    }

    pub fn script(err: impl std::fmt::Display) -> Self {
        Self::Script {
            reason: format!("{err:#}"),
        }
    }
}

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;
