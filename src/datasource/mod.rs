//! Sources of raw trade-history text and the CSV parser that turns it into records.

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub mod parser;
pub mod mock;
pub mod sample;

pub use parser::{parse_trade_csv, ParseError};
pub use mock::StaticTradeSource;
pub use sample::SampleDataSource;

/// Something that can produce the raw text of a trade-history CSV.
///
/// Reading is the only asynchronous step; everything downstream of the text is
/// synchronous.
#[async_trait]
pub trait TradeSource: Send + Sync + fmt::Debug {
    /// Human-readable name of the dataset (file name, URL, ...).
    fn name(&self) -> String;

    /// Load the full CSV text.
    async fn load(&self) -> Result<String, SourceError>;
}

/// Failure to obtain CSV text. Distinct from [`ParseError`], which concerns
/// the content itself.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error {status}")]
    Http { status: u16 },
}

/// Trade history stored on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileTradeSource {
    path: PathBuf,
}

impl FileTradeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TradeSource for FileTradeSource {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    async fn load(&self) -> Result<String, SourceError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io(format!("{}: {}", self.path.display(), e)))
    }
}
