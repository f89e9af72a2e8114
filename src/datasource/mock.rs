//! In-memory trade source for tests and embedding.

use super::{SourceError, TradeSource};
use async_trait::async_trait;

/// Trade source that returns predefined CSV text, or a predefined failure.
#[derive(Debug, Clone)]
pub struct StaticTradeSource {
    name: String,
    content: Result<String, SourceError>,
}

impl StaticTradeSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Ok(content.into()),
        }
    }

    /// A source whose every load fails with `error`.
    pub fn failing(name: impl Into<String>, error: SourceError) -> Self {
        Self {
            name: name.into(),
            content: Err(error),
        }
    }
}

#[async_trait]
impl TradeSource for StaticTradeSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn load(&self) -> Result<String, SourceError> {
        self.content.clone()
    }
}
