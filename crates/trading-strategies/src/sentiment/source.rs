//! Fixed text sources.

use async_trait::async_trait;
use trading_core::{error::DataError, traits::TextSource};

/// Placeholder news line used when no news feed is configured.
pub const DEFAULT_NEWS_TEXT: &str =
    "The company has reported record earnings and strong growth prospects.";

/// Placeholder chat line used when no chat feed is configured.
pub const DEFAULT_CHAT_TEXT: &str = "Investors are excited about the future of this company!";

/// Returns the same snippets for every symbol.
#[derive(Debug, Clone)]
pub struct StaticTextSource {
    name: String,
    texts: Vec<String>,
}

impl StaticTextSource {
    pub fn new(name: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            name: name.into(),
            texts,
        }
    }

    /// Default news placeholder.
    pub fn news() -> Self {
        Self::new("news", vec![DEFAULT_NEWS_TEXT.to_string()])
    }

    /// Default chat placeholder.
    pub fn chat() -> Self {
        Self::new("chat", vec![DEFAULT_CHAT_TEXT.to_string()])
    }
}

#[async_trait]
impl TextSource for StaticTextSource {
    async fn fetch(&self, _symbol: &str) -> Result<Vec<String>, DataError> {
        Ok(self.texts.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults() {
        let news = StaticTextSource::news();
        assert_eq!(news.name(), "news");
        assert_eq!(news.fetch("AAPL").await.unwrap(), vec![DEFAULT_NEWS_TEXT]);

        let chat = StaticTextSource::chat();
        assert_eq!(chat.fetch("MSFT").await.unwrap(), vec![DEFAULT_CHAT_TEXT]);
    }
}
