//! Text inputs for sentiment-driven strategies.

use crate::error::{ClassifierError, DataError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Polarity reported by a binary sentiment classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

/// Classifier verdict for one text snippet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub polarity: Polarity,
    /// Confidence in `polarity`, between 0 and 1
    pub score: f64,
}

impl Sentiment {
    pub fn positive(score: f64) -> Self {
        Self {
            polarity: Polarity::Positive,
            score,
        }
    }

    pub fn negative(score: f64) -> Self {
        Self {
            polarity: Polarity::Negative,
            score,
        }
    }
}

/// Source of news or chat snippets about a symbol.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Fetch the current snippets for a symbol. Empty strings are allowed.
    async fn fetch(&self, symbol: &str) -> Result<Vec<String>, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}

/// Binary sentiment classifier.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify a single snippet.
    async fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError>;

    /// Get the classifier name.
    fn name(&self) -> &str;
}
