//! Sentiment strategy.
//!
//! Gathers snippets from every text source, classifies each one and compares
//! the summed positive and negative confidences.

mod http;
mod lexicon;
mod source;

pub use http::{HttpClassifier, DEFAULT_MODEL_URL};
pub use lexicon::LexiconClassifier;
pub use source::{StaticTextSource, DEFAULT_CHAT_TEXT, DEFAULT_NEWS_TEXT};

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use trading_core::{
    error::{ClassifierError, DataError, StrategyError},
    traits::{Polarity, SentimentClassifier, SignalGenerator, StrategyConfig, TextSource},
    types::{PriceSeries, Signal},
};
use tracing::{debug, warn};

/// Which classifier backs the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Built-in financial word lists
    #[default]
    Lexicon,
    /// Hosted inference endpoint
    Http,
}

/// Configuration for the sentiment strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SentimentConfig {
    pub classifier: ClassifierKind,
    /// Inference endpoint for the `http` classifier
    pub model_url: String,
    /// Environment variable holding the endpoint's bearer token
    pub api_token_env: String,
    /// Per-request timeout for the `http` classifier
    pub request_timeout_secs: u64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierKind::Lexicon,
            model_url: DEFAULT_MODEL_URL.to_string(),
            api_token_env: "HF_API_TOKEN".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl StrategyConfig for SentimentConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.classifier == ClassifierKind::Http && self.model_url.trim().is_empty() {
            return Err(StrategyError::InvalidConfig(
                "model_url is required for the http classifier".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(StrategyError::InvalidConfig(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl SentimentConfig {
    /// Construct the configured classifier.
    pub fn build_classifier(&self) -> Result<Arc<dyn SentimentClassifier>, ClassifierError> {
        match self.classifier {
            ClassifierKind::Lexicon => Ok(Arc::new(LexiconClassifier::new())),
            ClassifierKind::Http => {
                let token = std::env::var(&self.api_token_env).ok();
                let classifier = HttpClassifier::new(
                    self.model_url.clone(),
                    token,
                    Duration::from_secs(self.request_timeout_secs),
                )?;
                Ok(Arc::new(classifier))
            }
        }
    }
}

/// Summed classifier confidences for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SentimentTally {
    pub positive: f64,
    pub negative: f64,
    /// Texts that contributed a score
    pub classified: usize,
    /// Texts skipped because they were blank or failed to classify
    pub skipped: usize,
}

impl SentimentTally {
    /// Long on a positive (or tied) majority, Short on a negative one,
    /// Neutral when nothing scored.
    pub fn signal(&self) -> Signal {
        if self.positive + self.negative == 0.0 {
            Signal::Neutral
        } else if self.positive >= self.negative {
            Signal::Long
        } else {
            Signal::Short
        }
    }
}

/// Classify every non-blank text and sum the confidences per polarity.
///
/// A text that fails to classify is logged and left out.
pub async fn aggregate(classifier: &dyn SentimentClassifier, texts: &[String]) -> SentimentTally {
    let mut tally = SentimentTally::default();

    for text in texts {
        if text.trim().is_empty() {
            tally.skipped += 1;
            continue;
        }

        match classifier.classify(text).await {
            Ok(sentiment) => {
                match sentiment.polarity {
                    Polarity::Positive => tally.positive += sentiment.score,
                    Polarity::Negative => tally.negative += sentiment.score,
                }
                tally.classified += 1;
            }
            Err(ClassifierError::Inconclusive) => {
                debug!(classifier = classifier.name(), "no sentiment in text, skipping");
                tally.skipped += 1;
            }
            Err(e) => {
                warn!(classifier = classifier.name(), error = %e, "sentiment analysis failed, skipping text");
                tally.skipped += 1;
            }
        }
    }

    tally
}

/// Sentiment signal generator.
pub struct SentimentStrategy {
    classifier: Arc<dyn SentimentClassifier>,
    sources: Vec<Arc<dyn TextSource>>,
}

impl SentimentStrategy {
    pub fn new(classifier: Arc<dyn SentimentClassifier>, sources: Vec<Arc<dyn TextSource>>) -> Self {
        Self {
            classifier,
            sources,
        }
    }

    /// Fetch every source concurrently and tally the result.
    ///
    /// Any source failure fails the whole fetch.
    pub async fn tally(&self, symbol: &str) -> Result<SentimentTally, StrategyError> {
        let fetches = self.sources.iter().map(|source| async move {
            let fetched = source.fetch(symbol).await?;
            debug!(source = source.name(), count = fetched.len(), "fetched texts");
            Ok::<_, DataError>(fetched)
        });
        let texts: Vec<String> = try_join_all(fetches).await?.into_iter().flatten().collect();

        Ok(aggregate(self.classifier.as_ref(), &texts).await)
    }
}

#[async_trait]
impl SignalGenerator for SentimentStrategy {
    fn name(&self) -> &str {
        "sentiment"
    }

    fn required_bars(&self) -> usize {
        0
    }

    async fn generate(&self, symbol: &str, _series: &PriceSeries) -> Result<Signal, StrategyError> {
        let tally = self.tally(symbol).await?;
        debug!(
            symbol,
            positive = tally.positive,
            negative = tally.negative,
            classified = tally.classified,
            skipped = tally.skipped,
            "sentiment tally"
        );
        Ok(tally.signal())
    }

    fn description(&self) -> &str {
        "Trades the direction of aggregated news and chat sentiment"
    }
}
