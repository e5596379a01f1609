//! Hosted text-classification model over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use trading_core::{
    error::ClassifierError,
    traits::{Sentiment, SentimentClassifier},
};
use tracing::debug;

/// Default hosted sentiment model.
pub const DEFAULT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/distilbert-base-uncased-finetuned-sst-2-english";

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

/// Classifier backed by an inference endpoint that accepts `{"inputs": text}`
/// and answers with `[[{"label": "POSITIVE", "score": 0.99}, ...]]`.
pub struct HttpClassifier {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HttpClassifier {
    /// Build the classifier.
    ///
    /// Fails with `ClassifierError::Initialization` when the endpoint is not a
    /// valid URL or the HTTP client cannot be constructed.
    pub fn new(
        endpoint: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClassifierError> {
        let endpoint = endpoint.into();
        reqwest::Url::parse(&endpoint).map_err(|e| {
            ClassifierError::Initialization(format!("invalid endpoint {}: {}", endpoint, e))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifierError::Initialization(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Pick the highest-scoring label from a classifier response.
fn parse_response(body: ClassifyResponse) -> Result<Sentiment, ClassifierError> {
    let labels = match body {
        ClassifyResponse::Batched(mut batches) => {
            if batches.is_empty() {
                return Err(ClassifierError::Malformed("empty response".into()));
            }
            batches.swap_remove(0)
        }
        ClassifyResponse::Flat(labels) => labels,
    };

    let best = labels
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| ClassifierError::Malformed("no labels in response".into()))?;

    if !(0.0..=1.0).contains(&best.score) {
        return Err(ClassifierError::Malformed(format!(
            "score out of range: {}",
            best.score
        )));
    }

    match best.label.to_uppercase().as_str() {
        "POSITIVE" | "POS" | "LABEL_1" => Ok(Sentiment::positive(best.score)),
        "NEGATIVE" | "NEG" | "LABEL_0" => Ok(Sentiment::negative(best.score)),
        other => Err(ClassifierError::Malformed(format!("unknown label {}", other))),
    }
}

#[async_trait]
impl SentimentClassifier for HttpClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&ClassifyRequest { inputs: text });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Request(format!(
                "classifier returned {}: {}",
                status, error_text
            )));
        }

        let body: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

        let sentiment = parse_response(body)?;
        debug!(polarity = ?sentiment.polarity, score = sentiment.score, "classified text");
        Ok(sentiment)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trading_core::traits::Polarity;

    fn parse(json: serde_json::Value) -> Result<Sentiment, ClassifierError> {
        let body: ClassifyResponse = serde_json::from_value(json).unwrap();
        parse_response(body)
    }

    #[test]
    fn test_parse_batched_response() {
        let sentiment = parse(serde_json::json!([[
            {"label": "NEGATIVE", "score": 0.02},
            {"label": "POSITIVE", "score": 0.98}
        ]]))
        .unwrap();

        assert_eq!(sentiment.polarity, Polarity::Positive);
        assert!((sentiment.score - 0.98).abs() < 1e-12);
    }

    #[test]
    fn test_parse_flat_response() {
        let sentiment = parse(serde_json::json!([{"label": "negative", "score": 0.7}])).unwrap();
        assert_eq!(sentiment.polarity, Polarity::Negative);
    }

    #[test]
    fn test_parse_rejects_unknown_label() {
        let result = parse(serde_json::json!([[{"label": "NEUTRAL", "score": 0.9}]]));
        assert!(matches!(result, Err(ClassifierError::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            parse(serde_json::json!([])),
            Err(ClassifierError::Malformed(_))
        ));
    }

    #[test]
    fn test_invalid_endpoint_fails_initialization() {
        let result = HttpClassifier::new("not a url", None, Duration::from_secs(5));
        assert!(matches!(result, Err(ClassifierError::Initialization(_))));
    }

    #[test]
    fn test_default_model_url_is_valid() {
        let classifier =
            HttpClassifier::new(DEFAULT_MODEL_URL, None, Duration::from_secs(5)).unwrap();
        assert_eq!(classifier.endpoint(), DEFAULT_MODEL_URL);
    }
}
