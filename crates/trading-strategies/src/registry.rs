//! Strategy registry for resolving strategies by name.

use crate::sentiment::StaticTextSource;
use crate::{
    BandReversionConfig, BandReversionStrategy, OscillatorConfig, OscillatorStrategy,
    RegressionTrendConfig, RegressionTrendStrategy, SentimentConfig, SentimentStrategy,
    TrendCrossoverConfig, TrendCrossoverStrategy,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use trading_core::{
    error::StrategyError,
    traits::{SentimentClassifier, SignalGenerator, StrategyConfig, TextSource},
};
use tracing::info;

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Identifier used in configuration and presets
    pub id: String,
    /// Display name
    pub name: String,
    /// Alternative identifiers
    pub aliases: Vec<String>,
    /// Strategy description
    pub description: String,
    /// Default parameters as JSON
    pub default_config: serde_json::Value,
}

/// Collaborators for strategies that read more than prices.
#[derive(Clone, Default)]
pub struct StrategyContext {
    /// Text feeds for the sentiment strategy; the news and chat
    /// placeholders are used when empty
    pub text_sources: Vec<Arc<dyn TextSource>>,
    /// Overrides the classifier named in the sentiment parameters
    pub classifier: Option<Arc<dyn SentimentClassifier>>,
}

impl StrategyContext {
    pub fn with_text_source(mut self, source: Arc<dyn TextSource>) -> Self {
        self.text_sources.push(source);
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn SentimentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }
}

/// Registry for available signal generators.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, StrategyInfo>,
}

fn default_value<T: Serialize + Default>() -> serde_json::Value {
    serde_json::to_value(T::default()).unwrap_or(serde_json::Value::Null)
}

/// Deserialize and validate parameters. `null` means all defaults.
fn parse_config<T>(params: serde_json::Value) -> Result<T, StrategyError>
where
    T: StrategyConfig + DeserializeOwned + Default,
{
    let config: T = if params.is_null() {
        T::default()
    } else {
        serde_json::from_value(params).map_err(|e| StrategyError::InvalidConfig(e.to_string()))?
    };
    config.validate()?;
    Ok(config)
}

impl StrategyRegistry {
    /// Create a new registry with all built-in strategies.
    pub fn new() -> Self {
        let mut strategies = BTreeMap::new();
        let mut register = |id: &str, name: &str, aliases: &[&str], description: &str, default_config| {
            strategies.insert(
                id.to_string(),
                StrategyInfo {
                    id: id.to_string(),
                    name: name.to_string(),
                    aliases: aliases.iter().map(|a| a.to_string()).collect(),
                    description: description.to_string(),
                    default_config,
                },
            );
        };

        register(
            "bollinger_bands",
            "Band Reversion",
            &["band_reversion"],
            "Buys closes at or below the lower Bollinger band, sells at or above the upper band",
            default_value::<BandReversionConfig>(),
        );
        register(
            "moving_average",
            "Trend Crossover",
            &["trend_crossover"],
            "Trades the bar on which the short SMA crosses the long SMA",
            default_value::<TrendCrossoverConfig>(),
        );
        register(
            "rsi",
            "RSI Oscillator",
            &["oscillator"],
            "Buys when RSI is oversold, sells when RSI is overbought",
            default_value::<OscillatorConfig>(),
        );
        register(
            "linear_trend",
            "Regression Trend",
            &["regression_trend", "sklearn", "sklearn_pattern"],
            "Projects a least-squares trend one bar ahead and trades its direction",
            default_value::<RegressionTrendConfig>(),
        );
        register(
            "sentiment",
            "Sentiment",
            &[],
            "Trades the direction of aggregated news and chat sentiment",
            default_value::<SentimentConfig>(),
        );

        Self { strategies }
    }

    /// List all available strategies, ordered by identifier.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().collect()
    }

    /// Get strategy info by identifier or alias, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&StrategyInfo> {
        let name = name.trim();
        self.strategies.values().find(|info| {
            info.id.eq_ignore_ascii_case(name)
                || info.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
        })
    }

    /// Check if a strategy exists.
    pub fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Create a strategy instance from JSON parameters.
    pub fn create(
        &self,
        name: &str,
        params: serde_json::Value,
        context: &StrategyContext,
    ) -> Result<Box<dyn SignalGenerator>, StrategyError> {
        let info = self
            .get(name)
            .ok_or_else(|| StrategyError::NotFound(name.to_string()))?;

        let strategy: Box<dyn SignalGenerator> = match info.id.as_str() {
            "bollinger_bands" => Box::new(BandReversionStrategy::new(parse_config(params)?)),
            "moving_average" => Box::new(TrendCrossoverStrategy::new(parse_config(params)?)),
            "rsi" => Box::new(OscillatorStrategy::new(parse_config(params)?)),
            "linear_trend" => Box::new(RegressionTrendStrategy::new(parse_config(params)?)),
            "sentiment" => {
                let config: SentimentConfig = parse_config(params)?;
                let classifier = match &context.classifier {
                    Some(classifier) => Arc::clone(classifier),
                    None => config
                        .build_classifier()
                        .map_err(|e| StrategyError::InitializationFailed(e.to_string()))?,
                };
                let sources: Vec<Arc<dyn TextSource>> = if context.text_sources.is_empty() {
                    vec![
                        Arc::new(StaticTextSource::news()),
                        Arc::new(StaticTextSource::chat()),
                    ]
                } else {
                    context.text_sources.clone()
                };
                info!(
                    classifier = classifier.name(),
                    sources = sources.len(),
                    "sentiment strategy ready"
                );
                Box::new(SentimentStrategy::new(classifier, sources))
            }
            other => return Err(StrategyError::NotFound(other.to_string())),
        };

        Ok(strategy)
    }

    /// Create a strategy with default parameters.
    pub fn create_default(
        &self,
        name: &str,
        context: &StrategyContext,
    ) -> Result<Box<dyn SignalGenerator>, StrategyError> {
        self.create(name, serde_json::Value::Null, context)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_list() {
        let registry = StrategyRegistry::new();
        let ids: Vec<&str> = registry.list().iter().map(|i| i.id.as_str()).collect();

        assert_eq!(
            ids,
            vec!["bollinger_bands", "linear_trend", "moving_average", "rsi", "sentiment"]
        );
    }

    #[test]
    fn test_registry_aliases() {
        let registry = StrategyRegistry::new();

        assert_eq!(registry.get("sklearn").unwrap().id, "linear_trend");
        assert_eq!(registry.get("band_reversion").unwrap().id, "bollinger_bands");
        assert!(registry.get("unknown").is_none());
        assert!(registry.exists("oscillator"));
    }

    #[test]
    fn test_legacy_module_names_resolve() {
        let registry = StrategyRegistry::new();
        let context = StrategyContext::default();

        assert_eq!(registry.get("skLearn").unwrap().id, "linear_trend");
        assert_eq!(registry.get("Moving_Average").unwrap().id, "moving_average");

        let params = serde_json::json!({"limit": 100, "trend_window": 20});
        let strategy = registry.create("skLearn", params, &context).unwrap();
        assert_eq!(strategy.name(), "linear_trend");
    }

    #[test]
    fn test_create_default() {
        let registry = StrategyRegistry::new();
        let context = StrategyContext::default();

        for info in registry.list() {
            let strategy = registry.create_default(&info.id, &context).unwrap();
            assert_eq!(strategy.name(), info.id);
        }
    }

    #[test]
    fn test_create_with_params() {
        let registry = StrategyRegistry::new();
        let params = serde_json::json!({"short_window": 5, "long_window": 20});

        let strategy = registry
            .create("trend_crossover", params, &StrategyContext::default())
            .unwrap();
        assert_eq!(strategy.required_bars(), 30);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let registry = StrategyRegistry::new();
        let params = serde_json::json!({"short_window": 30, "long_window": 10});

        let result = registry.create("moving_average", params, &StrategyContext::default());
        assert!(matches!(result, Err(StrategyError::InvalidConfig(_))));

        let params = serde_json::json!({"window": "twenty"});
        let result = registry.create("rsi", params, &StrategyContext::default());
        assert!(matches!(result, Err(StrategyError::InvalidConfig(_))));
    }

    #[test]
    fn test_create_unknown_strategy() {
        let registry = StrategyRegistry::new();

        let result = registry.create_default("unknown", &StrategyContext::default());
        assert!(matches!(result, Err(StrategyError::NotFound(name)) if name == "unknown"));
    }

    #[test]
    fn test_sentiment_classifier_init_failure() {
        let registry = StrategyRegistry::new();
        let params = serde_json::json!({"classifier": "http", "model_url": "::not a url::"});

        let result = registry.create("sentiment", params, &StrategyContext::default());
        assert!(matches!(result, Err(StrategyError::InitializationFailed(_))));
    }
}
