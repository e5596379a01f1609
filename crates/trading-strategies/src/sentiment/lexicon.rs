//! Word-list sentiment classifier for financial text.

use async_trait::async_trait;
use std::collections::HashSet;
use trading_core::{
    error::ClassifierError,
    traits::{Sentiment, SentimentClassifier},
};

/// Classifies text by counting positive and negative financial terms.
///
/// Polarity follows the majority of matched terms and the score is that
/// majority's share of all matches. Text with no matches, or an even split,
/// is `Inconclusive`.
pub struct LexiconClassifier {
    positive_words: HashSet<&'static str>,
    negative_words: HashSet<&'static str>,
}

impl LexiconClassifier {
    pub fn new() -> Self {
        Self {
            positive_words: Self::build_positive_lexicon(),
            negative_words: Self::build_negative_lexicon(),
        }
    }

    /// Count (positive, negative) term matches.
    pub fn count_terms(&self, text: &str) -> (usize, usize) {
        let lower = text.to_lowercase();
        let mut positive = 0;
        let mut negative = 0;

        for word in lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            if self.positive_words.contains(word) {
                positive += 1;
            } else if self.negative_words.contains(word) {
                negative += 1;
            }
        }

        (positive, negative)
    }

    fn build_positive_lexicon() -> HashSet<&'static str> {
        [
            // Growth and performance
            "growth", "growing", "grew", "increase", "increased", "increasing",
            "improve", "improved", "improvement", "improving", "strong", "stronger",
            "strength", "robust", "solid", "excellent", "exceptional", "outstanding",
            "record", "beat", "beats", "exceeded", "surpassed", "outperformed",
            "rally", "rallied", "surge", "surged", "soar", "soared", "gain", "gains",

            // Financial positives
            "profit", "profits", "profitable", "profitability", "earnings",
            "momentum", "accelerate", "accelerated", "expansion", "expand",
            "expanded", "expanding", "dividend", "buyback",

            // Sentiment
            "confident", "optimistic", "positive", "pleased", "excited",
            "encouraged", "favorable", "success", "successful", "bullish",
            "upgrade", "upgraded", "upside", "prospects", "opportunity",
        ]
        .into_iter()
        .collect()
    }

    fn build_negative_lexicon() -> HashSet<&'static str> {
        [
            // Decline indicators
            "decline", "declined", "declining", "decrease", "decreased",
            "decreasing", "drop", "dropped", "dropping", "fall", "fell",
            "falling", "weak", "weaker", "weakness", "plunge", "plunged",
            "slump", "slumped", "tumble", "tumbled", "selloff",

            // Problems
            "challenge", "challenging", "difficult", "headwind", "headwinds",
            "pressure", "concern", "concerns", "concerned", "risk", "risks",
            "risky", "lawsuit", "investigation", "fraud", "bankruptcy", "default",

            // Financial negatives
            "loss", "losses", "miss", "missed", "shortfall", "disappointing",
            "disappointed", "underperformed", "impairment", "writedown",

            // Sentiment
            "uncertain", "uncertainty", "volatile", "downturn", "recession",
            "slowdown", "layoff", "layoffs", "bearish", "downgrade",
            "downgraded", "downside", "worried", "fears",
        ]
        .into_iter()
        .collect()
    }
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SentimentClassifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        let (positive, negative) = self.count_terms(text);
        let total = positive + negative;

        if total == 0 || positive == negative {
            return Err(ClassifierError::Inconclusive);
        }

        let sentiment = if positive > negative {
            Sentiment::positive(positive as f64 / total as f64)
        } else {
            Sentiment::negative(negative as f64 / total as f64)
        };
        Ok(sentiment)
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trading_core::traits::Polarity;

    #[tokio::test]
    async fn test_positive_text() {
        let classifier = LexiconClassifier::new();
        let result = classifier
            .classify("The company has reported record earnings and strong growth prospects.")
            .await
            .unwrap();

        assert_eq!(result.polarity, Polarity::Positive);
        assert!((result.score - 1.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_negative_majority() {
        let classifier = LexiconClassifier::new();
        let result = classifier
            .classify("Shares fell after a revenue miss, despite strong margins.")
            .await
            .unwrap();

        // fell, miss vs strong
        assert_eq!(result.polarity, Polarity::Negative);
        assert!((result.score - 2.0 / 3.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_no_terms_is_inconclusive() {
        let classifier = LexiconClassifier::new();
        let result = classifier.classify("The meeting is on Tuesday.").await;
        assert!(matches!(result, Err(ClassifierError::Inconclusive)));
    }

    #[test]
    fn test_whole_word_matching() {
        let classifier = LexiconClassifier::new();
        // "records" and "falls" are not in the lexicon; "Record!" is
        assert_eq!(classifier.count_terms("records falls Record!"), (1, 0));
    }
}
