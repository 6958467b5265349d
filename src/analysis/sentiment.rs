use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Four polarity scores as reported by the sentiment model
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    pub compound: f64,
}

/// Scores raw, unfiltered text
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> SentimentScores;
}

/// Lexicon and rule based scoring with VADER
#[derive(Debug, Default, Clone, Copy)]
pub struct VaderScorer;

impl SentimentScorer for VaderScorer {
    fn score(&self, text: &str) -> SentimentScores {
        if text.trim().is_empty() {
            return SentimentScores::default();
        }

        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        from_polarity_map(&analyzer.polarity_scores(text))
    }
}

/// Read VADER's `neg`/`neu`/`pos`/`compound` keys; absent keys score zero
fn from_polarity_map(scores: &HashMap<&str, f64>) -> SentimentScores {
    let get = |key: &str| scores.get(key).copied().unwrap_or(0.0);

    SentimentScores {
        negative: get("neg"),
        neutral: get("neu"),
        positive: get("pos"),
        compound: get("compound"),
    }
}
