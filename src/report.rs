//! Rendering of analysis results for the console

use crate::analysis::AnalysisResult;
use crate::config::OutputFormat;
use crate::error::Result;

/// Render in the requested format
pub fn render(result: &AnalysisResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Json => render_json(result),
    }
}

/// Human-readable report. Section order is fixed: words, bigrams,
/// sentiment, entities.
pub fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();

    out.push_str("Most common words:\n");
    for entry in &result.top_words {
        out.push_str(&format!("{}: {}\n", entry.word, entry.count));
    }

    out.push_str("\nMost common bigrams:\n");
    for entry in &result.top_bigrams {
        out.push_str(&format!(
            "{} {}: {}\n",
            entry.bigram.0, entry.bigram.1, entry.count
        ));
    }

    out.push_str("\nSentiment analysis:\n");
    // keys as the VADER score map names them
    out.push_str(&format!("neg: {}\n", result.sentiment.negative));
    out.push_str(&format!("neu: {}\n", result.sentiment.neutral));
    out.push_str(&format!("pos: {}\n", result.sentiment.positive));
    out.push_str(&format!("compound: {}\n", result.sentiment.compound));

    out.push_str("\nNamed Entities:\n");
    for entity in &result.entities {
        out.push_str(&format!("{}: {}\n", entity.label, entity.text));
    }

    out
}

/// Pretty-printed JSON with `topWords`, `topBigrams`, `sentiment`, `entities`
pub fn render_json(result: &AnalysisResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{BigramCount, Entity, SentimentScores, WordCount};

    fn sample() -> AnalysisResult {
        AnalysisResult {
            top_words: vec![WordCount {
                word: "cat".to_string(),
                count: 2,
            }],
            top_bigrams: vec![BigramCount {
                bigram: ("cat".to_string(), "sat".to_string()),
                count: 1,
            }],
            sentiment: SentimentScores {
                negative: 0.0,
                neutral: 0.75,
                positive: 0.25,
                compound: 0.5,
            },
            entities: vec![Entity {
                label: "GPE".to_string(),
                text: "new york".to_string(),
            }],
        }
    }

    #[test]
    fn test_text_sections_in_order() {
        let text = render_text(&sample());

        let words = text.find("Most common words:").unwrap();
        let bigrams = text.find("Most common bigrams:").unwrap();
        let sentiment = text.find("Sentiment analysis:").unwrap();
        let entities = text.find("Named Entities:").unwrap();
        assert!(words < bigrams && bigrams < sentiment && sentiment < entities);

        assert!(text.contains("cat: 2\n"));
        assert!(text.contains("cat sat: 1\n"));
        assert!(text.contains("neg: 0\nneu: 0.75\npos: 0.25\ncompound: 0.5\n"));
        assert!(text.contains("GPE: new york\n"));
    }

    #[test]
    fn test_empty_text_report_keeps_sections() {
        let text = render_text(&AnalysisResult::empty());
        assert!(text.contains("Most common words:\n\nMost common bigrams:"));
        assert!(text.contains("neg: 0\n"));
        assert!(text.ends_with("Named Entities:\n"));
    }

    #[test]
    fn test_json_fields() {
        let json: serde_json::Value =
            serde_json::from_str(&render(&sample(), OutputFormat::Json).unwrap()).unwrap();

        assert_eq!(json["topWords"][0]["word"], "cat");
        assert_eq!(json["topWords"][0]["count"], 2);
        assert_eq!(json["topBigrams"][0]["bigram"][1], "sat");
        assert_eq!(json["sentiment"]["neutral"], 0.75);
        assert_eq!(json["entities"][0]["label"], "GPE");
        assert_eq!(json["entities"][0]["text"], "new york");
    }
}
