//! Text analysis over the concatenated message bodies
//!
//! Stages run in a fixed order: concatenation, tokenization and
//! normalization, stopword filtering, word ranking, bigram ranking,
//! sentiment scoring, part-of-speech tagging and entity chunking. Each language capability sits behind
//! a trait so the pipeline itself stays deterministic and testable.

pub mod entities;
pub mod frequency;
pub mod sentiment;
pub mod stopwords;
pub mod tagging;
pub mod tokenize;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::models::DecodedText;

pub use entities::{Entity, EntityChunker, Gazetteer, Span};
pub use frequency::FrequencyTable;
pub use sentiment::{SentimentScorer, SentimentScores, VaderScorer};
pub use stopwords::Stopwords;
pub use tagging::{LexiconTagger, PosTag, PosTagger, TaggedToken};
pub use tokenize::{Tokenizer, UnicodeTokenizer};

/// Separator placed between message bodies
pub const CORPUS_SEPARATOR: &str = " ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigramCount {
    pub bigram: (String, String),
    pub count: usize,
}

/// Everything the pipeline reports, in reporting order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub top_words: Vec<WordCount>,
    pub top_bigrams: Vec<BigramCount>,
    pub sentiment: SentimentScores,
    pub entities: Vec<Entity>,
}

impl AnalysisResult {
    pub fn empty() -> Self {
        Self {
            top_words: Vec::new(),
            top_bigrams: Vec::new(),
            sentiment: SentimentScores::default(),
            entities: Vec::new(),
        }
    }
}

/// The analysis pipeline with its language capabilities
pub struct TextAnalyzer {
    tokenizer: Box<dyn Tokenizer>,
    stopwords: Stopwords,
    sentiment: Box<dyn SentimentScorer>,
    tagger: Box<dyn PosTagger>,
    chunker: Box<dyn EntityChunker>,
    top_k: usize,
}

impl TextAnalyzer {
    pub fn new(
        tokenizer: Box<dyn Tokenizer>,
        stopwords: Stopwords,
        sentiment: Box<dyn SentimentScorer>,
        tagger: Box<dyn PosTagger>,
        chunker: Box<dyn EntityChunker>,
    ) -> Self {
        Self {
            tokenizer,
            stopwords,
            sentiment,
            tagger,
            chunker,
            top_k: 10,
        }
    }

    /// Build with default capabilities, reading language resources from
    /// `nlp_data_dir` when one is configured
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let data_dir = config.nlp_data_dir.as_deref();
        let analyzer = Self::new(
            Box::new(UnicodeTokenizer),
            Stopwords::load(data_dir)?,
            Box::new(VaderScorer),
            Box::new(LexiconTagger::load(data_dir)?),
            Box::new(Gazetteer::load(data_dir)?),
        );
        Ok(analyzer.with_top_k(config.top_k))
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Run the full pipeline. Pure with respect to `texts`: the same input
    /// always yields the same result.
    pub fn analyze(&self, texts: &[DecodedText]) -> AnalysisResult {
        let corpus = texts.join(CORPUS_SEPARATOR);
        let content = self.content_tokens(&corpus);
        let filtered: Vec<String> = content.iter().map(|t| t.to_lowercase()).collect();
        debug!(
            "Analyzing {} texts: {} tokens after stopword removal",
            texts.len(),
            filtered.len()
        );

        let top_words = filtered
            .iter()
            .cloned()
            .collect::<FrequencyTable<String>>()
            .most_common(self.top_k)
            .into_iter()
            .map(|(word, count)| WordCount { word, count })
            .collect();

        let top_bigrams = frequency::bigrams(&filtered)
            .collect::<FrequencyTable<(String, String)>>()
            .most_common(self.top_k)
            .into_iter()
            .map(|(bigram, count)| BigramCount { bigram, count })
            .collect();

        // Sentiment reads the raw corpus; negation and punctuation matter
        let sentiment = self.sentiment.score(&corpus);

        // Tagging sees the same filtered tokens, case intact
        let tagged = self.tagger.tag(&content);
        trace!(
            "Tagged tokens: {}",
            tagged
                .iter()
                .map(|t| format!("{}/{}", t.text, t.tag.penn()))
                .collect::<Vec<_>>()
                .join(" ")
        );
        let entities = entities::labeled_entities(self.chunker.chunk(&tagged));

        AnalysisResult {
            top_words,
            top_bigrams,
            sentiment,
            entities,
        }
    }

    /// Alphanumeric tokens that are not stopwords, in their surface form
    fn content_tokens(&self, corpus: &str) -> Vec<String> {
        self.tokenizer
            .tokenize(corpus)
            .into_iter()
            .filter(|token| tokenize::is_alphanumeric(token))
            .filter(|token| !self.stopwords.contains(&token.to_lowercase()))
            .collect()
    }
}
