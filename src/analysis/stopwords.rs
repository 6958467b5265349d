use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;

use crate::error::{MailError, Result};

/// Relative location of the English list inside an NLP data directory
pub const ENGLISH_STOPWORDS_PATH: &str = "corpora/stopwords/english";

static ENGLISH: Lazy<HashSet<String>> =
    Lazy::new(|| parse_word_list(include_str!("../../resources/stopwords/english")));

/// A fixed set of words removed before counting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// The built-in English list
    pub fn english() -> Self {
        Self {
            words: ENGLISH.clone(),
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Load `corpora/stopwords/english` from `data_dir`, or the built-in
    /// list when the directory does not provide one.
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        let Some(path) = data_dir.map(|dir| dir.join(ENGLISH_STOPWORDS_PATH)) else {
            return Ok(Self::english());
        };

        if !path.is_file() {
            tracing::debug!("No stopword list at {:?}, using built-in English list", path);
            return Ok(Self::english());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            MailError::ResourceError(format!("Failed to read stopwords {:?}: {}", path, e))
        })?;
        let words = parse_word_list(&content);
        tracing::info!("Loaded {} stopwords from {:?}", words.len(), path);

        Ok(Self { words })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::english()
    }
}

/// One word per line; blank lines and `#` comments are skipped
fn parse_word_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}
