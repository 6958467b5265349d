//! Part-of-speech tagging of the filtered token stream
//!
//! Tokens keep their surface form here: capitalization is the main signal
//! that a word is a proper noun, and it is gone once tokens are lower-cased
//! for counting.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{MailError, Result};

/// Relative location of the tagging lexicon inside an NLP data directory
pub const ENGLISH_LEXICON_PATH: &str = "taggers/english.lexicon";

const DEFAULT_LEXICON: &str = include_str!("../../resources/taggers/english.lexicon");

/// Penn Treebank tags the tagger can assign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    ProperNoun,
    Noun,
    PluralNoun,
    Verb,
    PastVerb,
    Gerund,
    PresentVerb,
    Modal,
    Adjective,
    Adverb,
    Number,
    Interjection,
}

impl PosTag {
    pub fn penn(&self) -> &'static str {
        match self {
            PosTag::ProperNoun => "NNP",
            PosTag::Noun => "NN",
            PosTag::PluralNoun => "NNS",
            PosTag::Verb => "VB",
            PosTag::PastVerb => "VBD",
            PosTag::Gerund => "VBG",
            PosTag::PresentVerb => "VBZ",
            PosTag::Modal => "MD",
            PosTag::Adjective => "JJ",
            PosTag::Adverb => "RB",
            PosTag::Number => "CD",
            PosTag::Interjection => "UH",
        }
    }

    pub fn from_penn(tag: &str) -> Option<Self> {
        let tag = match tag {
            "NNP" => PosTag::ProperNoun,
            "NN" => PosTag::Noun,
            "NNS" => PosTag::PluralNoun,
            "VB" => PosTag::Verb,
            "VBD" => PosTag::PastVerb,
            "VBG" => PosTag::Gerund,
            "VBZ" => PosTag::PresentVerb,
            "MD" => PosTag::Modal,
            "JJ" => PosTag::Adjective,
            "RB" => PosTag::Adverb,
            "CD" => PosTag::Number,
            "UH" => PosTag::Interjection,
            _ => return None,
        };
        Some(tag)
    }
}

/// A token in its surface form with the tag assigned to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub text: String,
    pub tag: PosTag,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, tag: PosTag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }

    /// First character is upper-case
    pub fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }
}

/// Assigns one tag per token, preserving order
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[String]) -> Vec<TaggedToken>;
}

/// Lexicon lookup backed by capitalization and suffix rules
///
/// In order: numbers are `CD`; a listed word takes its lexicon tag; `-ing`
/// and `-ed` words take verb tags; any other capitalized word is `NNP`;
/// lower-case `-ly` words are `RB`; remaining words fall back to suffix
/// classes and then `NN`.
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger {
    lexicon: HashMap<String, PosTag>,
}

impl LexiconTagger {
    /// Parse `word TAG` lines; blank lines and `#` comments are skipped.
    /// The first entry for a word wins.
    pub fn from_lexicon(content: &str) -> Result<Self> {
        let mut lexicon = HashMap::new();

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(word), Some(tag), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(MailError::ResourceError(format!(
                    "Invalid lexicon line {}: {:?}",
                    number + 1,
                    line
                )));
            };
            let tag = PosTag::from_penn(tag).ok_or_else(|| {
                MailError::ResourceError(format!(
                    "Unknown tag {:?} on lexicon line {}",
                    tag,
                    number + 1
                ))
            })?;

            lexicon.entry(word.to_lowercase()).or_insert(tag);
        }

        Ok(Self { lexicon })
    }

    /// The embedded English lexicon
    pub fn builtin() -> Result<Self> {
        Self::from_lexicon(DEFAULT_LEXICON)
    }

    /// Load `taggers/english.lexicon` from `data_dir`, or the embedded
    /// lexicon when absent
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        let Some(path) = data_dir.map(|dir| dir.join(ENGLISH_LEXICON_PATH)) else {
            return Self::builtin();
        };

        if !path.is_file() {
            tracing::debug!("No tagging lexicon at {:?}, using built-in lexicon", path);
            return Self::builtin();
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            MailError::ResourceError(format!("Failed to read lexicon {:?}: {}", path, e))
        })?;
        let tagger = Self::from_lexicon(&content)?;
        tracing::info!("Loaded {} lexicon entries from {:?}", tagger.len(), path);
        Ok(tagger)
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    fn tag_word(&self, word: &str) -> PosTag {
        if word.chars().all(|c| c.is_numeric()) {
            return PosTag::Number;
        }

        let lower = word.to_lowercase();
        if let Some(&tag) = self.lexicon.get(&lower) {
            return tag;
        }
        if let Some(tag) = verb_inflection(&lower) {
            return tag;
        }
        if word.chars().next().is_some_and(char::is_uppercase) {
            return PosTag::ProperNoun;
        }
        suffix_tag(&lower)
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[String]) -> Vec<TaggedToken> {
        tokens
            .iter()
            .map(|token| TaggedToken::new(token.as_str(), self.tag_word(token)))
            .collect()
    }
}

const MIN_STEM: usize = 3;

fn has_suffix(lower: &str, suffix: &str) -> bool {
    lower.ends_with(suffix) && lower.chars().count() >= suffix.len() + MIN_STEM
}

/// `-ing` and `-ed` with a stem of at least three characters
fn verb_inflection(lower: &str) -> Option<PosTag> {
    if has_suffix(lower, "ing") {
        Some(PosTag::Gerund)
    } else if has_suffix(lower, "ed") {
        Some(PosTag::PastVerb)
    } else {
        None
    }
}

fn suffix_tag(lower: &str) -> PosTag {
    const ADJECTIVE_SUFFIXES: [&str; 6] = ["ous", "ful", "able", "ible", "ive", "less"];

    if has_suffix(lower, "ly") {
        PosTag::Adverb
    } else if ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        PosTag::Adjective
    } else if lower.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss") {
        PosTag::PluralNoun
    } else {
        PosTag::Noun
    }
}
