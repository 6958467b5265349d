use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::tagging::{PosTag, TaggedToken};
use crate::error::{MailError, Result};

/// Relative location of the entity table inside an NLP data directory
pub const ENTITY_TABLE_PATH: &str = "entities.toml";

const DEFAULT_TABLE: &str = include_str!("../../resources/entities.toml");

/// A labeled entity found in the token stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub label: String,
    pub text: String,
}

/// A chunk of consecutive tokens, labeled when it is a recognized entity
///
/// Tokens are lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub label: Option<String>,
    pub tokens: Vec<String>,
}

/// Groups a tagged token sequence into spans
///
/// Every input token belongs to exactly one span, in order.
pub trait EntityChunker: Send + Sync {
    fn chunk(&self, tokens: &[TaggedToken]) -> Vec<Span>;
}

const PERSON: &str = "PERSON";
const ORGANIZATION: &str = "ORGANIZATION";

/// Last words that mark an unlisted proper-noun run as an organization
const ORGANIZATION_SUFFIXES: [&str; 16] = [
    "association",
    "bank",
    "co",
    "college",
    "company",
    "corp",
    "corporation",
    "foundation",
    "group",
    "inc",
    "institute",
    "labs",
    "llc",
    "ltd",
    "partners",
    "university",
];

/// Proper-noun chunker with a phrase dictionary
///
/// A listed phrase matches only where every one of its tokens is
/// capitalized; the longest match wins. Tokens tagged `NNP` that start no
/// phrase form runs of their own: a run right after a `PERSON` phrase
/// extends it (a surname), any other run is labeled `ORGANIZATION` when it
/// ends in a company word or is all acronyms, and `PERSON` otherwise.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    phrases: HashMap<Vec<String>, String>,
    longest: usize,
}

impl Gazetteer {
    /// Build from a `label -> [phrase, ...]` table.
    ///
    /// Phrases are lower-cased and split on whitespace. When two labels list
    /// the same phrase, the label that sorts first keeps it.
    pub fn from_table(table: BTreeMap<String, Vec<String>>) -> Self {
        let mut phrases = HashMap::new();
        let mut longest = 0;

        for (label, entries) in table {
            for entry in entries {
                let tokens: Vec<String> = entry.split_whitespace().map(str::to_lowercase).collect();
                if tokens.is_empty() {
                    continue;
                }
                longest = longest.max(tokens.len());
                phrases.entry(tokens).or_insert_with(|| label.clone());
            }
        }

        Self { phrases, longest }
    }

    /// Parse a TOML document of `LABEL = ["phrase", ...]` arrays
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: BTreeMap<String, Vec<String>> = toml::from_str(content)
            .map_err(|e| MailError::ResourceError(format!("Invalid entity table: {}", e)))?;
        Ok(Self::from_table(table))
    }

    /// The embedded default table
    pub fn builtin() -> Result<Self> {
        Self::from_toml(DEFAULT_TABLE)
    }

    /// Load `entities.toml` from `data_dir`, or the embedded table when absent
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        let Some(path) = data_dir.map(|dir| dir.join(ENTITY_TABLE_PATH)) else {
            return Self::builtin();
        };

        if !path.is_file() {
            tracing::debug!("No entity table at {:?}, using built-in table", path);
            return Self::builtin();
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            MailError::ResourceError(format!("Failed to read entity table {:?}: {}", path, e))
        })?;
        let gazetteer = Self::from_toml(&content)?;
        tracing::info!("Loaded {} entity phrases from {:?}", gazetteer.len(), path);
        Ok(gazetteer)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Longest phrase starting at `words[0]`, no longer than `limit` tokens
    fn longest_match(&self, words: &[String], limit: usize) -> Option<(usize, &str)> {
        (1..=self.longest.min(limit).min(words.len()))
            .rev()
            .find_map(|len| {
                self.phrases
                    .get(&words[..len])
                    .map(|label| (len, label.as_str()))
            })
    }
}

impl EntityChunker for Gazetteer {
    fn chunk(&self, tokens: &[TaggedToken]) -> Vec<Span> {
        let words: Vec<String> = tokens.iter().map(|t| t.text.to_lowercase()).collect();

        // capitalized[i]: length of the capitalized stretch starting at i
        let mut capitalized = vec![0; tokens.len() + 1];
        for i in (0..tokens.len()).rev() {
            if tokens[i].is_capitalized() {
                capitalized[i] = capitalized[i + 1] + 1;
            }
        }
        let phrase_at = |i: usize| self.longest_match(&words[i..], capitalized[i]);
        let unmatched_proper_run = |from: usize| {
            (from..tokens.len())
                .take_while(|&i| tokens[i].tag == PosTag::ProperNoun && phrase_at(i).is_none())
                .count()
        };

        let mut spans = Vec::new();
        let mut position = 0;

        while position < tokens.len() {
            if let Some((len, label)) = phrase_at(position) {
                let mut end = position + len;
                if label == PERSON {
                    end += unmatched_proper_run(end);
                }
                spans.push(Span {
                    label: Some(label.to_string()),
                    tokens: words[position..end].to_vec(),
                });
                position = end;
                continue;
            }

            let run = unmatched_proper_run(position);
            if run > 0 {
                let end = position + run;
                spans.push(Span {
                    label: Some(fallback_label(&tokens[position..end]).to_string()),
                    tokens: words[position..end].to_vec(),
                });
                position = end;
            } else {
                spans.push(Span {
                    label: None,
                    tokens: vec![words[position].clone()],
                });
                position += 1;
            }
        }

        spans
    }
}

fn fallback_label(run: &[TaggedToken]) -> &'static str {
    let ends_like_company = run
        .last()
        .is_some_and(|t| ORGANIZATION_SUFFIXES.contains(&t.text.to_lowercase().as_str()));

    if ends_like_company || run.iter().all(|t| is_acronym(&t.text)) {
        ORGANIZATION
    } else {
        PERSON
    }
}

fn is_acronym(word: &str) -> bool {
    word.chars().count() >= 2
        && word.chars().any(char::is_uppercase)
        && word.chars().all(|c| c.is_uppercase() || c.is_ascii_digit())
}

/// Keep labeled spans as entities, joining their tokens with spaces
pub fn labeled_entities(spans: Vec<Span>) -> Vec<Entity> {
    spans
        .into_iter()
        .filter_map(|span| {
            span.label.map(|label| Entity {
                label,
                text: span.tokens.join(" "),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tagging::{LexiconTagger, PosTagger};
    use tempfile::TempDir;

    fn tagged(text: &str) -> Vec<TaggedToken> {
        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        LexiconTagger::builtin().unwrap().tag(&tokens)
    }

    fn entity(label: &str, text: &str) -> Entity {
        Entity {
            label: label.to_string(),
            text: text.to_string(),
        }
    }

    fn sample() -> Gazetteer {
        Gazetteer::from_toml(
            r#"
GPE = ["new york", "new york city", "york"]
ORGANIZATION = ["Cornell University", "cornell"]
PERSON = ["michael"]
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_longest_match_wins() {
        let entities = labeled_entities(sample().chunk(&tagged("moved New York City last week")));
        assert_eq!(entities, vec![entity("GPE", "new york city")]);
    }

    #[test]
    fn test_every_token_lands_in_one_span() {
        let input = tagged("Cornell University New York soon");
        let spans = sample().chunk(&input);

        let flattened: Vec<String> = spans.iter().flat_map(|s| s.tokens.clone()).collect();
        assert_eq!(flattened, vec!["cornell", "university", "new", "york", "soon"]);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].label.as_deref(), Some("ORGANIZATION"));
        assert_eq!(spans[1].label.as_deref(), Some("GPE"));
        assert_eq!(spans[2].label, None);
    }

    #[test]
    fn test_entities_in_encounter_order() {
        let entities = labeled_entities(sample().chunk(&tagged("York Cornell York")));
        let labels: Vec<&str> = entities.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["GPE", "ORGANIZATION", "GPE"]);
    }

    #[test]
    fn test_phrases_need_capitalized_tokens() {
        let entities = labeled_entities(sample().chunk(&tagged("new york cornell")));
        assert!(entities.is_empty());

        // partial capitalization only matches the capitalized part
        let entities = labeled_entities(sample().chunk(&tagged("new York")));
        assert_eq!(entities, vec![entity("GPE", "york")]);
    }

    #[test]
    fn test_verbs_and_common_nouns_are_not_entities() {
        let table = r#"ORGANIZATION = ["zoom", "slack", "apple", "amazon"]"#;
        let gazetteer = Gazetteer::from_toml(table).unwrap();

        let entities = labeled_entities(gazetteer.chunk(&tagged(
            "Let zoom tomorrow slack apple pie recipe amazon Thanks Priya",
        )));

        assert_eq!(entities, vec![entity("PERSON", "priya")]);
    }

    #[test]
    fn test_unlisted_proper_nouns_get_a_fallback_label() {
        let entities = labeled_entities(Gazetteer::default().chunk(&tagged(
            "Thanks Satya Nadella report Acme Labs",
        )));

        assert_eq!(
            entities,
            vec![
                entity("PERSON", "satya nadella"),
                entity("ORGANIZATION", "acme labs"),
            ]
        );

        let entities = labeled_entities(Gazetteer::default().chunk(&tagged("meeting IBM")));
        assert_eq!(entities, vec![entity("ORGANIZATION", "ibm")]);
    }

    #[test]
    fn test_surname_extends_listed_person() {
        let entities = labeled_entities(sample().chunk(&tagged("Michael Sanders Cornell")));
        assert_eq!(
            entities,
            vec![
                entity("PERSON", "michael sanders"),
                entity("ORGANIZATION", "cornell"),
            ]
        );
    }

    #[test]
    fn test_empty_input_and_empty_table() {
        assert!(sample().chunk(&[]).is_empty());

        let spans = Gazetteer::default().chunk(&tagged("new york"));
        assert_eq!(spans.len(), 2);
        assert!(labeled_entities(spans).is_empty());
    }

    #[test]
    fn test_builtin_table() {
        let gazetteer = Gazetteer::builtin().unwrap();
        assert!(!gazetteer.is_empty());

        let entities = labeled_entities(gazetteer.chunk(&tagged("meeting Google London")));
        assert_eq!(
            entities,
            vec![entity("ORGANIZATION", "google"), entity("GPE", "london")]
        );
    }

    #[test]
    fn test_builtin_table_has_no_common_words() {
        let tokens: Vec<String> = ["Zoom", "Slack", "Apple", "Amazon", "Washington"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        let tagger = LexiconTagger::default();
        let gazetteer = Gazetteer::builtin().unwrap();

        for token in tokens.chunks(1) {
            let spans = gazetteer.chunk(&tagger.tag(token));
            let listed = spans
                .iter()
                .any(|s| matches!(s.label.as_deref(), Some("GPE") | Some("ORGANIZATION")));
            assert!(!listed, "{} is in the built-in table", token[0]);
        }
    }

    #[test]
    fn test_invalid_table_is_resource_error() {
        let err = Gazetteer::from_toml("GPE = 3").unwrap_err();
        assert!(matches!(err, MailError::ResourceError(_)));
    }

    #[test]
    fn test_load_from_data_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(ENTITY_TABLE_PATH), "PRODUCT = [\"rust\"]\n").unwrap();

        let gazetteer = Gazetteer::load(Some(dir.path())).unwrap();
        assert_eq!(gazetteer.len(), 1);
        let entities = labeled_entities(gazetteer.chunk(&tagged("learning Rust")));
        assert_eq!(entities, vec![entity("PRODUCT", "rust")]);
    }
}
