use unicode_segmentation::UnicodeSegmentation;

/// Splits text into tokens
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Contraction suffixes split off the word they attach to, Treebank style
const CLITICS: [&str; 7] = ["n't", "'s", "'m", "'d", "'re", "'ve", "'ll"];

/// Tokenizer over Unicode word boundaries (UAX #29), adjusted toward
/// Penn Treebank conventions
///
/// Every segment is a token, punctuation included; callers decide which
/// tokens to keep. Two adjustments on top of UAX #29:
/// - contractions are split: `Sarah's` -> `Sarah`, `'s`; `can't` -> `ca`, `n't`
/// - hyphenated compounds stay whole: `e-mail`, `state-of-the-art`
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeTokenizer;

impl Tokenizer for UnicodeTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let segments: Vec<&str> = text.split_word_bounds().collect();
        let mut tokens = Vec::with_capacity(segments.len());
        let mut i = 0;

        while i < segments.len() {
            let segment = segments[i];
            i += 1;

            if segment.trim().is_empty() {
                continue;
            }
            if !is_word(segment) {
                tokens.push(segment.to_string());
                continue;
            }

            let mut word = segment.to_string();
            while i + 1 < segments.len() && segments[i] == "-" && is_word(segments[i + 1]) {
                word.push('-');
                word.push_str(segments[i + 1]);
                i += 2;
            }
            split_clitic(word, &mut tokens);
        }

        tokens
    }
}

fn is_word(segment: &str) -> bool {
    segment.chars().next().is_some_and(char::is_alphanumeric)
}

fn split_clitic(word: String, tokens: &mut Vec<String>) {
    let word = word.replace('\u{2019}', "'");

    let split_at = CLITICS.iter().find_map(|clitic| {
        let at = word.len().checked_sub(clitic.len())?;
        (at > 0 && word.is_char_boundary(at) && word[at..].eq_ignore_ascii_case(clitic))
            .then_some(at)
    });

    match split_at {
        Some(at) => {
            tokens.push(word[..at].to_string());
            tokens.push(word[at..].to_string());
        }
        None => tokens.push(word),
    }
}

/// True when the token is non-empty and every character is alphanumeric
pub fn is_alphanumeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}
