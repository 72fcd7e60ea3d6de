// Tokenization.
//
// Responses are lowercased, URLs and @mentions are stripped, and the text is
// split on anything that isn't a letter or digit. A token survives only if it
// is purely alphabetic (Unicode-aware, so "información" and "niño" are kept)
// and not a stop word.

use std::collections::HashSet;

use anyhow::Result;
use regex::Regex;

use super::stopwords::build_stop_words;

/// URLs and @mentions. `\S` and `\w` are Unicode-aware, so accented
/// mentions are removed whole and a URL ends at any Unicode space.
const NOISE_PATTERN: &str = r"https?://\S+|www\.\S+|@\w+";

pub struct Preprocessor {
    stop_words: HashSet<String>,
    noise: Regex,
}

impl Preprocessor {
    /// Preprocessor for the given stop-word language plus extra words.
    pub fn new(language: &str, extra_stop_words: &[String]) -> Result<Self> {
        Self::with_stop_words(build_stop_words(language, extra_stop_words)?)
    }

    pub fn with_stop_words(stop_words: HashSet<String>) -> Result<Self> {
        let noise = Regex::new(NOISE_PATTERN)?;
        Ok(Self { stop_words, noise })
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Tokenize a single response.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let cleaned = self.noise.replace_all(&lower, " ");

        cleaned
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .filter(|token| token.chars().all(char::is_alphabetic))
            .filter(|token| !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }

    /// Tokenize every response. Output has one entry per input, in order,
    /// even when a response filters down to nothing.
    pub fn preprocess(&self, documents: &[String]) -> Vec<Vec<String>> {
        documents.iter().map(|doc| self.tokenize(doc)).collect()
    }
}
