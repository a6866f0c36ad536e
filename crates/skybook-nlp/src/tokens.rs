// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfSpeech {
    ProperNoun,
    Pronoun,
    Determiner,
    Preposition,
    Auxiliary,
    Number,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub pos: PartOfSpeech,
}

impl Token {
    pub fn is_proper_noun(&self) -> bool {
        self.pos == PartOfSpeech::ProperNoun
    }

    pub fn is_alphabetic(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_alphabetic)
    }

    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Assigns a part of speech to each word of an utterance.
pub trait Tagger {
    fn tag(&self, words: &[String]) -> Vec<PartOfSpeech>;
}

/// Capitalisation-based tagger. Good enough to spot city names in typed
/// sentences; lowercase input never yields proper nouns.
#[derive(Debug, Clone, Default)]
pub struct HeuristicTagger;

const PRONOUNS: &[&str] = &[
    "i", "me", "my", "mine", "we", "us", "our", "you", "your", "he", "she", "it", "they", "them",
    "their", "this", "that", "these", "those",
];
const DETERMINERS: &[&str] = &["a", "an", "the", "some", "any", "each", "every", "no"];
const PREPOSITIONS: &[&str] = &[
    "from", "to", "in", "on", "at", "for", "with", "by", "of", "via", "into", "after", "before",
];
const AUXILIARIES: &[&str] = &[
    "is", "am", "are", "was", "were", "be", "do", "does", "did", "can", "could", "will", "would",
    "should", "shall", "may", "might", "must", "please", "hi", "hello", "hey", "yes", "no",
];

impl Tagger for HeuristicTagger {
    fn tag(&self, words: &[String]) -> Vec<PartOfSpeech> {
        words
            .iter()
            .map(|w| {
                let lower = w.to_lowercase();
                if w.chars().all(|c| c.is_ascii_digit()) {
                    PartOfSpeech::Number
                } else if PRONOUNS.contains(&lower.as_str()) {
                    PartOfSpeech::Pronoun
                } else if DETERMINERS.contains(&lower.as_str()) {
                    PartOfSpeech::Determiner
                } else if PREPOSITIONS.contains(&lower.as_str()) {
                    PartOfSpeech::Preposition
                } else if AUXILIARIES.contains(&lower.as_str()) {
                    PartOfSpeech::Auxiliary
                } else if w.chars().all(char::is_alphabetic)
                    && w.chars().next().is_some_and(char::is_uppercase)
                {
                    PartOfSpeech::ProperNoun
                } else {
                    PartOfSpeech::Other
                }
            })
            .collect()
    }
}

/// Splits text into words, keeping inner hyphens and apostrophes
/// ("one-way", "I'm", "05-03-2024").
pub fn words(text: &str) -> Vec<String> {
    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    let re = WORD_RE
        .get_or_init(|| Regex::new(r"[\p{L}\p{N}]+(?:['\-][\p{L}\p{N}]+)*").unwrap());
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

pub fn tokenize(text: &str, tagger: &dyn Tagger) -> Vec<Token> {
    let words = words(text);
    let tags = tagger.tag(&words);
    words
        .into_iter()
        .zip(tags)
        .map(|(text, pos)| Token { text, pos })
        .collect()
}

/// "lONDON" -> "London"
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Title-cases each word and joins them with single spaces.
pub fn title_case<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| capitalize(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "we", "our", "you", "your", "it", "its", "a", "an", "the", "and", "or", "but",
    "if", "of", "at", "by", "for", "with", "about", "to", "from", "in", "on", "is", "am", "are",
    "was", "be", "been", "do", "does", "did", "want", "would", "like", "please", "fly", "flying",
    "go", "going", "travel", "leave", "leaving", "depart", "departing", "city", "im", "i'm",
    "there", "then", "so", "just", "can", "could", "will",
];

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_keep_dates_and_contractions() {
        let w = words("I'm flying on 05-03-2024, one-way!");
        assert_eq!(w, vec!["I'm", "flying", "on", "05-03-2024", "one-way"]);
    }

    #[test]
    fn test_heuristic_tagger_marks_capitalized_words() {
        let tokens = tokenize("I want to fly from London to Paris", &HeuristicTagger);
        let proper: Vec<&str> = tokens
            .iter()
            .filter(|t| t.is_proper_noun())
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(proper, vec!["London", "Paris"]);
        assert_eq!(tokens[0].pos, PartOfSpeech::Pronoun);
        assert_eq!(tokens[4].pos, PartOfSpeech::Preposition);
    }

    #[test]
    fn test_lowercase_is_never_proper() {
        let tokens = tokenize("from london to paris", &HeuristicTagger);
        assert!(tokens.iter().all(|t| !t.is_proper_noun()));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case(&["new", "YORK"]), "New York");
        assert_eq!(capitalize(""), "");
    }
}
