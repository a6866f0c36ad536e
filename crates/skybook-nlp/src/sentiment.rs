// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize};

use crate::intent::Classifier;
use crate::tokens::words;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

const POSITIVE: &[&str] = &[
    "good", "great", "fine", "well", "happy", "glad", "excellent", "amazing", "awesome",
    "wonderful", "fantastic", "nice", "brilliant", "love", "lovely", "excited", "cheerful",
    "better", "best", "perfect", "superb", "relaxed", "positive", "okay", "ok",
];

const NEGATIVE: &[&str] = &[
    "bad", "sad", "terrible", "awful", "horrible", "tired", "angry", "upset", "unhappy",
    "stressed", "sick", "ill", "worse", "worst", "annoyed", "frustrated", "depressed",
    "miserable", "exhausted", "poor", "hate", "lonely", "anxious", "negative", "rough",
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "dont", "don't", "isnt", "isn't", "wasnt", "wasn't", "aint", "ain't",
    "hardly", "barely", "nothing",
];

/// How many words after a negation it still applies to.
const NEGATION_SCOPE: usize = 3;

/// Word-list sentiment with simple negation handling: a positive word
/// within a few words after "not" counts as negative and vice versa.
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self {
            positive: POSITIVE.iter().map(|w| w.to_string()).collect(),
            negative: NEGATIVE.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl SentimentLexicon {
    pub fn new(positive: Vec<String>, negative: Vec<String>) -> Self {
        Self { positive, negative }
    }

    /// Positive minus negative hits.
    pub fn score(&self, text: &str) -> i32 {
        let mut score = 0;
        let mut negated_for = 0usize;
        for word in words(&text.to_lowercase()) {
            if NEGATIONS.contains(&word.as_str()) {
                negated_for = NEGATION_SCOPE;
                continue;
            }
            let polarity = if self.positive.contains(&word) {
                1
            } else if self.negative.contains(&word) {
                -1
            } else {
                0
            };
            if polarity != 0 && negated_for > 0 {
                score -= polarity;
                negated_for = 0;
            } else {
                score += polarity;
                negated_for = negated_for.saturating_sub(1);
            }
        }
        score
    }
}

impl Classifier for SentimentLexicon {
    type Label = Sentiment;

    fn classify(&self, text: &str) -> Sentiment {
        let score = self.score(text);
        log::debug!("[Sentiment] '{}' scored {}", text, score);
        match score {
            s if s > 0 => Sentiment::Positive,
            s if s < 0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}
