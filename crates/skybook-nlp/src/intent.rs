// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! TF-IDF intent matching over a small labelled phrase corpus.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::tokens::words;

/// Maps free text to a label. The conversation only depends on this
/// interface, so models can be swapped without touching the dialogue.
pub trait Classifier {
    type Label;

    fn classify(&self, text: &str) -> Self::Label;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Booking,
    Thanks,
    Farewell,
    HowAreYou,
    Capabilities,
    UserName,
    ListBookings,
    CancelBooking,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentExamples {
    pub intent: Intent,
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentConfig {
    pub intents: Vec<IntentExamples>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_synonym_threshold")]
    pub synonym_threshold: f64,
    /// Extra words appended to the input on the second pass.
    #[serde(default)]
    pub synonyms: BTreeMap<String, Vec<String>>,
    /// Any of these words in an otherwise unmatched input means booking.
    #[serde(default)]
    pub booking_keywords: Vec<String>,
}

fn default_threshold() -> f64 {
    0.5
}

fn default_synonym_threshold() -> f64 {
    0.3
}

fn phrases(intent: Intent, list: &[&str]) -> IntentExamples {
    IntentExamples {
        intent,
        phrases: list.iter().map(|p| p.to_string()).collect(),
    }
}

impl Default for IntentConfig {
    fn default() -> Self {
        let intents = vec![
            phrases(
                Intent::Greeting,
                &[
                    "hello",
                    "hi",
                    "hey",
                    "hi there",
                    "hello bot",
                    "good morning",
                    "good afternoon",
                    "good evening",
                    "howdy",
                ],
            ),
            phrases(
                Intent::Booking,
                &[
                    "i want to book a flight",
                    "book a flight",
                    "book a ticket",
                    "i would like to fly",
                    "reserve a ticket",
                    "can i reserve a flight",
                    "i need a flight",
                    "i want to travel",
                    "book a trip",
                    "find me a flight",
                    "i want to fly from london to paris",
                ],
            ),
            phrases(
                Intent::Thanks,
                &[
                    "thank you",
                    "thanks",
                    "thanks a lot",
                    "much appreciated",
                    "thank you very much",
                    "cheers",
                ],
            ),
            phrases(
                Intent::Farewell,
                &[
                    "bye",
                    "goodbye",
                    "see you later",
                    "see you soon",
                    "talk to you later",
                    "quit",
                    "exit",
                    "farewell",
                ],
            ),
            phrases(
                Intent::HowAreYou,
                &[
                    "how are you",
                    "how are you doing",
                    "how is it going",
                    "how do you feel",
                    "are you ok",
                ],
            ),
            phrases(
                Intent::Capabilities,
                &[
                    "what can you do",
                    "how can you help me",
                    "what are your capabilities",
                    "could you help me",
                    "help",
                    "what do you do",
                ],
            ),
            phrases(
                Intent::UserName,
                &[
                    "what is my name",
                    "who am i",
                    "do you know my name",
                    "tell me my name",
                    "say my name",
                ],
            ),
            phrases(
                Intent::ListBookings,
                &[
                    "show my bookings",
                    "list my bookings",
                    "what are my bookings",
                    "view my bookings",
                    "show my flights",
                    "what flights have i booked",
                ],
            ),
            phrases(
                Intent::CancelBooking,
                &[
                    "cancel my booking",
                    "cancel a booking",
                    "cancel my flight",
                    "i want to cancel",
                    "delete my booking",
                ],
            ),
        ];

        let table: &[(&str, &[&str])] = &[
            ("greeting", &["hello", "hi"]),
            ("hiya", &["hi"]),
            ("yo", &["hey"]),
            ("thx", &["thank"]),
            ("ta", &["thank"]),
            ("gracias", &["thank"]),
            ("appreciate", &["thank", "appreciated"]),
            ("cya", &["bye"]),
            ("adios", &["goodbye"]),
            ("ciao", &["bye"]),
            ("leave", &["exit"]),
            ("purchase", &["book"]),
            ("buy", &["book"]),
            ("order", &["book"]),
            ("reservation", &["book"]),
            ("plane", &["flight"]),
            ("airplane", &["flight"]),
            ("voyage", &["travel"]),
            ("assist", &["help"]),
            ("assistance", &["help"]),
            ("support", &["help"]),
            ("ability", &["capability"]),
            ("feature", &["capability"]),
            ("skill", &["capability"]),
            ("remove", &["cancel"]),
            ("drop", &["cancel"]),
            ("scrap", &["cancel"]),
            ("terminate", &["cancel"]),
            ("called", &["name"]),
            ("display", &["show"]),
            ("see", &["show"]),
        ];
        let synonyms: BTreeMap<String, Vec<String>> = table
            .iter()
            .map(|(word, syns)| {
                (
                    word.to_string(),
                    syns.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();

        let booking_keywords = [
            "book", "flight", "travel", "reserve", "ticket", "fly", "schedule", "journey", "trip",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        Self {
            intents,
            threshold: default_threshold(),
            synonym_threshold: default_synonym_threshold(),
            synonyms,
            booking_keywords,
        }
    }
}

impl IntentConfig {
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("org", "skybook", "skybook")
            .map(|dirs| dirs.config_dir().join("intents.json"))
            .unwrap_or_else(|| PathBuf::from("intents.json"))
    }

    /// Reads `path`, falling back to the compiled-in corpus when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        log::debug!("[Intent] Loading intents from: {:?}", path);
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: IntentConfig = serde_json::from_str(&content).map_err(|e| {
                log::error!("[Intent] JSON Parse error for {:?}: {}", path, e);
                e
            })?;
            log::debug!(
                "[Intent] Successfully loaded {} intents",
                config.intents.len()
            );
            Ok(config)
        } else {
            log::debug!("[Intent] No intents file found at {:?}, using defaults", path);
            Ok(IntentConfig::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Lowercase, strip punctuation, lemmatize.
pub fn preprocess(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\'' | '.' | ',' | '!' | '?'))
        .collect();
    words(&cleaned).iter().map(|w| lemmatize(w)).collect()
}

fn irregular(word: &str) -> Option<&'static str> {
    let lemma = match word {
        "is" | "are" | "am" | "was" | "were" | "been" | "being" => "be",
        "does" | "did" => "do",
        "has" | "had" => "have",
        "booking" | "booked" => "book",
        "flying" | "flew" => "fly",
        "travelling" | "traveling" | "travelled" | "traveled" => "travel",
        "cancelled" | "canceled" | "cancelling" | "canceling" => "cancel",
        "thanks" => "thank",
        "capabilities" => "capability",
        "abilities" => "ability",
        "greetings" => "greeting",
        _ => return None,
    };
    Some(lemma)
}

fn lemmatize(word: &str) -> String {
    if let Some(lemma) = irregular(word) {
        return lemma.to_string();
    }
    let plural = word.len() > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is");
    if plural {
        let stem = &word[..word.len() - 1];
        return irregular(stem).unwrap_or(stem).to_string();
    }
    word.to_string()
}

fn ngrams(tokens: &[String], max_n: usize) -> Vec<String> {
    let mut grams = Vec::new();
    for n in 1..=max_n {
        for window in tokens.windows(n) {
            grams.push(window.join(" "));
        }
    }
    grams
}

const MAX_NGRAM: usize = 3;

type SparseVector = HashMap<String, f64>;

/// TF-IDF cosine-similarity classifier.
///
/// Input that scores below `threshold` is retried with synonyms appended
/// against the lower `synonym_threshold`, then checked for booking keywords,
/// and finally labelled [`Intent::Unknown`].
#[derive(Debug, Clone)]
pub struct IntentModel {
    idf: HashMap<String, f64>,
    documents: Vec<(Intent, SparseVector)>,
    threshold: f64,
    synonym_threshold: f64,
    synonyms: BTreeMap<String, Vec<String>>,
    booking_keywords: Vec<String>,
}

impl Default for IntentModel {
    fn default() -> Self {
        Self::new(&IntentConfig::default())
    }
}

impl IntentModel {
    pub fn new(config: &IntentConfig) -> Self {
        let corpus: Vec<(Intent, Vec<String>)> = config
            .intents
            .iter()
            .flat_map(|examples| {
                examples
                    .phrases
                    .iter()
                    .map(move |p| (examples.intent, ngrams(&preprocess(p), MAX_NGRAM)))
            })
            .filter(|(_, grams)| !grams.is_empty())
            .collect();

        let mut df: HashMap<String, usize> = HashMap::new();
        for (_, grams) in &corpus {
            let mut seen: Vec<&String> = grams.iter().collect();
            seen.sort();
            seen.dedup();
            for gram in seen {
                *df.entry(gram.clone()).or_insert(0) += 1;
            }
        }

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1
        let n = corpus.len() as f64;
        let idf: HashMap<String, f64> = df
            .into_iter()
            .map(|(gram, count)| (gram, ((1.0 + n) / (1.0 + count as f64)).ln() + 1.0))
            .collect();

        let documents = corpus
            .into_iter()
            .map(|(intent, grams)| (intent, vectorize(&grams, &idf)))
            .collect();

        Self {
            idf,
            documents,
            threshold: config.threshold,
            synonym_threshold: config.synonym_threshold,
            synonyms: config.synonyms.clone(),
            booking_keywords: config.booking_keywords.clone(),
        }
    }

    /// Loads `path` (see [`IntentConfig::load`]); an unreadable file falls
    /// back to the built-in corpus.
    pub fn at_path(path: &Path) -> Self {
        let config = IntentConfig::load(path).unwrap_or_else(|e| {
            log::warn!("[Intent] Using built-in intents: {}", e);
            IntentConfig::default()
        });
        Self::new(&config)
    }

    /// Best matching intent and its cosine similarity.
    pub fn best_score(&self, tokens: &[String]) -> Option<(Intent, f64)> {
        let query = vectorize(&ngrams(tokens, MAX_NGRAM), &self.idf);
        if query.is_empty() {
            return None;
        }
        let mut best: Option<(Intent, f64)> = None;
        for (intent, doc) in &self.documents {
            let score = cosine(&query, doc);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((*intent, score));
            }
        }
        best
    }

    fn expand(&self, tokens: &[String]) -> Vec<String> {
        let mut expanded = tokens.to_vec();
        for token in tokens {
            if let Some(extra) = self.synonyms.get(token) {
                for word in extra {
                    expanded.extend(preprocess(word));
                }
            }
        }
        expanded
    }
}

fn vectorize(grams: &[String], idf: &HashMap<String, f64>) -> SparseVector {
    let mut vector: SparseVector = HashMap::new();
    for gram in grams {
        if let Some(weight) = idf.get(gram) {
            *vector.entry(gram.clone()).or_insert(0.0) += weight;
        }
    }
    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
    vector
}

/// Dot product of two L2-normalised vectors.
fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(gram, w)| large.get(gram).map(|v| w * v))
        .sum()
}

impl Classifier for IntentModel {
    type Label = Intent;

    fn classify(&self, text: &str) -> Intent {
        let tokens = preprocess(text);
        if tokens.is_empty() {
            return Intent::Unknown;
        }

        if let Some((intent, score)) = self.best_score(&tokens) {
            if score >= self.threshold {
                log::debug!("[Intent] '{}' -> {:?} ({:.2})", text, intent, score);
                return intent;
            }
        }

        let expanded = self.expand(&tokens);
        if expanded.len() > tokens.len() {
            if let Some((intent, score)) = self.best_score(&expanded) {
                if score >= self.synonym_threshold {
                    log::debug!(
                        "[Intent] '{}' -> {:?} via synonyms ({:.2})",
                        text,
                        intent,
                        score
                    );
                    return intent;
                }
            }
        }

        if expanded.iter().any(|t| self.booking_keywords.contains(t)) {
            log::debug!("[Intent] '{}' -> Booking via keyword", text);
            return Intent::Booking;
        }

        log::debug!("[Intent] '{}' -> Unknown", text);
        Intent::Unknown
    }
}
