// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Fuzzy matching of free text against the closed city vocabularies.

use serde::Serialize;
use std::fmt;
use strsim::levenshtein;

use crate::dialogue::Interaction;
use crate::tokens::{is_stopword, title_case, words};

/// A city served by the booking system. Only obtainable through a
/// [`Vocabulary`], so holding one means the name is a known member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct City(String);

impl City {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for City {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    cities: Vec<City>,
}

impl Vocabulary {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cities: Vec<City> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || cities.iter().any(|c| c.0 == name) {
                continue;
            }
            cities.push(City(name.to_string()));
        }
        Self { cities }
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Exact (case-sensitive) membership lookup.
    pub fn get(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.0 == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn overlaps(&self, other: &Vocabulary) -> Vec<&City> {
        self.cities
            .iter()
            .filter(|c| other.contains(c.name()))
            .collect()
    }

    /// "London, Toronto, Sydney"
    pub fn display_list(&self) -> String {
        self.cities
            .iter()
            .map(City::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Closest vocabulary entry within `max_edit_distance`, with its distance.
pub fn best_match_with_distance(
    text: &str,
    vocabulary: &Vocabulary,
    max_edit_distance: usize,
) -> Option<(City, usize)> {
    let alpha: Vec<String> = words(text)
        .into_iter()
        .filter(|w| w.chars().all(char::is_alphabetic))
        .collect();
    if alpha.is_empty() {
        return None;
    }
    let candidate = title_case(&alpha);

    let mut best: Option<(&City, usize)> = None;
    for city in vocabulary.cities() {
        let distance = levenshtein(&candidate, city.name());
        // Strict less-than keeps the earlier entry on ties.
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((city, distance));
        }
    }

    match best {
        Some((city, distance)) if distance <= max_edit_distance => {
            log::debug!(
                "[Location] '{}' -> '{}' (distance {})",
                candidate,
                city,
                distance
            );
            Some((city.clone(), distance))
        }
        _ => None,
    }
}

pub fn best_match(text: &str, vocabulary: &Vocabulary, max_edit_distance: usize) -> Option<City> {
    best_match_with_distance(text, vocabulary, max_edit_distance).map(|(city, _)| city)
}

/// Like [`best_match`], but a corrected spelling has to be confirmed by the
/// user. A declined suggestion yields `None` so the caller asks again.
pub fn confirm_location(
    text: &str,
    vocabulary: &Vocabulary,
    max_edit_distance: usize,
    interaction: &mut dyn Interaction,
) -> Option<City> {
    let city = best_match(text, vocabulary, max_edit_distance)?;
    accept_with_confirmation(text, city, interaction)
}

fn accept_with_confirmation(
    raw: &str,
    city: City,
    interaction: &mut dyn Interaction,
) -> Option<City> {
    if city.name().eq_ignore_ascii_case(raw.trim()) {
        return Some(city);
    }
    if interaction.confirm(&format!("Did you mean {}? (yes/no)", city)) {
        Some(city)
    } else {
        None
    }
}

/// Resolves the answer to "where are you flying from?".
///
/// The whole reply is tried first ("new york", "Lonbon"). Otherwise one- and
/// two-word spans of the meaningful words are tried from the end of the
/// reply backwards ("I'd like to leave from Frankfurt please").
pub fn resolve_reply(
    text: &str,
    vocabulary: &Vocabulary,
    max_edit_distance: usize,
    interaction: &mut dyn Interaction,
) -> Option<City> {
    if best_match(text, vocabulary, max_edit_distance).is_some() {
        return confirm_location(text, vocabulary, max_edit_distance, interaction);
    }

    let meaningful: Vec<String> = words(text)
        .into_iter()
        .filter(|w| w.chars().all(char::is_alphabetic) && !is_stopword(w))
        .collect();

    let mut best: Option<(City, usize, String)> = None;
    for end in (1..=meaningful.len()).rev() {
        for len in [2usize, 1] {
            if len > end {
                continue;
            }
            let span = meaningful[end - len..end].join(" ");
            if let Some((city, distance)) =
                best_match_with_distance(&span, vocabulary, max_edit_distance)
            {
                if best.as_ref().map_or(true, |(_, d, _)| distance < *d) {
                    best = Some((city, distance, span));
                }
            }
        }
    }

    let (city, _, span) = best?;
    accept_with_confirmation(&span, city, interaction)
}
