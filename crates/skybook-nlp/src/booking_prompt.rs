// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Slot extraction from free-text booking requests, e.g.
//! "I want to fly from London to Paris tomorrow in business class".

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::date_parser::parse_date;
use crate::dialogue::Interaction;
use crate::location::{best_match, confirm_location, City, Vocabulary};
use crate::tokens::{title_case, tokenize, HeuristicTagger, Tagger, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelClass {
    Economy,
    Business,
    First,
}

impl TravelClass {
    pub const ALL: [TravelClass; 3] = [TravelClass::Economy, TravelClass::Business, TravelClass::First];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelClass::Economy => "economy",
            TravelClass::Business => "business",
            TravelClass::First => "first",
        }
    }

    /// First class name found anywhere in `text`, checked economy, business,
    /// first.
    pub fn detect(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        Self::ALL.into_iter().find(|c| lower.contains(c.as_str()))
    }
}

impl fmt::Display for TravelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown travel class '{0}' (expected economy, business or first)")]
pub struct UnknownTravelClass(pub String);

impl FromStr for TravelClass {
    type Err = UnknownTravelClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "economy" => Ok(TravelClass::Economy),
            "business" => Ok(TravelClass::Business),
            "first" => Ok(TravelClass::First),
            other => Err(UnknownTravelClass(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnLeg {
    OneWay,
    On(NaiveDate),
}

impl ReturnLeg {
    /// Reads an answer to "when will you return?". Relative expressions are
    /// resolved against the departure date.
    pub fn parse(text: &str, departure: NaiveDate) -> Option<Self> {
        let lower = text.trim().to_lowercase();
        if lower.contains("one-way")
            || lower.contains("one way")
            || lower.contains("oneway")
            || lower.contains("no return")
        {
            return Some(ReturnLeg::OneWay);
        }
        parse_date(text, departure).map(ReturnLeg::On)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ReturnLeg::OneWay => None,
            ReturnLeg::On(date) => Some(*date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Origin,
    Destination,
    DepartureDate,
    ReturnDate,
    TravelClass,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BookingDetails {
    pub origin: Option<City>,
    pub destination: Option<City>,
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<ReturnLeg>,
    pub travel_class: Option<TravelClass>,
    pub flight_number: Option<String>,
}

impl BookingDetails {
    /// The first unfilled core slot, in the order the assistant asks for them.
    pub fn next_missing(&self) -> Option<Slot> {
        if self.origin.is_none() {
            Some(Slot::Origin)
        } else if self.destination.is_none() {
            Some(Slot::Destination)
        } else if self.departure_date.is_none() {
            Some(Slot::DepartureDate)
        } else if self.return_date.is_none() {
            Some(Slot::ReturnDate)
        } else if self.travel_class.is_none() {
            Some(Slot::TravelClass)
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.next_missing().is_none()
    }
}

/// Fills booking slots from a single utterance.
///
/// Holds no conversation state: the same utterance, existing details and
/// confirmation answers always give the same result.
pub struct BookingExtractor {
    origins: Vocabulary,
    destinations: Vocabulary,
    max_edit_distance: usize,
    tagger: Box<dyn Tagger>,
}

/// Longest run of proper nouns considered as one city name.
const MAX_NAME_TOKENS: usize = 3;

impl BookingExtractor {
    pub fn new(origins: Vocabulary, destinations: Vocabulary, max_edit_distance: usize) -> Self {
        Self {
            origins,
            destinations,
            max_edit_distance,
            tagger: Box::new(HeuristicTagger),
        }
    }

    pub fn with_tagger(mut self, tagger: Box<dyn Tagger>) -> Self {
        self.tagger = tagger;
        self
    }

    pub fn origins(&self) -> &Vocabulary {
        &self.origins
    }

    pub fn destinations(&self) -> &Vocabulary {
        &self.destinations
    }

    pub fn max_edit_distance(&self) -> usize {
        self.max_edit_distance
    }

    /// Returns `existing` with any empty slot that `utterance` fills.
    /// Filled slots are never overwritten.
    pub fn extract(
        &self,
        utterance: &str,
        existing: &BookingDetails,
        reference: NaiveDate,
        interaction: &mut dyn Interaction,
    ) -> BookingDetails {
        let mut details = existing.clone();

        if details.travel_class.is_none() {
            details.travel_class = TravelClass::detect(utterance);
        }

        let tokens = tokenize(utterance, self.tagger.as_ref());

        if details.origin.is_none() {
            details.origin = self.anchored(&tokens, "from", &self.origins, interaction);
        }
        if details.destination.is_none() {
            details.destination = self.anchored(&tokens, "to", &self.destinations, interaction);
        }
        if details.origin.is_none() {
            details.origin = sweep(&tokens, &self.origins);
        }
        if details.destination.is_none() {
            details.destination = sweep(&tokens, &self.destinations);
        }

        if details.departure_date.is_none() {
            details.departure_date = parse_date(utterance, reference);
        }

        log::debug!("[Extract] '{}' -> {:?}", utterance, details);
        details
    }

    /// City following an anchor word ("from", "to"). Each occurrence of the
    /// anchor is tried in order; the first accepted candidate wins.
    fn anchored(
        &self,
        tokens: &[Token],
        anchor: &str,
        vocabulary: &Vocabulary,
        interaction: &mut dyn Interaction,
    ) -> Option<City> {
        for (i, token) in tokens.iter().enumerate() {
            if token.lower() != anchor {
                continue;
            }
            let rest = &tokens[i + 1..];
            if rest.is_empty() {
                continue;
            }

            if let Some(city) = exact_span(rest, vocabulary) {
                return Some(city);
            }

            if !rest[0].is_proper_noun() {
                continue;
            }
            let run = rest
                .iter()
                .take(MAX_NAME_TOKENS)
                .take_while(|t| t.is_proper_noun())
                .count();
            for len in (1..=run).rev() {
                let span = span_text(&rest[..len]);
                if best_match(&span, vocabulary, self.max_edit_distance).is_none() {
                    continue;
                }
                // Only the longest matching span is offered; a declined
                // suggestion moves on to the next anchor.
                match confirm_location(&span, vocabulary, self.max_edit_distance, interaction) {
                    Some(city) => return Some(city),
                    None => break,
                }
            }
        }
        None
    }
}

fn span_text(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Two-word then one-word vocabulary member at the start of `tokens`.
fn exact_span(tokens: &[Token], vocabulary: &Vocabulary) -> Option<City> {
    for len in [2usize, 1] {
        if tokens.len() < len || !tokens[..len].iter().all(Token::is_alphabetic) {
            continue;
        }
        let words: Vec<&str> = tokens[..len].iter().map(|t| t.text.as_str()).collect();
        if let Some(city) = vocabulary.get(&title_case(&words)) {
            return Some(city.clone());
        }
    }
    None
}

/// Proper nouns anywhere in the utterance that spell a vocabulary member.
fn sweep(tokens: &[Token], vocabulary: &Vocabulary) -> Option<City> {
    for (i, token) in tokens.iter().enumerate() {
        if !token.is_proper_noun() {
            continue;
        }
        if let Some(city) = exact_span(&tokens[i..], vocabulary) {
            return Some(city);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::ScriptedInteraction;

    fn extractor() -> BookingExtractor {
        BookingExtractor::new(
            Vocabulary::new(["London", "Toronto", "Sydney", "Dubai", "Frankfurt", "Mumbai"]),
            Vocabulary::new(["Paris", "New York", "Berlin", "Singapore", "Tokyo", "Amsterdam"]),
            2,
        )
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn silent() -> ScriptedInteraction {
        ScriptedInteraction::new(Vec::<String>::new())
    }

    #[test]
    fn test_extract_full_request() {
        let details = extractor().extract(
            "I want to fly from London to Paris tomorrow in business class",
            &BookingDetails::default(),
            ymd(2024, 1, 1),
            &mut silent(),
        );
        assert_eq!(details.origin.unwrap(), "London");
        assert_eq!(details.destination.unwrap(), "Paris");
        assert_eq!(details.departure_date, Some(ymd(2024, 1, 2)));
        assert_eq!(details.travel_class, Some(TravelClass::Business));
        assert_eq!(details.return_date, None);
    }

    #[test]
    fn test_extract_lowercase_and_multi_word_city() {
        let details = extractor().extract(
            "book a flight from sydney to new york",
            &BookingDetails::default(),
            ymd(2024, 1, 1),
            &mut silent(),
        );
        assert_eq!(details.origin.unwrap(), "Sydney");
        assert_eq!(details.destination.unwrap(), "New York");
        assert_eq!(details.departure_date, None);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let ex = extractor();
        let utterance = "from Dubai to Tokyo next week, economy please";
        let first = ex.extract(utterance, &BookingDetails::default(), ymd(2024, 5, 1), &mut silent());
        let second = ex.extract(utterance, &first, ymd(2024, 5, 1), &mut silent());
        assert_eq!(first, second);
        assert_eq!(first.travel_class, Some(TravelClass::Economy));
        assert_eq!(first.departure_date, Some(ymd(2024, 5, 8)));
    }

    #[test]
    fn test_extract_never_overwrites() {
        let ex = extractor();
        let existing = ex.extract(
            "from London to Paris in first class",
            &BookingDetails::default(),
            ymd(2024, 1, 1),
            &mut silent(),
        );
        let updated = ex.extract(
            "actually from Toronto to Berlin in economy tomorrow",
            &existing,
            ymd(2024, 1, 1),
            &mut silent(),
        );
        assert_eq!(updated.origin.unwrap(), "London");
        assert_eq!(updated.destination.unwrap(), "Paris");
        assert_eq!(updated.travel_class, Some(TravelClass::First));
        assert_eq!(updated.departure_date, Some(ymd(2024, 1, 2)));
    }

    #[test]
    fn test_typo_goes_through_confirmation() {
        let mut yes = ScriptedInteraction::new(["yes"]);
        let details = extractor().extract(
            "from Lonbon to Paris",
            &BookingDetails::default(),
            ymd(2024, 1, 1),
            &mut yes,
        );
        assert_eq!(details.origin.unwrap(), "London");
        assert!(yes.said("Did you mean London?"));

        let mut no = ScriptedInteraction::new(["no"]);
        let details = extractor().extract(
            "from Lonbon to Paris",
            &BookingDetails::default(),
            ymd(2024, 1, 1),
            &mut no,
        );
        assert_eq!(details.origin, None);
        assert_eq!(details.destination.unwrap(), "Paris");
    }

    #[test]
    fn test_sweep_without_anchor_words() {
        let details = extractor().extract(
            "Frankfurt Amsterdam on friday",
            &BookingDetails::default(),
            ymd(2024, 1, 3),
            &mut silent(),
        );
        assert_eq!(details.origin.unwrap(), "Frankfurt");
        assert_eq!(details.destination.unwrap(), "Amsterdam");
        assert_eq!(details.departure_date, Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_travel_class_order_and_parse() {
        assert_eq!(
            TravelClass::detect("economy or maybe first"),
            Some(TravelClass::Economy)
        );
        assert_eq!(TravelClass::detect("window seat"), None);
        assert_eq!("Business".parse::<TravelClass>(), Ok(TravelClass::Business));
        assert!("premium".parse::<TravelClass>().is_err());
    }

    #[test]
    fn test_return_leg() {
        let departure = ymd(2024, 1, 2);
        assert_eq!(ReturnLeg::parse("One-way", departure), Some(ReturnLeg::OneWay));
        assert_eq!(
            ReturnLeg::parse("a week later", departure),
            Some(ReturnLeg::On(ymd(2024, 1, 9)))
        );
        assert_eq!(ReturnLeg::parse("whenever", departure), None);
    }

    #[test]
    fn test_next_missing_follows_prompt_order() {
        let mut details = BookingDetails::default();
        assert_eq!(details.next_missing(), Some(Slot::Origin));
        details.departure_date = Some(ymd(2024, 1, 2));
        details.return_date = Some(ReturnLeg::OneWay);
        details.travel_class = Some(TravelClass::First);
        assert_eq!(details.next_missing(), Some(Slot::Origin));
        assert!(!details.is_complete());
    }
}
