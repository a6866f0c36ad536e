// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Language handling for the booking assistant: tokenizing, date and city
//! recognition, booking slot extraction, and the intent and sentiment
//! classifiers.

pub mod booking_prompt;
pub mod date_parser;
pub mod dialogue;
pub mod intent;
pub mod location;
pub mod sentiment;
pub mod tokens;

pub use booking_prompt::{BookingDetails, BookingExtractor, ReturnLeg, Slot, TravelClass};
pub use date_parser::{format_date, parse_date, DATE_FORMAT};
pub use dialogue::{Interaction, ScriptedInteraction};
pub use intent::{Classifier, Intent, IntentConfig, IntentModel};
pub use location::{best_match, confirm_location, resolve_reply, City, Vocabulary};
pub use sentiment::{Sentiment, SentimentLexicon};
