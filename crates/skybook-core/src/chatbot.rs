// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use chrono::NaiveDate;
use regex::Regex;
use skybook_nlp::booking_prompt::BookingExtractor;
use skybook_nlp::date_parser::format_date;
use skybook_nlp::dialogue::Interaction;
use skybook_nlp::intent::{Classifier, Intent, IntentModel};
use skybook_nlp::sentiment::{Sentiment, SentimentLexicon};
use std::fmt::Display;
use std::sync::OnceLock;

use crate::config::AppConfig;
use crate::responses::{Reply, Responses};
use crate::session::{BookingOutcome, BookingSession, SessionError};
use crate::store::FlightStore;

/// The interactive assistant: asks for the user's name, then answers one
/// utterance at a time until the user says goodbye or input ends.
pub struct Chatbot {
    extractor: BookingExtractor,
    store: FlightStore,
    intents: Box<dyn Classifier<Label = Intent>>,
    sentiment: Box<dyn Classifier<Label = Sentiment>>,
    responses: Responses,
    today: NaiveDate,
    flexible: bool,
}

impl Chatbot {
    pub fn new(config: &AppConfig, store: FlightStore, today: NaiveDate) -> Self {
        Self {
            extractor: config.extractor(),
            store,
            intents: Box::new(IntentModel::default()),
            sentiment: Box::new(SentimentLexicon::default()),
            responses: Responses::default(),
            today,
            flexible: config.flexible_search,
        }
    }

    pub fn with_intents(mut self, intents: Box<dyn Classifier<Label = Intent>>) -> Self {
        self.intents = intents;
        self
    }

    pub fn with_sentiment(mut self, sentiment: Box<dyn Classifier<Label = Sentiment>>) -> Self {
        self.sentiment = sentiment;
        self
    }

    pub fn with_responses(mut self, responses: Responses) -> Self {
        self.responses = responses;
        self
    }

    pub fn run(&mut self, io: &mut dyn Interaction) {
        let Some(name) = self.ask_name(io) else {
            return;
        };
        self.greet(&name, io);

        while let Some(input) = io.ask("") {
            let input = input.trim();
            if input.is_empty() {
                continue;
            }
            let intent = self.intents.classify(input);
            log::debug!("[Chat] {} said '{}' ({:?})", name, input, intent);
            if !self.respond(&name, input, intent, io) {
                break;
            }
        }
    }

    fn ask_name(&mut self, io: &mut dyn Interaction) -> Option<String> {
        let mut prompt = self.responses.text(Reply::Welcome);
        loop {
            let name = io.ask(&prompt)?.trim().to_string();
            if !name.is_empty() {
                return Some(name);
            }
            prompt = self.responses.text(Reply::NamePrompt);
        }
    }

    fn greet(&mut self, name: &str, io: &mut dyn Interaction) {
        let last = match self.store.last_booking(name) {
            Ok(last) => last,
            Err(e) => {
                log::error!("[Chat] Could not look up past bookings: {}", e);
                None
            }
        };
        let text = match last {
            Some(booking) => self.responses.render(
                Reply::WelcomeBack,
                &[
                    ("name", name),
                    ("origin", &booking.origin),
                    ("destination", &booking.destination),
                    ("departure_date", &format_date(booking.departure_date)),
                ],
            ),
            None => self.responses.render(Reply::NewUserGreeting, &[("name", name)]),
        };
        io.say(&text);
    }

    /// Handles one utterance. Returns false when the conversation is over.
    fn respond(&mut self, name: &str, input: &str, intent: Intent, io: &mut dyn Interaction) -> bool {
        let vars = [("name", name)];
        match intent {
            Intent::Greeting => io.say(&self.responses.render(Reply::Greeting, &vars)),
            Intent::Thanks => io.say(&self.responses.render(Reply::Thanks, &vars)),
            Intent::Capabilities => io.say(&self.responses.text(Reply::Capabilities)),
            Intent::UserName => io.say(&self.responses.render(Reply::UserName, &vars)),
            Intent::Farewell => {
                io.say(&self.responses.render(Reply::Farewell, &vars));
                return false;
            }
            Intent::HowAreYou => {
                let Some(answer) = io.ask(&self.responses.text(Reply::HowAreYou)) else {
                    return false;
                };
                let reply = match self.sentiment.classify(&answer) {
                    Sentiment::Positive => Reply::PositiveFeelings,
                    Sentiment::Negative => Reply::NegativeFeelings,
                    Sentiment::Neutral => Reply::NeutralFeelings,
                };
                io.say(&self.responses.render(reply, &vars));
            }
            Intent::Booking => self.book(name, input, io),
            Intent::ListBookings => self.list_bookings(name, io),
            Intent::CancelBooking => return self.cancel_booking(name, input, io),
            Intent::Unknown => io.say(&self.responses.text(Reply::NotUnderstood)),
        }
        true
    }

    fn book(&mut self, name: &str, input: &str, io: &mut dyn Interaction) {
        let mut session =
            BookingSession::new(&self.extractor, &self.store, &mut self.responses, self.today)
                .flexible(self.flexible);
        match session.run(name, input, io) {
            Ok(BookingOutcome::Booked(booking)) => {
                log::info!("[Chat] {} booked {}", name, booking.flight_number)
            }
            Ok(outcome) => log::debug!("[Chat] Booking ended: {:?}", outcome),
            Err(SessionError::Store(e)) => self.report_store_error(&e, io),
            Err(SessionError::Booking(e)) => {
                log::error!("[Chat] Booking rejected: {}", e);
                io.say(&self.responses.text(Reply::NotUnderstood));
            }
        }
    }

    fn list_bookings(&mut self, name: &str, io: &mut dyn Interaction) {
        let bookings = match self.store.list_for_user(name) {
            Ok(bookings) => bookings,
            Err(e) => return self.report_store_error(&e, io),
        };
        if bookings.is_empty() {
            io.say(&self.responses.render(Reply::NoBookings, &[("name", name)]));
            return;
        }
        io.say(&self.responses.render(Reply::BookingList, &[("name", name)]));
        for (i, b) in bookings.iter().enumerate() {
            let back = b
                .return_date
                .map(|d| format!(", returning {}", format_date(d)))
                .unwrap_or_else(|| ", one-way".to_string());
            io.say(&format!(
                "{}. Flight {} from {} to {} on {} ({}){}",
                i + 1,
                b.flight_number,
                b.origin,
                b.destination,
                format_date(b.departure_date),
                b.travel_class,
                back
            ));
        }
    }

    fn cancel_booking(&mut self, name: &str, input: &str, io: &mut dyn Interaction) -> bool {
        let flight_number = match find_flight_number(input) {
            Some(number) => number,
            None => match io.ask(&self.responses.text(Reply::CancelPrompt)) {
                Some(answer) => find_flight_number(&answer)
                    .unwrap_or_else(|| answer.trim().to_uppercase()),
                None => return false,
            },
        };

        let vars = [("flight_number", flight_number.as_str())];
        match self.store.cancel(name, &flight_number) {
            Ok(true) => io.say(&self.responses.render(Reply::CancelConfirmed, &vars)),
            Ok(false) => io.say(&self.responses.render(Reply::CancelNotFound, &vars)),
            Err(e) => self.report_store_error(&e, io),
        }
        true
    }

    fn report_store_error(&mut self, error: &dyn Display, io: &mut dyn Interaction) {
        log::error!("[Chat] Flight database unavailable: {}", error);
        io.say(&self.responses.text(Reply::StoreUnavailable));
    }
}

/// Flight numbers look like "LOPA103": four letters then digits.
fn find_flight_number(text: &str) -> Option<String> {
    static FLIGHT_RE: OnceLock<Regex> = OnceLock::new();
    let re = FLIGHT_RE.get_or_init(|| Regex::new(r"(?i)\b[a-z]{4}\d{3,}\b").unwrap());
    re.find(text).map(|m| m.as_str().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_flight_number() {
        assert_eq!(
            find_flight_number("please cancel lopa103 for me"),
            Some("LOPA103".to_string())
        );
        assert_eq!(find_flight_number("cancel my booking"), None);
    }
}
