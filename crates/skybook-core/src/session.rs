// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! One booking conversation: fill the slots, search, pick a flight, save.

use chrono::NaiveDate;
use skybook_nlp::booking_prompt::{BookingDetails, BookingExtractor, ReturnLeg, Slot, TravelClass};
use skybook_nlp::date_parser::{format_date, parse_date};
use skybook_nlp::dialogue::Interaction;
use skybook_nlp::location::resolve_reply;
use thiserror::Error;

use crate::models::{Booking, BookingError, FlightRecord};
use crate::responses::{Reply, Responses};
use crate::store::{FlightStore, SearchTier, StoreError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Booking(#[from] BookingError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Booked(Booking),
    /// The user turned the offered flights down.
    Declined,
    NoFlights,
    /// Input ended before the booking was finished.
    Abandoned,
}

pub struct BookingSession<'a> {
    extractor: &'a BookingExtractor,
    store: &'a FlightStore,
    responses: &'a mut Responses,
    today: NaiveDate,
    flexible: bool,
}

impl<'a> BookingSession<'a> {
    pub fn new(
        extractor: &'a BookingExtractor,
        store: &'a FlightStore,
        responses: &'a mut Responses,
        today: NaiveDate,
    ) -> Self {
        Self {
            extractor,
            store,
            responses,
            today,
            flexible: true,
        }
    }

    pub fn flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    /// Runs the whole booking dialogue. `opening` is the utterance that
    /// started it and may already carry some of the details.
    pub fn run(
        &mut self,
        user_name: &str,
        opening: &str,
        io: &mut dyn Interaction,
    ) -> Result<BookingOutcome, SessionError> {
        io.say(&self.responses.text(Reply::BookingStart));

        let mut details = self
            .extractor
            .extract(opening, &BookingDetails::default(), self.today, io);
        if let Some(date) = details.departure_date {
            if date < self.today {
                let text = self
                    .responses
                    .render(Reply::DateInPast, &[("departure_date", &format_date(date))]);
                io.say(&text);
                details.departure_date = None;
            }
        }
        self.acknowledge_extracted(&details, io);

        while let Some(slot) = details.next_missing() {
            if !self.fill_slot(slot, &mut details, io) {
                log::debug!("[Booking] Input ended while asking for {:?}", slot);
                return Ok(BookingOutcome::Abandoned);
            }
        }

        self.search_and_book(user_name, details, io)
    }

    fn acknowledge_extracted(&mut self, details: &BookingDetails, io: &mut dyn Interaction) {
        if let Some(origin) = &details.origin {
            io.say(&self.responses.render(Reply::Origin, &[("origin", origin.name())]));
        }
        if let Some(destination) = &details.destination {
            let text = self
                .responses
                .render(Reply::Destination, &[("destination", destination.name())]);
            io.say(&text);
        }
        if let Some(date) = details.departure_date {
            let text = self
                .responses
                .render(Reply::DepartureDate, &[("departure_date", &format_date(date))]);
            io.say(&text);
        }
        if let Some(class) = details.travel_class {
            let text = self
                .responses
                .render(Reply::TravelClass, &[("travel_class", class.as_str())]);
            io.say(&text);
        }
    }

    /// Asks for one slot until it is filled. Returns false when input ends.
    fn fill_slot(
        &mut self,
        slot: Slot,
        details: &mut BookingDetails,
        io: &mut dyn Interaction,
    ) -> bool {
        let origins = self.extractor.origins().display_list();
        let destinations = self.extractor.destinations().display_list();
        let max_distance = self.extractor.max_edit_distance();

        loop {
            let prompt = match slot {
                Slot::Origin => self
                    .responses
                    .render(Reply::OriginPrompt, &[("available_origins", &origins)]),
                Slot::Destination => self.responses.render(
                    Reply::DestinationPrompt,
                    &[("available_destinations", &destinations)],
                ),
                Slot::DepartureDate => self.responses.text(Reply::DepartureDatePrompt),
                Slot::ReturnDate => self.responses.text(Reply::ReturnDatePrompt),
                Slot::TravelClass => self.responses.text(Reply::TravelClassPrompt),
            };
            let Some(answer) = io.ask(&prompt) else {
                return false;
            };

            let reply = match slot {
                Slot::Origin => {
                    match resolve_reply(&answer, self.extractor.origins(), max_distance, io) {
                        Some(city) => {
                            let text = self
                                .responses
                                .render(Reply::Origin, &[("origin", city.name())]);
                            details.origin = Some(city);
                            text
                        }
                        None => self
                            .responses
                            .render(Reply::InvalidOrigin, &[("available_origins", &origins)]),
                    }
                }
                Slot::Destination => {
                    match resolve_reply(&answer, self.extractor.destinations(), max_distance, io) {
                        Some(city) => {
                            let text = self
                                .responses
                                .render(Reply::Destination, &[("destination", city.name())]);
                            details.destination = Some(city);
                            text
                        }
                        None => self.responses.render(
                            Reply::InvalidDestination,
                            &[("available_destinations", &destinations)],
                        ),
                    }
                }
                Slot::DepartureDate => match parse_date(&answer, self.today) {
                    Some(date) if date < self.today => self
                        .responses
                        .render(Reply::DateInPast, &[("departure_date", &format_date(date))]),
                    Some(date) => {
                        details.departure_date = Some(date);
                        self.responses
                            .render(Reply::DepartureDate, &[("departure_date", &format_date(date))])
                    }
                    None => self.responses.text(Reply::InvalidDate),
                },
                Slot::ReturnDate => {
                    // Departure is always asked first.
                    let departure = details.departure_date.unwrap_or(self.today);
                    match ReturnLeg::parse(&answer, departure) {
                        Some(ReturnLeg::OneWay) => {
                            details.return_date = Some(ReturnLeg::OneWay);
                            self.responses.text(Reply::OneWay)
                        }
                        Some(ReturnLeg::On(date)) if date < departure => self.responses.render(
                            Reply::ReturnBeforeDeparture,
                            &[("departure_date", &format_date(departure))],
                        ),
                        Some(ReturnLeg::On(date)) => {
                            details.return_date = Some(ReturnLeg::On(date));
                            self.responses
                                .render(Reply::ReturnDate, &[("return_date", &format_date(date))])
                        }
                        None => self.responses.text(Reply::InvalidDate),
                    }
                }
                Slot::TravelClass => match TravelClass::detect(&answer) {
                    Some(class) => {
                        details.travel_class = Some(class);
                        self.responses
                            .render(Reply::TravelClass, &[("travel_class", class.as_str())])
                    }
                    None => self.responses.text(Reply::InvalidClass),
                },
            };
            io.say(&reply);

            if details.next_missing() != Some(slot) {
                return true;
            }
        }
    }

    fn search_and_book(
        &mut self,
        user_name: &str,
        mut details: BookingDetails,
        io: &mut dyn Interaction,
    ) -> Result<BookingOutcome, SessionError> {
        let (Some(origin), Some(destination), Some(date), Some(class)) = (
            details.origin.clone(),
            details.destination.clone(),
            details.departure_date,
            details.travel_class,
        ) else {
            return Err(BookingError::Incomplete(details.next_missing().unwrap_or(Slot::Origin)).into());
        };

        let check = self.responses.render(
            Reply::FlightCheck,
            &[
                ("origin", origin.name()),
                ("destination", destination.name()),
                ("departure_date", &format_date(date)),
                ("travel_class", class.as_str()),
            ],
        );
        io.say(&check);

        let outcome = self.store.search_flights_from(
            origin.name(),
            destination.name(),
            date,
            class,
            self.flexible,
            self.today,
        )?;
        match outcome.tier {
            SearchTier::NotFound => {
                io.say(&self.responses.text(Reply::NoFlightsFound));
                return Ok(BookingOutcome::NoFlights);
            }
            SearchTier::Flexible => io.say(&self.responses.text(Reply::FlexibleResults)),
            SearchTier::NextAvailable => io.say(&self.responses.text(Reply::NextAvailable)),
            SearchTier::Exact => {}
        }

        let Some(flight) = self.select_flight(outcome.flights, io) else {
            return Ok(BookingOutcome::Declined);
        };

        // The picked flight can leave later than the requested date.
        if let Some(ReturnLeg::On(back)) = details.return_date {
            if back < flight.departure_date {
                let text = self.responses.render(
                    Reply::ReturnBeforeFlight,
                    &[
                        ("flight_number", &flight.flight_number),
                        ("departure_date", &format_date(flight.departure_date)),
                        ("return_date", &format_date(back)),
                    ],
                );
                io.say(&text);
                details.departure_date = Some(flight.departure_date);
                details.return_date = None;
                if !self.fill_slot(Slot::ReturnDate, &mut details, io) {
                    return Ok(BookingOutcome::Abandoned);
                }
            }
        }

        details.flight_number = Some(flight.flight_number.clone());
        let booking = Booking::from_details(user_name, &details, &flight)?;
        self.store.save(&booking)?;

        let confirmed = self.responses.render(
            Reply::BookingConfirmedDetails,
            &[
                ("flight_number", &booking.flight_number),
                ("origin", &booking.origin),
                ("destination", &booking.destination),
                ("departure_date", &format_date(booking.departure_date)),
                ("travel_class", booking.travel_class.as_str()),
            ],
        );
        io.say(&confirmed);
        Ok(BookingOutcome::Booked(booking))
    }

    /// Yes/no for a single flight, a numbered choice otherwise. `None` when
    /// the user declines or input ends.
    fn select_flight(
        &mut self,
        mut flights: Vec<FlightRecord>,
        io: &mut dyn Interaction,
    ) -> Option<FlightRecord> {
        if flights.len() == 1 {
            let flight = flights.remove(0);
            let offer = self
                .responses
                .render(Reply::SingleFlight, &[("flight", &flight.summary())]);
            io.say(&offer);
            if io.confirm(&self.responses.text(Reply::ConfirmationPrompt)) {
                return Some(flight);
            }
            io.say(&self.responses.text(Reply::BookingDeclined));
            return None;
        }

        for (i, flight) in flights.iter().enumerate() {
            io.say(&format!("{}. {}", i + 1, flight.summary()));
        }
        let count = flights.len().to_string();
        loop {
            let answer = io.ask(&self.responses.text(Reply::SelectionPrompt))?;
            let answer = answer.trim().to_lowercase();
            if matches!(answer.as_str(), "none" | "no" | "cancel") {
                io.say(&self.responses.text(Reply::BookingDeclined));
                return None;
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=flights.len()).contains(&n) => return Some(flights.swap_remove(n - 1)),
                _ => io.say(&self.responses.render(Reply::InvalidSelection, &[("count", &count)])),
            }
        }
    }
}
