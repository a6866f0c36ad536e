// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use chrono::NaiveDate;
use serde::Serialize;
use skybook_nlp::booking_prompt::{BookingDetails, ReturnLeg, Slot, TravelClass};
use skybook_nlp::date_parser::format_date;
use thiserror::Error;

/// A row of the synthetic flight table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRecord {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub travel_class: TravelClass,
    pub price: f64,
}

impl FlightRecord {
    /// "Flight LOPA103 from London to Paris, Departure: 02-01-2024, ..."
    pub fn summary(&self) -> String {
        format!(
            "Flight {} from {} to {}, Departure: {}, Return: {}, Class: {}, Price: ${:.2}",
            self.flight_number,
            self.origin,
            self.destination,
            format_date(self.departure_date),
            self.return_date
                .map(format_date)
                .unwrap_or_else(|| "One-way".to_string()),
            self.travel_class,
            self.price
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub user_name: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub flight_number: String,
    pub travel_class: TravelClass,
}

#[derive(Error, Debug, PartialEq)]
pub enum BookingError {
    #[error("A booking needs a user name")]
    MissingUser,
    #[error("Booking details are incomplete (missing {0:?})")]
    Incomplete(Slot),
    #[error("Flight {flight} does not serve {origin} to {destination}")]
    FlightMismatch {
        flight: String,
        origin: String,
        destination: String,
    },
    #[error("Return on {return_date} is before flight {flight} departs on {departure_date}")]
    ReturnBeforeDeparture {
        flight: String,
        departure_date: NaiveDate,
        return_date: NaiveDate,
    },
}

impl Booking {
    /// Builds the booking for a flight the user picked.
    ///
    /// Dates, class and cities come from the flight actually booked, which can
    /// differ from the request after a flexible search; the return leg is the
    /// one the user asked for.
    pub fn from_details(
        user_name: &str,
        details: &BookingDetails,
        flight: &FlightRecord,
    ) -> Result<Self, BookingError> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(BookingError::MissingUser);
        }
        if let Some(slot) = details.next_missing() {
            return Err(BookingError::Incomplete(slot));
        }

        let (origin, destination) = match (&details.origin, &details.destination) {
            (Some(o), Some(d)) => (o.name(), d.name()),
            _ => return Err(BookingError::Incomplete(Slot::Origin)),
        };
        if flight.origin != origin || flight.destination != destination {
            return Err(BookingError::FlightMismatch {
                flight: flight.flight_number.clone(),
                origin: origin.to_string(),
                destination: destination.to_string(),
            });
        }

        let return_date = details.return_date.as_ref().and_then(ReturnLeg::date);
        if let Some(back) = return_date {
            if back < flight.departure_date {
                return Err(BookingError::ReturnBeforeDeparture {
                    flight: flight.flight_number.clone(),
                    departure_date: flight.departure_date,
                    return_date: back,
                });
            }
        }

        Ok(Self {
            user_name: user_name.to_string(),
            origin: flight.origin.clone(),
            destination: flight.destination.clone(),
            departure_date: flight.departure_date,
            return_date,
            flight_number: flight.flight_number.clone(),
            travel_class: flight.travel_class,
        })
    }
}
