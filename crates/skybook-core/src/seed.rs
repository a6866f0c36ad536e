// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Synthetic flight timetable.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use skybook_nlp::booking_prompt::TravelClass;
use skybook_nlp::location::{City, Vocabulary};

use crate::models::FlightRecord;

const BASE_PRICE: f64 = 100.0;
const DAILY_PRICE_STEP: f64 = 5.0;
const RETURN_AFTER_DAYS: i64 = 7;

pub fn price_multiplier(class: TravelClass) -> f64 {
    match class {
        TravelClass::Economy => 1.0,
        TravelClass::Business => 1.5,
        TravelClass::First => 2.0,
    }
}

/// "London", "Paris", day 1 -> "LOPA103"
pub fn flight_number(origin: &City, destination: &City, day: u32) -> String {
    let prefix = |city: &City| -> String {
        city.name()
            .chars()
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    };
    let serial = 100 + day * TravelClass::ALL.len() as u32;
    format!("{}{}{}", prefix(origin), prefix(destination), serial)
}

/// Builds a random timetable for `days` days starting at `start`.
///
/// Each destination gets a flight on a given day with probability 1/2, from
/// a random origin, in a random non-empty set of classes.
pub fn generate_flights<R: Rng + ?Sized>(
    origins: &Vocabulary,
    destinations: &Vocabulary,
    start: NaiveDate,
    days: u32,
    rng: &mut R,
) -> Vec<FlightRecord> {
    let mut flights = Vec::new();
    if origins.is_empty() {
        return flights;
    }

    for destination in destinations.cities() {
        for day in 0..days {
            if !rng.gen_bool(0.5) {
                continue;
            }
            let Some(departure) = start.checked_add_signed(Duration::days(day as i64)) else {
                break;
            };
            let Some(origin) = origins.cities().choose(rng) else {
                continue;
            };

            let count = rng.gen_range(1..=TravelClass::ALL.len());
            for class in TravelClass::ALL.choose_multiple(rng, count) {
                flights.push(FlightRecord {
                    flight_number: flight_number(origin, destination, day),
                    origin: origin.name().to_string(),
                    destination: destination.name().to_string(),
                    departure_date: departure,
                    return_date: departure
                        .checked_add_signed(Duration::days(RETURN_AFTER_DAYS)),
                    travel_class: *class,
                    price: BASE_PRICE * price_multiplier(*class) + DAILY_PRICE_STEP * day as f64,
                });
            }
        }
    }

    log::debug!(
        "[Seed] Generated {} flights over {} days from {}",
        flights.len(),
        days,
        start
    );
    flights
}
