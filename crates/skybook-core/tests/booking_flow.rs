// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use chrono::{Duration, NaiveDate};
use skybook_core::responses::Responses;
use skybook_core::{AppConfig, Booking, BookingOutcome, BookingSession, FlightRecord, FlightStore, SearchTier};
use skybook_nlp::{ScriptedInteraction, TravelClass};
use tempfile::tempdir;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn flight(number: &str, date: NaiveDate, class: TravelClass) -> FlightRecord {
    FlightRecord {
        flight_number: number.to_string(),
        origin: "London".to_string(),
        destination: "Paris".to_string(),
        departure_date: date,
        return_date: Some(date + Duration::days(7)),
        travel_class: class,
        price: 100.0,
    }
}

fn seeded_store(dir: &std::path::Path, flights: &[FlightRecord]) -> FlightStore {
    let store = FlightStore::new(dir.join("data").join("flights.db")).with_flex_window(7);
    store.init().unwrap();
    store.seed_flights(flights).unwrap();
    store
}

#[test]
fn test_tiered_search() {
    let dir = tempdir().unwrap();
    let store = seeded_store(
        dir.path(),
        &[
            flight("LOPA115", ymd(2024, 1, 6), TravelClass::Economy),
            flight("LOPA130", ymd(2024, 1, 11), TravelClass::Economy),
            flight("LOPA103", ymd(2024, 1, 2), TravelClass::Business),
        ],
    );

    let exact = store
        .search_flights("London", "Paris", ymd(2024, 1, 2), TravelClass::Business, true)
        .unwrap();
    assert_eq!(exact.tier, SearchTier::Exact);
    assert_eq!(exact.flights[0].flight_number, "LOPA103");

    // Business on the 2nd must not leak into an economy search.
    let flexible = store
        .search_flights("London", "Paris", ymd(2024, 1, 2), TravelClass::Economy, true)
        .unwrap();
    assert_eq!(flexible.tier, SearchTier::Flexible);
    let numbers: Vec<_> = flexible.flights.iter().map(|f| f.flight_number.as_str()).collect();
    assert_eq!(numbers, vec!["LOPA115"]);

    let strict = store
        .search_flights("London", "Paris", ymd(2024, 1, 2), TravelClass::Economy, false)
        .unwrap();
    assert_eq!(strict.tier, SearchTier::NextAvailable);
    assert_eq!(strict.flights.len(), 1);
    assert_eq!(strict.flights[0].flight_number, "LOPA115");

    let none = store
        .search_flights("London", "Paris", ymd(2024, 2, 1), TravelClass::Economy, true)
        .unwrap();
    assert_eq!(none.tier, SearchTier::NotFound);
    assert!(none.flights.is_empty());

    let wrong_route = store
        .search_flights("Paris", "London", ymd(2024, 1, 6), TravelClass::Economy, true)
        .unwrap();
    assert_eq!(wrong_route.tier, SearchTier::NotFound);
}

#[test]
fn test_flexible_window_edges_and_ordering() {
    let dir = tempdir().unwrap();
    let store = seeded_store(
        dir.path(),
        &[
            flight("LOPA101", ymd(2024, 1, 2), TravelClass::Economy),
            flight("LOPA109", ymd(2024, 1, 3), TravelClass::Economy),
            flight("LOPA118", ymd(2024, 1, 5), TravelClass::Economy),
            flight("LOPA115", ymd(2024, 1, 5), TravelClass::Economy),
            flight("LOPA124", ymd(2024, 1, 17), TravelClass::Economy),
            flight("LOPA127", ymd(2024, 1, 18), TravelClass::Economy),
        ],
    );

    // 10-01: -8 and +8 days are outside, -7 and +7 are inside.
    let flexible = store
        .search_flights("London", "Paris", ymd(2024, 1, 10), TravelClass::Economy, true)
        .unwrap();
    assert_eq!(flexible.tier, SearchTier::Flexible);
    let numbers: Vec<_> = flexible.flights.iter().map(|f| f.flight_number.as_str()).collect();
    assert_eq!(numbers, vec!["LOPA109", "LOPA115", "LOPA118", "LOPA124"]);

    // Two flights share the earliest later date: lowest number wins.
    let next = store
        .search_flights("London", "Paris", ymd(2024, 1, 4), TravelClass::Economy, false)
        .unwrap();
    assert_eq!(next.tier, SearchTier::NextAvailable);
    assert_eq!(next.flights.len(), 1);
    assert_eq!(next.flights[0].flight_number, "LOPA115");
}

#[test]
fn test_search_never_offers_departed_flights() {
    let dir = tempdir().unwrap();
    let store = seeded_store(
        dir.path(),
        &[
            flight("LOPA900", ymd(2023, 12, 28), TravelClass::Economy),
            flight("LOPA109", ymd(2024, 1, 4), TravelClass::Economy),
        ],
    );

    let outcome = store
        .search_flights_from(
            "London",
            "Paris",
            ymd(2024, 1, 2),
            TravelClass::Economy,
            true,
            ymd(2024, 1, 1),
        )
        .unwrap();
    assert_eq!(outcome.tier, SearchTier::Flexible);
    assert_eq!(outcome.flights.len(), 1);
    assert_eq!(outcome.flights[0].flight_number, "LOPA109");

    // Unbounded search still sees the old flight.
    let all = store
        .search_flights("London", "Paris", ymd(2024, 1, 2), TravelClass::Economy, true)
        .unwrap();
    assert_eq!(all.flights.len(), 2);
}

#[test]
fn test_bookings_save_list_and_cancel() {
    let dir = tempdir().unwrap();
    let store = seeded_store(dir.path(), &[]);

    let later = Booking {
        user_name: "Ada".to_string(),
        origin: "London".to_string(),
        destination: "Paris".to_string(),
        departure_date: ymd(2024, 3, 10),
        return_date: None,
        flight_number: "LOPA127".to_string(),
        travel_class: TravelClass::First,
    };
    let earlier = Booking {
        departure_date: ymd(2024, 3, 1),
        return_date: Some(ymd(2024, 3, 8)),
        flight_number: "LOPA100".to_string(),
        ..later.clone()
    };
    store.save(&later).unwrap();
    store.save(&earlier).unwrap();

    assert_eq!(store.list_for_user("Ada").unwrap(), vec![earlier.clone(), later.clone()]);
    assert_eq!(store.last_booking("Ada").unwrap(), Some(later));
    assert!(store.list_for_user("Grace").unwrap().is_empty());
    assert_eq!(store.last_booking("Grace").unwrap(), None);

    assert!(!store.cancel("Grace", "LOPA127").unwrap());
    assert!(store.cancel("Ada", "LOPA127").unwrap());
    assert_eq!(store.list_for_user("Ada").unwrap(), vec![earlier]);
}

fn run_session(
    store: &FlightStore,
    flexible: bool,
    opening: &str,
    answers: &[&str],
) -> (BookingOutcome, ScriptedInteraction) {
    let extractor = AppConfig::default().extractor();
    let mut responses = Responses::seeded(1);
    let mut io = ScriptedInteraction::new(answers.iter().copied());
    let outcome = BookingSession::new(&extractor, store, &mut responses, ymd(2024, 1, 1))
        .flexible(flexible)
        .run("Ada", opening, &mut io)
        .unwrap();
    (outcome, io)
}

#[test]
fn test_session_fills_missing_slots_and_books() {
    let dir = tempdir().unwrap();
    let store = seeded_store(
        dir.path(),
        &[flight("LOPA103", ymd(2024, 1, 2), TravelClass::Economy)],
    );

    let (outcome, io) = run_session(
        &store,
        true,
        "book a flight",
        &["London", "Paris", "yesterday or 02-01-2024", "one-way", "economy", "yes"],
    );

    let BookingOutcome::Booked(booking) = outcome else {
        panic!("expected a booking, got {:?}\n{:#?}", outcome, io.transcript);
    };
    assert_eq!(booking.flight_number, "LOPA103");
    assert_eq!(booking.return_date, None);
    assert_eq!(io.remaining(), 0);
    assert!(io.said("I found one flight"));
    assert_eq!(store.list_for_user("Ada").unwrap(), vec![booking]);
}

#[test]
fn test_session_reprompts_on_bad_answers() {
    let dir = tempdir().unwrap();
    let store = seeded_store(
        dir.path(),
        &[flight("LOPA103", ymd(2024, 1, 2), TravelClass::First)],
    );

    let (outcome, io) = run_session(
        &store,
        true,
        "I want to fly from London to Paris",
        &[
            "whenever",
            "01-12-2023",
            "02-01-2024",
            "31-12-2023",
            "09-01-2024",
            "cheapest",
            "first",
            "yes",
        ],
    );

    assert!(matches!(outcome, BookingOutcome::Booked(_)), "{:#?}", io.transcript);
    assert!(io.said("doesn't seem like a valid date"));
    assert!(io.said("01-12-2023 is in the past"));
    assert!(io.said("on or after your departure on 02-01-2024"));
    assert!(io.said("Please choose a valid class"));
    let booked = store.last_booking("Ada").unwrap().unwrap();
    assert_eq!(booked.return_date, Some(ymd(2024, 1, 9)));
}

#[test]
fn test_session_uses_flexible_dates() {
    let dir = tempdir().unwrap();
    let store = seeded_store(
        dir.path(),
        &[
            flight("LOPA112", ymd(2024, 1, 5), TravelClass::Economy),
            flight("LOPA118", ymd(2024, 1, 7), TravelClass::Economy),
        ],
    );

    let (outcome, io) = run_session(
        &store,
        true,
        "from London to Paris",
        &["02-01-2024", "one way", "economy", "7", "2"],
    );

    let BookingOutcome::Booked(booking) = outcome else {
        panic!("expected a booking, got {:?}\n{:#?}", outcome, io.transcript);
    };
    assert!(io.said("No exact matches found"));
    assert!(io.said("between 1 and 2"));
    assert_eq!(booking.flight_number, "LOPA118");
    assert_eq!(booking.departure_date, ymd(2024, 1, 7));
}

#[test]
fn test_session_declines_and_reports_no_flights() {
    let dir = tempdir().unwrap();
    let store = seeded_store(
        dir.path(),
        &[flight("LOPA112", ymd(2024, 1, 5), TravelClass::Economy)],
    );

    let (declined, io) = run_session(
        &store,
        false,
        "from London to Paris",
        &["02-01-2024", "one-way", "economy", "no"],
    );
    assert_eq!(declined, BookingOutcome::Declined);
    assert!(io.said("next available flight"));

    let (none, io) = run_session(
        &store,
        true,
        "from London to Paris",
        &["01-02-2024", "one-way", "economy"],
    );
    assert_eq!(none, BookingOutcome::NoFlights);
    assert!(io.said("couldn't"));

    let (abandoned, _) = run_session(&store, true, "from London to Paris", &["02-01-2024"]);
    assert_eq!(abandoned, BookingOutcome::Abandoned);
    assert!(store.list_for_user("Ada").unwrap().is_empty());
}

#[test]
fn test_session_skips_departed_flights() {
    let dir = tempdir().unwrap();
    let store = seeded_store(
        dir.path(),
        &[flight("LOPA900", ymd(2023, 12, 28), TravelClass::Economy)],
    );

    let (outcome, io) = run_session(
        &store,
        true,
        "from London to Paris",
        &["02-01-2024", "one-way", "economy"],
    );
    assert_eq!(outcome, BookingOutcome::NoFlights, "{:#?}", io.transcript);
    assert!(store.list_for_user("Ada").unwrap().is_empty());
}

#[test]
fn test_session_asks_again_when_flight_leaves_after_return() {
    let dir = tempdir().unwrap();
    let store = seeded_store(
        dir.path(),
        &[flight("LOPA921", ymd(2024, 1, 8), TravelClass::Economy)],
    );

    let (outcome, io) = run_session(
        &store,
        true,
        "from London to Paris",
        &["02-01-2024", "03-01-2024", "economy", "yes", "05-01-2024", "15-01-2024"],
    );

    let BookingOutcome::Booked(booking) = outcome else {
        panic!("expected a booking, got {:?}\n{:#?}", outcome, io.transcript);
    };
    assert!(io.said("Flight LOPA921 leaves on 08-01-2024, after your return on 03-01-2024."));
    assert!(io.said("on or after your departure on 08-01-2024"));
    assert_eq!(booking.departure_date, ymd(2024, 1, 8));
    assert_eq!(booking.return_date, Some(ymd(2024, 1, 15)));
    assert_eq!(store.list_for_user("Ada").unwrap(), vec![booking]);

    // Input ending at the new question saves nothing.
    let (abandoned, _) = run_session(
        &store,
        true,
        "from London to Paris",
        &["02-01-2024", "03-01-2024", "economy", "yes"],
    );
    assert_eq!(abandoned, BookingOutcome::Abandoned);
    assert_eq!(store.list_for_user("Ada").unwrap().len(), 1);
}
