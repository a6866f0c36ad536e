// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! SQLite persistence for the flight timetable and user bookings.
//!
//! The database is a single local file opened for each operation. Dates are
//! stored as `DD-MM-YYYY` text and parsed back into `NaiveDate` on read, so
//! all date comparisons happen in Rust.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use skybook_nlp::booking_prompt::TravelClass;
use skybook_nlp::date_parser::{format_date, DATE_FORMAT};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{Booking, FlightRecord};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to create database directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to open flight database {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Invalid {field} '{value}' in {table} row {id}")]
    Corrupt {
        table: &'static str,
        id: i64,
        field: &'static str,
        value: String,
    },
}

/// Which relaxation produced a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTier {
    /// Requested date and class.
    Exact,
    /// Same class within the flexible window around the requested date.
    Flexible,
    /// Earliest later departure in the same class.
    NextAvailable,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub tier: SearchTier,
    pub flights: Vec<FlightRecord>,
}

const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS flights (
        id INTEGER PRIMARY KEY,
        flight_number TEXT NOT NULL,
        origin TEXT NOT NULL,
        destination TEXT NOT NULL,
        departure_date TEXT NOT NULL,
        return_date TEXT,
        travel_class TEXT NOT NULL,
        price REAL NOT NULL
    );
    CREATE TABLE IF NOT EXISTS bookings (
        id INTEGER PRIMARY KEY,
        user_name TEXT NOT NULL,
        origin TEXT NOT NULL,
        destination TEXT NOT NULL,
        departure_date TEXT NOT NULL,
        return_date TEXT,
        flight_number TEXT NOT NULL,
        travel_class TEXT NOT NULL
    );
";

#[derive(Debug, Clone)]
pub struct FlightStore {
    path: PathBuf,
    flex_window_days: i64,
}

impl FlightStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            flex_window_days: 7,
        }
    }

    pub fn with_flex_window(mut self, days: u32) -> Self {
        self.flex_window_days = days as i64;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection, StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        Connection::open(&self.path).map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })
    }

    /// Creates both tables if they do not exist yet.
    pub fn init(&self) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute_batch(CREATE_TABLES)?;
        log::debug!("[Store] Initialised {:?}", self.path);
        Ok(())
    }

    /// Replaces flights sharing a destination, departure date and class with
    /// `flights`. Returns the number of rows inserted.
    pub fn seed_flights(&self, flights: &[FlightRecord]) -> Result<usize, StoreError> {
        let mut conn = self.open()?;
        conn.execute_batch(CREATE_TABLES)?;
        let tx = conn.transaction()?;

        let mut replaced = 0;
        let mut seen = HashSet::new();
        for f in flights {
            let key = (f.destination.as_str(), f.departure_date, f.travel_class);
            if seen.insert(key) {
                replaced += tx.execute(
                    "DELETE FROM flights
                     WHERE destination = ?1 AND departure_date = ?2 AND travel_class = ?3",
                    params![
                        f.destination,
                        format_date(f.departure_date),
                        f.travel_class.as_str()
                    ],
                )?;
            }
        }

        {
            let mut insert = tx.prepare(
                "INSERT INTO flights
                 (flight_number, origin, destination, departure_date, return_date, travel_class, price)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for f in flights {
                insert.execute(params![
                    f.flight_number,
                    f.origin,
                    f.destination,
                    format_date(f.departure_date),
                    f.return_date.map(format_date),
                    f.travel_class.as_str(),
                    f.price
                ])?;
            }
        }
        tx.commit()?;

        log::info!(
            "[Store] Seeded {} flights ({} replaced)",
            flights.len(),
            replaced
        );
        Ok(flights.len())
    }

    /// Every flight on a route in one class, ordered by departure then
    /// flight number.
    fn route_flights(
        &self,
        origin: &str,
        destination: &str,
        class: TravelClass,
    ) -> Result<Vec<FlightRecord>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, flight_number, origin, destination, departure_date, return_date, travel_class, price
             FROM flights
             WHERE origin = ?1 AND destination = ?2 AND travel_class = ?3",
        )?;
        let rows = stmt.query_map(
            params![origin, destination, class.as_str()],
            RawFlight::from_row,
        )?;

        let mut flights = Vec::new();
        for raw in rows {
            flights.push(raw?.parse()?);
        }
        flights.sort_by(|a: &FlightRecord, b: &FlightRecord| {
            a.departure_date
                .cmp(&b.departure_date)
                .then_with(|| a.flight_number.cmp(&b.flight_number))
        });
        Ok(flights)
    }

    /// Tiered search, stopping at the first tier with results:
    /// exact date, then (if `flexible`) the window around it, then the
    /// earliest later departure.
    pub fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
        class: TravelClass,
        flexible: bool,
    ) -> Result<SearchOutcome, StoreError> {
        self.search_flights_from(origin, destination, date, class, flexible, NaiveDate::MIN)
    }

    /// Like [`FlightStore::search_flights`], but flights departing before
    /// `earliest` are never offered, whatever the tier.
    pub fn search_flights_from(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
        class: TravelClass,
        flexible: bool,
        earliest: NaiveDate,
    ) -> Result<SearchOutcome, StoreError> {
        let mut candidates = self.route_flights(origin, destination, class)?;
        candidates.retain(|f| f.departure_date >= earliest);

        let exact: Vec<FlightRecord> = candidates
            .iter()
            .filter(|f| f.departure_date == date)
            .cloned()
            .collect();
        if !exact.is_empty() {
            return Ok(self.outcome(SearchTier::Exact, exact));
        }

        if flexible {
            let nearby: Vec<FlightRecord> = candidates
                .iter()
                .filter(|f| (f.departure_date - date).num_days().abs() <= self.flex_window_days)
                .cloned()
                .collect();
            if !nearby.is_empty() {
                return Ok(self.outcome(SearchTier::Flexible, nearby));
            }
        }

        // Candidates are sorted, so the first later one is the earliest.
        if let Some(next) = candidates.into_iter().find(|f| f.departure_date > date) {
            return Ok(self.outcome(SearchTier::NextAvailable, vec![next]));
        }

        Ok(self.outcome(SearchTier::NotFound, Vec::new()))
    }

    fn outcome(&self, tier: SearchTier, flights: Vec<FlightRecord>) -> SearchOutcome {
        log::debug!("[Search] {:?}: {} flights", tier, flights.len());
        SearchOutcome { tier, flights }
    }

    pub fn find_flights(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
        class: TravelClass,
        flexible: bool,
    ) -> Result<Vec<FlightRecord>, StoreError> {
        Ok(self
            .search_flights(origin, destination, date, class, flexible)?
            .flights)
    }

    pub fn save(&self, booking: &Booking) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO bookings
             (user_name, origin, destination, departure_date, return_date, flight_number, travel_class)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                booking.user_name,
                booking.origin,
                booking.destination,
                format_date(booking.departure_date),
                booking.return_date.map(format_date),
                booking.flight_number,
                booking.travel_class.as_str()
            ],
        )?;
        log::info!(
            "[Store] Saved booking {} for {}",
            booking.flight_number,
            booking.user_name
        );
        Ok(())
    }

    /// A user's bookings, earliest departure first.
    pub fn list_for_user(&self, user_name: &str) -> Result<Vec<Booking>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_name, origin, destination, departure_date, return_date, flight_number, travel_class
             FROM bookings
             WHERE user_name = ?1",
        )?;
        let rows = stmt.query_map(params![user_name], RawBooking::from_row)?;

        let mut bookings = Vec::new();
        for raw in rows {
            bookings.push(raw?.parse()?);
        }
        bookings.sort_by(|a: &Booking, b: &Booking| {
            a.departure_date
                .cmp(&b.departure_date)
                .then_with(|| a.flight_number.cmp(&b.flight_number))
        });
        Ok(bookings)
    }

    /// The booking with the latest departure, if any.
    pub fn last_booking(&self, user_name: &str) -> Result<Option<Booking>, StoreError> {
        Ok(self.list_for_user(user_name)?.pop())
    }

    /// Deletes every booking of `user_name` on `flight_number`. Returns
    /// whether anything was deleted.
    pub fn cancel(&self, user_name: &str, flight_number: &str) -> Result<bool, StoreError> {
        let conn = self.open()?;
        let deleted = conn.execute(
            "DELETE FROM bookings WHERE user_name = ?1 AND flight_number = ?2",
            params![user_name, flight_number],
        )?;
        log::info!(
            "[Store] Cancelled {} booking(s) of {} for {}",
            deleted,
            flight_number,
            user_name
        );
        Ok(deleted > 0)
    }
}

fn parse_date_column(
    table: &'static str,
    id: i64,
    field: &'static str,
    value: String,
) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|_| StoreError::Corrupt {
        table,
        id,
        field,
        value,
    })
}

fn parse_class_column(table: &'static str, id: i64, value: String) -> Result<TravelClass, StoreError> {
    value.parse().map_err(|_| StoreError::Corrupt {
        table,
        id,
        field: "travel_class",
        value,
    })
}

/// Column values as stored, before date and class parsing.
struct RawFlight {
    id: i64,
    flight_number: String,
    origin: String,
    destination: String,
    departure_date: String,
    return_date: Option<String>,
    travel_class: String,
    price: f64,
}

impl RawFlight {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            flight_number: row.get(1)?,
            origin: row.get(2)?,
            destination: row.get(3)?,
            departure_date: row.get(4)?,
            return_date: row.get(5)?,
            travel_class: row.get(6)?,
            price: row.get(7)?,
        })
    }

    fn parse(self) -> Result<FlightRecord, StoreError> {
        let id = self.id;
        Ok(FlightRecord {
            flight_number: self.flight_number,
            origin: self.origin,
            destination: self.destination,
            departure_date: parse_date_column("flights", id, "departure_date", self.departure_date)?,
            return_date: self
                .return_date
                .map(|d| parse_date_column("flights", id, "return_date", d))
                .transpose()?,
            travel_class: parse_class_column("flights", id, self.travel_class)?,
            price: self.price,
        })
    }
}

struct RawBooking {
    id: i64,
    user_name: String,
    origin: String,
    destination: String,
    departure_date: String,
    return_date: Option<String>,
    flight_number: String,
    travel_class: String,
}

impl RawBooking {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_name: row.get(1)?,
            origin: row.get(2)?,
            destination: row.get(3)?,
            departure_date: row.get(4)?,
            return_date: row.get(5)?,
            flight_number: row.get(6)?,
            travel_class: row.get(7)?,
        })
    }

    fn parse(self) -> Result<Booking, StoreError> {
        let id = self.id;
        Ok(Booking {
            user_name: self.user_name,
            origin: self.origin,
            destination: self.destination,
            departure_date: parse_date_column("bookings", id, "departure_date", self.departure_date)?,
            return_date: self
                .return_date
                .map(|d| parse_date_column("bookings", id, "return_date", d))
                .transpose()?,
            flight_number: self.flight_number,
            travel_class: parse_class_column("bookings", id, self.travel_class)?,
        })
    }
}
