// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use skybook_core::seed::generate_flights;
use skybook_core::{AppConfig, Chatbot, FlightStore, SearchTier};
use skybook_nlp::booking_prompt::{BookingDetails, TravelClass};
use skybook_nlp::date_parser::{format_date, parse_date};
use skybook_nlp::dialogue::{Interaction, ScriptedInteraction};
use skybook_nlp::intent::{Classifier, IntentConfig, IntentModel};
use skybook_nlp::location::best_match;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the flight database
    #[arg(long, env = "SKYBOOK_DB")]
    db: Option<PathBuf>,

    /// Path to config.json
    #[arg(short, long, env = "SKYBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to the booking assistant (default)
    Chat,
    /// Regenerate the synthetic flight timetable
    Seed {
        /// Number of days to generate, starting today
        #[arg(long)]
        days: Option<u32>,
        /// RNG seed for a reproducible timetable
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Search flights on a route
    Search {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// DD-MM-YYYY or a phrase like "next friday"
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "economy")]
        class: String,
        /// Only look at the exact date and later departures
        #[arg(long)]
        strict: bool,
    },
    /// List a user's bookings
    Bookings { user: String },
    /// Cancel a user's booking on a flight
    Cancel { user: String, flight: String },
    /// Show the intent and booking details found in an utterance, as JSON
    Parse { utterance: String },
}

/// Reads answers from stdin and prints the assistant's lines to stdout.
struct ConsoleInteraction {
    stdin: io::Stdin,
}

impl Interaction for ConsoleInteraction {
    fn say(&mut self, message: &str) {
        println!("Bot: {}", message);
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        if !prompt.is_empty() {
            println!("Bot: {}", prompt);
        }
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match self.stdin.lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                log::error!("[Console] Failed to read input: {}", e);
                None
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialise logging")?;

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let mut config = AppConfig::load(&config_path)
        .with_context(|| format!("Could not load config from {:?}", config_path))?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    let store = FlightStore::new(&config.database_path).with_flex_window(config.flex_window_days);
    let today = Local::now().date_naive();

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            store
                .init()
                .with_context(|| format!("Could not open {:?}", store.path()))?;
            if config.seed_on_start {
                seed(&config, &store, today, config.seed_days, None)?;
            }
            let intents = IntentModel::at_path(&IntentConfig::default_path());
            let mut console = ConsoleInteraction { stdin: io::stdin() };
            Chatbot::new(&config, store, today)
                .with_intents(Box::new(intents))
                .run(&mut console);
        }
        Commands::Seed { days, seed: rng_seed } => {
            store.init()?;
            let count = seed(
                &config,
                &store,
                today,
                days.unwrap_or(config.seed_days),
                rng_seed,
            )?;
            println!("Seeded {} flights into {:?}", count, store.path());
        }
        Commands::Search {
            from,
            to,
            date,
            class,
            strict,
        } => {
            let date = parse_date(&date, today)
                .with_context(|| format!("Could not understand the date '{}'", date))?;
            let class: TravelClass = class.parse()?;
            let origin = best_match(&from, &config.origin_vocabulary(), config.max_edit_distance)
                .with_context(|| format!("Unknown origin '{}'", from))?;
            let destination =
                best_match(&to, &config.destination_vocabulary(), config.max_edit_distance)
                    .with_context(|| format!("Unknown destination '{}'", to))?;

            store.init()?;
            let flexible = config.flexible_search && !strict;
            let outcome = store.search_flights_from(
                origin.name(),
                destination.name(),
                date,
                class,
                flexible,
                today,
            )?;
            match outcome.tier {
                SearchTier::Exact => println!("Flights on {}:", format_date(date)),
                SearchTier::Flexible => println!("No flights on {}, nearby dates:", format_date(date)),
                SearchTier::NextAvailable => println!("Next available flight:"),
                SearchTier::NotFound => println!("No flights found."),
            }
            for flight in &outcome.flights {
                println!("  {}", flight.summary());
            }
        }
        Commands::Bookings { user } => {
            store.init()?;
            let bookings = store.list_for_user(&user)?;
            if bookings.is_empty() {
                println!("No bookings for {}", user);
            }
            for b in &bookings {
                println!(
                    "{} {} -> {} {} {} (return: {})",
                    b.flight_number,
                    b.origin,
                    b.destination,
                    format_date(b.departure_date),
                    b.travel_class,
                    b.return_date
                        .map(format_date)
                        .unwrap_or_else(|| "one-way".to_string())
                );
            }
        }
        Commands::Cancel { user, flight } => {
            store.init()?;
            let flight = flight.trim().to_uppercase();
            if store.cancel(&user, &flight)? {
                println!("Cancelled {} for {}", flight, user);
            } else {
                println!("No booking on {} for {}", flight, user);
            }
        }
        Commands::Parse { utterance } => {
            let intent = IntentModel::at_path(&IntentConfig::default_path()).classify(&utterance);
            // No answers: fuzzy city suggestions are declined.
            let mut io = ScriptedInteraction::default();
            let details =
                config
                    .extractor()
                    .extract(&utterance, &BookingDetails::default(), today, &mut io);
            let report = serde_json::json!({
                "intent": intent,
                "details": details,
                "missing": details.next_missing(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn seed(
    config: &AppConfig,
    store: &FlightStore,
    start: NaiveDate,
    days: u32,
    rng_seed: Option<u64>,
) -> Result<usize> {
    let mut rng = match rng_seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let flights = generate_flights(
        &config.origin_vocabulary(),
        &config.destination_vocabulary(),
        start,
        days,
        &mut rng,
    );
    store
        .seed_flights(&flights)
        .with_context(|| format!("Could not seed {:?}", store.path()))
}
