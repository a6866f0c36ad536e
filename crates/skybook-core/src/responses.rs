// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Canned replies with `{placeholder}` substitution. Each reply has a few
//! variants; one is picked at random per use.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reply {
    Welcome,
    NamePrompt,
    WelcomeBack,
    NewUserGreeting,
    Greeting,
    Thanks,
    Farewell,
    HowAreYou,
    Capabilities,
    UserName,
    NotUnderstood,
    PositiveFeelings,
    NegativeFeelings,
    NeutralFeelings,
    BookingStart,
    OriginPrompt,
    DestinationPrompt,
    DepartureDatePrompt,
    ReturnDatePrompt,
    TravelClassPrompt,
    Origin,
    Destination,
    DepartureDate,
    ReturnDate,
    OneWay,
    TravelClass,
    InvalidOrigin,
    InvalidDestination,
    InvalidDate,
    DateInPast,
    ReturnBeforeDeparture,
    ReturnBeforeFlight,
    InvalidClass,
    FlightCheck,
    FlexibleResults,
    NextAvailable,
    NoFlightsFound,
    SingleFlight,
    ConfirmationPrompt,
    SelectionPrompt,
    InvalidSelection,
    BookingConfirmedDetails,
    BookingDeclined,
    NoBookings,
    BookingList,
    CancelPrompt,
    CancelConfirmed,
    CancelNotFound,
    StoreUnavailable,
}

fn templates(reply: Reply) -> &'static [&'static str] {
    match reply {
        Reply::Welcome => &["Hello! Welcome to the Travel Booking Assistant. Let's get started with your name:"],
        Reply::NamePrompt => &["Please tell me your name."],
        Reply::WelcomeBack => &[
            "Welcome back, {name}! Last time, you booked a flight from {origin} to {destination} on {departure_date}. How can I assist you today?",
        ],
        Reply::NewUserGreeting => &[
            "Hello {name}! Welcome to the Travel Booking Assistant. How can I assist you today?",
            "Hi {name}, glad to see you here! I can help with booking flights or managing your travel plans. What do you need?",
            "Welcome, {name}! I'm here to assist with all your travel needs. How can I help you today?",
            "Hey {name}, welcome aboard! I can help book flights or manage your travel plans. Let's get started!",
        ],
        Reply::Greeting => &[
            "Hello {name}, how can I assist you today?",
            "Hi {name}! What can I do for you today?",
            "Hey {name}, how can I help you?",
            "Greetings {name}, what do you need today?",
        ],
        Reply::Thanks => &[
            "You're welcome! Happy to help.",
            "No problem at all!",
            "Glad I could assist!",
            "Anytime, {name}!",
        ],
        Reply::Farewell => &[
            "Goodbye {name}, have a great day!",
            "Bye {name}, take care!",
            "See you later, {name}!",
            "Farewell, {name}! Stay safe.",
        ],
        Reply::HowAreYou => &[
            "I'm good, but I'm here to help you! How are you?",
            "I'm doing great, thanks for asking! How are you?",
            "I don't have feelings, but I'm ready to help you! How are you?",
            "I'm here and ready to assist you! How are you?",
        ],
        Reply::Capabilities => &[
            "I can book flights, list or cancel your bookings, tell you your name, and answer simple questions.",
            "I can assist with booking flights, managing your bookings, reminding you of your name, and answering basic questions.",
            "Booking flights, cancelling them, and keeping track of your name is what I do best!",
        ],
        Reply::UserName => &[
            "Your name is {name}.",
            "You told me your name is {name}.",
            "If I remember correctly, your name is {name}.",
            "You're {name}, right?",
        ],
        Reply::NotUnderstood => &["I'm not sure I understand. Could you please clarify?"],
        Reply::PositiveFeelings => &[
            "That's great to hear, {name}! How can I make your day even better?",
            "I'm glad you're feeling good, {name}! Let me know how I can assist.",
            "Awesome, {name}! I'm here to keep that good mood going. What do you need?",
        ],
        Reply::NegativeFeelings => &[
            "I'm sorry to hear that, {name}. How can I help make things a bit better?",
            "Oh no, {name}, I hope things improve for you soon. Is there something I can assist with?",
            "I'm here for you, {name}. Let me know how I can help make your day a little easier.",
        ],
        Reply::NeutralFeelings => &[
            "Thanks for sharing, {name}. Let me know how I can help.",
            "I hear you, {name}. How can I assist you today?",
            "Got it, {name}. Let me know if there's anything I can do.",
        ],
        Reply::BookingStart => &["Let's get the details for your flight booking."],
        Reply::OriginPrompt => &[
            "Could you let me know where you're flying from? Available options are: {available_origins}.",
            "From which city would you like to start your journey? Choices are: {available_origins}.",
            "Please tell me your origin city. You can choose from: {available_origins}.",
        ],
        Reply::DestinationPrompt => &[
            "Where are you headed? Available options are: {available_destinations}.",
            "Could you share your destination? Here's what we have: {available_destinations}.",
            "Please let me know your destination from these options: {available_destinations}.",
        ],
        Reply::DepartureDatePrompt => &[
            "When would you like to depart? (Format: DD-MM-YYYY or words like 'tomorrow')",
            "What is your desired departure date? You can also mention terms like 'next week'.",
            "Could you provide the departure date? Feel free to use relative terms like 'tomorrow'.",
        ],
        Reply::ReturnDatePrompt => &[
            "When would you like to return? You can say 'one-way' if it's a one-way trip.",
            "Would you like to add a return date? Say 'one-way' if you don't need one.",
        ],
        Reply::TravelClassPrompt => &[
            "What class would you like to travel in? (economy, business, first)",
            "Which travel class do you prefer: economy, business, or first?",
            "Could you specify the travel class: economy, business, or first?",
        ],
        Reply::Origin => &[
            "Got it, you're flying from {origin}.",
            "Okay, I have your origin as {origin}.",
            "Noted, departing from {origin}.",
        ],
        Reply::Destination => &[
            "Great, you're flying to {destination}.",
            "Destination set to {destination}.",
            "Got it, flying to {destination}.",
        ],
        Reply::DepartureDate => &[
            "Your departure date is set to {departure_date}.",
            "Departure date noted as {departure_date}.",
            "Okay, leaving on {departure_date}.",
        ],
        Reply::ReturnDate => &[
            "Return date set to {return_date}.",
            "Got it, returning on {return_date}.",
            "Return date noted as {return_date}.",
        ],
        Reply::OneWay => &[
            "You have selected a one-way trip.",
            "Noted, this is a one-way trip.",
            "One-way trip confirmed.",
        ],
        Reply::TravelClass => &[
            "Travel class set to {travel_class}.",
            "Noted, {travel_class} class.",
        ],
        Reply::InvalidOrigin => &["I couldn't understand the origin. Please choose from: {available_origins}."],
        Reply::InvalidDestination => &[
            "I couldn't understand the destination. Please choose from: {available_destinations}.",
        ],
        Reply::InvalidDate => &["That doesn't seem like a valid date. Please try again."],
        Reply::DateInPast => &["{departure_date} is in the past. Please pick a later date."],
        Reply::ReturnBeforeDeparture => &[
            "The return date has to be on or after your departure on {departure_date}. Please try again or say 'one-way'.",
        ],
        Reply::ReturnBeforeFlight => &[
            "Flight {flight_number} leaves on {departure_date}, after your return on {return_date}. Let's pick a new return date.",
        ],
        Reply::InvalidClass => &["Please choose a valid class (economy, business, first)."],
        Reply::FlightCheck => &[
            "Let me check available flights from {origin} to {destination} on {departure_date} in {travel_class} class.",
            "Checking flights from {origin} to {destination} on {departure_date} in {travel_class} class.",
        ],
        Reply::FlexibleResults => &["No exact matches found. Here are flights within a few days of your date."],
        Reply::NextAvailable => &["No close matches found. This is the next available flight."],
        Reply::NoFlightsFound => &[
            "I couldn't find any flights matching your criteria.",
            "I'm sorry, but I couldn't locate any flights with the current details.",
        ],
        Reply::SingleFlight => &["I found one flight: {flight}"],
        Reply::ConfirmationPrompt => &[
            "Would you like to book this flight?",
            "Should I go ahead and book this flight for you?",
        ],
        Reply::SelectionPrompt => &[
            "Please enter the number of the flight you'd like to book, or 'none' to stop.",
        ],
        Reply::InvalidSelection => &["Please enter a number between 1 and {count}, or 'none'."],
        Reply::BookingConfirmedDetails => &[
            "Your flight {flight_number} from {origin} to {destination} on {departure_date} in {travel_class} class is booked!",
            "You're all set! Flight {flight_number} from {origin} to {destination} has been booked for {departure_date} in {travel_class} class.",
            "Confirmation received! Flight {flight_number} from {origin} to {destination} on {departure_date} ({travel_class}) is booked!",
        ],
        Reply::BookingDeclined => &["No problem, let me know if you need anything else."],
        Reply::NoBookings => &["You don't have any bookings yet, {name}."],
        Reply::BookingList => &["Here are your bookings, {name}:"],
        Reply::CancelPrompt => &["Which flight number would you like to cancel?"],
        Reply::CancelConfirmed => &["Your booking on flight {flight_number} has been cancelled."],
        Reply::CancelNotFound => &["I couldn't find a booking on flight {flight_number} for you."],
        Reply::StoreUnavailable => &[
            "Sorry, I can't reach the booking database right now. Please try again later.",
        ],
    }
}

/// Replaces every `{key}` in `template` with its value.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

pub struct Responses {
    rng: StdRng,
}

impl Default for Responses {
    fn default() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Responses {
    /// Reproducible variant choice.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn render(&mut self, reply: Reply, vars: &[(&str, &str)]) -> String {
        let variants = templates(reply);
        let template = variants.choose(&mut self.rng).copied().unwrap_or_default();
        fill(template, vars)
    }

    pub fn text(&mut self, reply: Reply) -> String {
        self.render(reply, &[])
    }
}
