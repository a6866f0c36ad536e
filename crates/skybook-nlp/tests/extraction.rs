// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use chrono::NaiveDate;
use skybook_nlp::{
    resolve_reply, BookingDetails, BookingExtractor, Classifier, Intent, IntentModel,
    ScriptedInteraction, Sentiment, SentimentLexicon, Slot, TravelClass, Vocabulary,
};

fn extractor() -> BookingExtractor {
    BookingExtractor::new(
        Vocabulary::new(["London", "Toronto", "Sydney", "Dubai", "Frankfurt", "Mumbai"]),
        Vocabulary::new(["Paris", "New York", "Berlin", "Singapore", "Tokyo", "Amsterdam"]),
        2,
    )
}

#[test]
fn test_request_built_up_over_several_turns() {
    let ex = extractor();
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut io = ScriptedInteraction::new(["yes"]);

    let first = ex.extract("I'd like to book a flight to Tokio", &BookingDetails::default(), today, &mut io);
    assert!(io.said("Did you mean Tokyo? (yes/no)"));
    assert_eq!(first.destination.as_ref().unwrap(), &"Tokyo");
    assert_eq!(first.next_missing(), Some(Slot::Origin));

    let second = ex.extract("leaving from Mumbai on friday", &first, today, &mut io);
    assert_eq!(second.origin.as_ref().unwrap(), &"Mumbai");
    // 2024-01-01 is a Monday.
    assert_eq!(second.departure_date, NaiveDate::from_ymd_opt(2024, 1, 5));
    assert_eq!(second.next_missing(), Some(Slot::ReturnDate));

    let third = ex.extract("first class please", &second, today, &mut io);
    assert_eq!(third.travel_class, Some(TravelClass::First));
    assert_eq!(io.remaining(), 0);
}

#[test]
fn test_slot_answers_resolve_inside_sentences() {
    let ex = extractor();
    let mut io = ScriptedInteraction::default();
    let city = resolve_reply("I'd like to leave from Frankfurt please", ex.origins(), 2, &mut io);
    assert_eq!(city.unwrap(), "Frankfurt");

    let none = resolve_reply("somewhere warm", ex.destinations(), 2, &mut io);
    assert!(none.is_none());
}

#[test]
fn test_classifiers_agree_on_typical_turns() {
    let intents = IntentModel::default();
    assert_eq!(intents.classify("Thank you very much!"), Intent::Thanks);
    assert_eq!(intents.classify("list my bookings"), Intent::ListBookings);
    assert_eq!(intents.classify("what can you do?"), Intent::Capabilities);

    let sentiment = SentimentLexicon::default();
    assert_eq!(sentiment.classify("I'm great, thanks"), Sentiment::Positive);
    assert_eq!(sentiment.classify("not good at all"), Sentiment::Negative);
    assert_eq!(sentiment.classify("just another day"), Sentiment::Neutral);
}
