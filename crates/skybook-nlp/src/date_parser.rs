// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Relative and absolute date expressions ("tomorrow", "in 3 days",
//! "next friday", "05-03-2024").
//!
//! Every function here returns `None` for input it cannot read; callers ask
//! the user again instead of treating it as an error.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;
use std::sync::OnceLock;

/// Storage and display format for calendar dates.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

const WEEKDAYS: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

pub fn parse_date(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    static TOMORROW_RE: OnceLock<Regex> = OnceLock::new();
    let tomorrow_re = TOMORROW_RE.get_or_init(|| Regex::new(r"\btomorrow\b").unwrap());
    if tomorrow_re.is_match(&lower) {
        return reference.checked_add_signed(Duration::days(1));
    }

    if lower.contains("next week") || lower.contains("week later") {
        return reference.checked_add_signed(Duration::days(7));
    }

    // "in N days" / "N days later". The phrase shape decides the branch; a
    // non-numeric N ends the parse instead of falling through.
    static DAYS_RE: OnceLock<Regex> = OnceLock::new();
    let days_re = DAYS_RE.get_or_init(|| {
        Regex::new(r"\bin\s+(?:a\s+)?([a-z0-9]+)\s+days?\b|\b([a-z0-9]+)\s+days?\s+later\b").unwrap()
    });
    if let Some(caps) = days_re.captures(&lower) {
        let amount = caps.get(1).or_else(|| caps.get(2))?.as_str();
        let days = parse_count(amount)?;
        return reference.checked_add_signed(Duration::try_days(days)?);
    }

    if let Some(date) = parse_weekday(&lower, reference) {
        return Some(date);
    }

    parse_literal(text)
}

fn parse_count(word: &str) -> Option<i64> {
    if let Ok(n) = word.parse::<i64>() {
        return Some(n);
    }
    let n = match word {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        _ => return None,
    };
    Some(n)
}

fn parse_weekday(lower: &str, reference: NaiveDate) -> Option<NaiveDate> {
    static NEXT_RE: OnceLock<Regex> = OnceLock::new();
    let next_re = NEXT_RE.get_or_init(|| Regex::new(r"\bnext\s+([a-z]+)").unwrap());

    let (weekday, is_next) = match next_re
        .captures(lower)
        .and_then(|caps| weekday_from_name(&caps[1]))
    {
        Some(day) => (day, true),
        None => {
            let day = crate::tokens::words(lower)
                .iter()
                .find_map(|w| weekday_from_name(w))?;
            (day, false)
        }
    };

    next_weekday(reference, weekday, is_next)
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    WEEKDAYS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, day)| *day)
}

/// Next occurrence of `weekday` strictly after `reference`; `skip_week`
/// ("next friday") moves one more week out. `None` past the end of the
/// calendar.
pub fn next_weekday(reference: NaiveDate, weekday: Weekday, skip_week: bool) -> Option<NaiveDate> {
    let current = reference.weekday().num_days_from_monday() as i64;
    let target = weekday.num_days_from_monday() as i64;
    let mut offset = (target - current + 7) % 7;
    if skip_week {
        offset += 7;
    }
    if offset == 0 {
        offset = 7;
    }
    reference.checked_add_signed(Duration::days(offset))
}

/// Strict `DD-MM-YYYY`, either the whole text or one standalone word of it.
fn parse_literal(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Some(date);
    }

    static LITERAL_RE: OnceLock<Regex> = OnceLock::new();
    let literal_re =
        LITERAL_RE.get_or_init(|| Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}$").unwrap());
    crate::tokens::words(trimmed)
        .iter()
        .filter(|w| literal_re.is_match(w))
        .find_map(|w| NaiveDate::parse_from_str(w, DATE_FORMAT).ok())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_tomorrow() {
        let reference = ymd(2024, 1, 1);
        assert_eq!(parse_date("tomorrow", reference), Some(ymd(2024, 1, 2)));
        assert_eq!(parse_date("Tomorrow please", reference), Some(ymd(2024, 1, 2)));
        // Month and year roll over.
        assert_eq!(parse_date("tomorrow", ymd(2023, 12, 31)), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn test_next_week_and_week_later() {
        let reference = ymd(2024, 2, 26);
        assert_eq!(parse_date("next week", reference), Some(ymd(2024, 3, 4)));
        assert_eq!(parse_date("a week later", reference), Some(ymd(2024, 3, 4)));
    }

    #[test]
    fn test_in_n_days() {
        let reference = ymd(2024, 1, 1);
        for n in [1i64, 2, 5, 10, 45, 365] {
            let phrase = format!("in {} days", n);
            assert_eq!(
                parse_date(&phrase, reference),
                Some(reference + Duration::days(n)),
                "{}",
                phrase
            );
        }
        assert_eq!(parse_date("3 days later", reference), Some(ymd(2024, 1, 4)));
        assert_eq!(parse_date("in two days", reference), Some(ymd(2024, 1, 3)));
    }

    #[test]
    fn test_in_days_without_number_is_none() {
        let reference = ymd(2024, 1, 1);
        assert_eq!(parse_date("in a few days", reference), None);
        assert_eq!(parse_date("in some days", reference), None);
        assert_eq!(parse_date("many days later", reference), None);
    }

    #[test]
    fn test_weekdays() {
        // 2024-01-03 is a Wednesday
        let reference = ymd(2024, 1, 3);
        assert_eq!(parse_date("friday", reference), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("next friday", reference), Some(ymd(2024, 1, 12)));
        // Same weekday never resolves to the reference itself.
        assert_eq!(parse_date("wednesday", reference), Some(ymd(2024, 1, 10)));
        assert_eq!(parse_date("on Monday", reference), Some(ymd(2024, 1, 8)));
    }

    #[test]
    fn test_weekday_at_end_of_calendar_is_none() {
        assert_eq!(parse_date("friday", NaiveDate::MAX), None);
        assert_eq!(parse_date("next monday", NaiveDate::MAX), None);
        assert_eq!(parse_date("tomorrow", NaiveDate::MAX), None);
        assert_eq!(next_weekday(NaiveDate::MAX, Weekday::Fri, false), None);
    }

    #[test]
    fn test_literal() {
        let reference = ymd(2024, 1, 1);
        assert_eq!(parse_date("05-03-2024", reference), Some(ymd(2024, 3, 5)));
        assert_eq!(
            parse_date("I leave on 05-03-2024", reference),
            Some(ymd(2024, 3, 5))
        );
    }

    #[test]
    fn test_malformed_is_none() {
        let reference = ymd(2024, 1, 1);
        assert_eq!(parse_date("32-13-2024", reference), None);
        assert_eq!(parse_date("2024-03-05", reference), None);
        assert_eq!(parse_date("whenever", reference), None);
        assert_eq!(parse_date("", reference), None);
    }

    #[test]
    fn test_format_roundtrip_is_fixed_width() {
        assert_eq!(format_date(ymd(2024, 3, 5)), "05-03-2024");
    }
}
