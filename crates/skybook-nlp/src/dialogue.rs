// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use std::collections::VecDeque;

/// Line-based conversation with the user.
///
/// `ask` shows `prompt` as the assistant's question (nothing when empty),
/// blocks until the user answers and returns `None` once input is exhausted
/// (end of file on the console).
pub trait Interaction {
    fn say(&mut self, message: &str);

    fn ask(&mut self, prompt: &str) -> Option<String>;

    /// Yes/no question. Anything that isn't a clear yes counts as no.
    fn confirm(&mut self, question: &str) -> bool {
        self.ask(question).map(|a| is_affirmative(&a)).unwrap_or(false)
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().trim_end_matches(['.', '!']),
        "y" | "yes" | "yeah" | "yep" | "sure" | "ok" | "okay" | "correct" | "yes please"
    )
}

/// Replays canned answers and records everything said, for tests and
/// non-interactive runs.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInteraction {
    answers: VecDeque<String>,
    pub transcript: Vec<String>,
}

impl ScriptedInteraction {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// True if any recorded line contains `needle`.
    pub fn said(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }
}

impl Interaction for ScriptedInteraction {
    fn say(&mut self, message: &str) {
        self.transcript.push(message.to_string());
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        if !prompt.is_empty() {
            self.transcript.push(prompt.to_string());
        }
        let answer = self.answers.pop_front()?;
        self.transcript.push(format!("> {}", answer));
        Some(answer)
    }
}
